use std::borrow::Cow;

use chrono::{DateTime, Utc};
use sqlx::PgConnection;
use tracing::{Instrument, instrument};

use crate::model::{
    apperror::{ApplicationError, ErrorType},
    models::{
        BeneficiaryAddInputType, BeneficiaryDetailType, BoothAddInputType, BoothDetailType, CitizenAddInputType, CitizenDetailType, IssueAddInputType, IssueDetailType, SchemeAddInputType,
        SchemeDetailType, StreetAddInputType, StreetDetailType, UserAddInputType, UserDetailType,
    },
};

/**
 * Database response type for booth rows.
 */
pub type QueryBoothDbResp = (i64, String, String, DateTime<Utc>);

/**
 * Database response type for street rows.
 */
pub type QueryStreetDbResp = (i64, String, i64, DateTime<Utc>);

/**
 * Database response type for citizen rows.
 */
pub type QueryCitizenDbResp = (i64, String, i32, String, String, String, bool, String, i64, DateTime<Utc>);

/**
 * Database response type for scheme rows.
 */
pub type QuerySchemeDbResp = (i64, String, String, DateTime<Utc>);

/**
 * Database response type for beneficiary rows.
 */
pub type QueryBeneficiaryDbResp = (i64, i64, i64, DateTime<Utc>);

/**
 * Database response type for issue rows.
 */
pub type QueryIssueDbResp = (i64, String, String, String, i64, DateTime<Utc>);

/**
 * Database response type for user rows.
 */
pub type QueryUserDbResp = (i64, String, String, DateTime<Utc>);

const ADD_BOOTH: &str = "INSERT INTO booths (name, ward) VALUES ($1, $2) RETURNING id, name, ward, created_at";
const QUERY_BOOTH_LIST: &str = "SELECT id, name, ward, created_at FROM booths ORDER BY id";

const ADD_STREET: &str = "INSERT INTO streets (name, booth_id) VALUES ($1, $2) RETURNING id, name, booth_id, created_at";
const QUERY_STREET_LIST: &str = "SELECT id, name, booth_id, created_at FROM streets ORDER BY id";

const ADD_CITIZEN: &str = "INSERT INTO citizens (name, age, gender, mobile, occupation, consent, segment, street_id) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                           RETURNING id, name, age, gender, mobile, occupation, consent, segment, street_id, created_at";
const QUERY_CITIZEN_LIST: &str = "SELECT id, name, age, gender, mobile, occupation, consent, segment, street_id, created_at FROM citizens ORDER BY id";
const QUERY_CITIZEN_LIST_BY_STREET: &str = "SELECT id, name, age, gender, mobile, occupation, consent, segment, street_id, created_at FROM citizens WHERE street_id = $1 ORDER BY id";

const ADD_SCHEME: &str = "INSERT INTO schemes (name, description) VALUES ($1, $2) RETURNING id, name, description, created_at";
const QUERY_SCHEME_LIST: &str = "SELECT id, name, description, created_at FROM schemes ORDER BY id";
const QUERY_SCHEME: &str = "SELECT id, name, description, created_at FROM schemes WHERE id = $1";

const ADD_BENEFICIARY: &str = "INSERT INTO beneficiaries (citizen_id, scheme_id) VALUES ($1, $2) RETURNING id, citizen_id, scheme_id, created_at";
const QUERY_BENEFICIARY_LIST: &str = "SELECT id, citizen_id, scheme_id, created_at FROM beneficiaries ORDER BY id";

const ADD_ISSUE: &str = "INSERT INTO issues (description, category, status, street_id) VALUES ($1, $2, $3, $4) RETURNING id, description, category, status, street_id, created_at";
const QUERY_ISSUE_LIST_BY_STREET: &str = "SELECT id, description, category, status, street_id, created_at FROM issues WHERE street_id = $1 ORDER BY id";

const COUNT_CONSENTING_CITIZENS: &str = "SELECT COUNT(*) FROM citizens WHERE street_id = $1 AND consent = TRUE";
const ADD_NOTIFICATION: &str = "INSERT INTO notifications (message, street_id) VALUES ($1, $2) RETURNING id";

const ADD_USER: &str = "INSERT INTO users (username, role) VALUES ($1, $2) RETURNING id, username, role, created_at";
const QUERY_USER_LIST: &str = "SELECT id, username, role, created_at FROM users ORDER BY id";

const BOOTH_EXISTS: &str = "SELECT EXISTS (SELECT 1 FROM booths WHERE id = $1)";
const STREET_EXISTS: &str = "SELECT EXISTS (SELECT 1 FROM streets WHERE id = $1)";

/**
 * DAO for creating and listing the governance records.
 */
pub struct RegistryDao {}

impl RegistryDao {
    /**
     * Creates a new instance of `RegistryDao`.
     *
     * # Returns
     * A new instance of `RegistryDao`.
     */
    pub fn new() -> Self {
        RegistryDao {}
    }

    /**
     * Adds a new booth.
     *
     * # Arguments
     * `transaction`: The database transaction to execute the query within.
     * `booth_add_input`: Name and ward of the booth.
     *
     * # Returns
     * The stored booth including its generated id.
     */
    #[instrument(skip(self, transaction), fields(result))]
    pub async fn add_booth(&self, transaction: &mut PgConnection, booth_add_input: BoothAddInputType) -> Result<BoothDetailType, ApplicationError> {
        let span = tracing::Span::current();
        let row: QueryBoothDbResp = sqlx::query_as(ADD_BOOTH)
            .bind(booth_add_input.name)
            .bind(booth_add_input.ward)
            .fetch_one(transaction)
            .instrument(span)
            .await
            .map_err(|err| handle_database_error(err.as_database_error()))?;
        Ok(BoothDetailType::from(row))
    }

    /**
     * Retrieves all booths in insertion order.
     */
    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_booth_list(&self, connection: &mut PgConnection) -> Result<Vec<BoothDetailType>, ApplicationError> {
        let span = tracing::Span::current();
        let results: Vec<QueryBoothDbResp> = sqlx::query_as(QUERY_BOOTH_LIST)
            .fetch_all(connection)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to get booth list: {err}")))?;
        Ok(results.into_iter().map(BoothDetailType::from).collect())
    }

    /**
     * Adds a new street to an existing booth.
     *
     * # Returns
     * The stored street, or `NotFound` when the booth does not exist.
     */
    #[instrument(skip(self, transaction), fields(result))]
    pub async fn add_street(&self, transaction: &mut PgConnection, street_add_input: StreetAddInputType) -> Result<StreetDetailType, ApplicationError> {
        let span = tracing::Span::current();
        let row: QueryStreetDbResp = sqlx::query_as(ADD_STREET)
            .bind(street_add_input.name)
            .bind(street_add_input.booth_id)
            .fetch_one(transaction)
            .instrument(span)
            .await
            .map_err(|err| handle_database_error(err.as_database_error()))?;
        Ok(StreetDetailType::from(row))
    }

    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_street_list(&self, connection: &mut PgConnection) -> Result<Vec<StreetDetailType>, ApplicationError> {
        let span = tracing::Span::current();
        let results: Vec<QueryStreetDbResp> = sqlx::query_as(QUERY_STREET_LIST)
            .fetch_all(connection)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to get street list: {err}")))?;
        Ok(results.into_iter().map(StreetDetailType::from).collect())
    }

    /**
     * Adds a new citizen. The segment is derived from age and occupation before insert.
     *
     * # Arguments
     * `transaction`: The database transaction to execute the query within.
     * `citizen_add_input`: The citizen details.
     *
     * # Returns
     * The stored citizen, or `NotFound` when the street does not exist.
     */
    #[instrument(skip(self, transaction), fields(result))]
    pub async fn add_citizen(&self, transaction: &mut PgConnection, citizen_add_input: CitizenAddInputType) -> Result<CitizenDetailType, ApplicationError> {
        let span = tracing::Span::current();
        let segment = citizen_add_input.segment();
        let row: QueryCitizenDbResp = sqlx::query_as(ADD_CITIZEN)
            .bind(citizen_add_input.name)
            .bind(citizen_add_input.age)
            .bind(citizen_add_input.gender)
            .bind(citizen_add_input.mobile)
            .bind(citizen_add_input.occupation)
            .bind(citizen_add_input.consent)
            .bind(segment.as_str())
            .bind(citizen_add_input.street_id)
            .fetch_one(transaction)
            .instrument(span)
            .await
            .map_err(|err| handle_database_error(err.as_database_error()))?;
        CitizenDetailType::try_from(row)
    }

    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_citizen_list(&self, connection: &mut PgConnection) -> Result<Vec<CitizenDetailType>, ApplicationError> {
        let span = tracing::Span::current();
        let results: Vec<QueryCitizenDbResp> = sqlx::query_as(QUERY_CITIZEN_LIST)
            .fetch_all(connection)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to get citizen list: {err}")))?;
        results.into_iter().map(CitizenDetailType::try_from).collect()
    }

    /**
     * Retrieves the citizens living on a street.
     */
    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_citizen_list_by_street(&self, connection: &mut PgConnection, street_id: i64) -> Result<Vec<CitizenDetailType>, ApplicationError> {
        let span = tracing::Span::current();
        let results: Vec<QueryCitizenDbResp> = sqlx::query_as(QUERY_CITIZEN_LIST_BY_STREET)
            .bind(street_id)
            .fetch_all(connection)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to get citizens of street: {err}")))?;
        results.into_iter().map(CitizenDetailType::try_from).collect()
    }

    #[instrument(skip(self, transaction), fields(result))]
    pub async fn add_scheme(&self, transaction: &mut PgConnection, scheme_add_input: SchemeAddInputType) -> Result<SchemeDetailType, ApplicationError> {
        let span = tracing::Span::current();
        let row: QuerySchemeDbResp = sqlx::query_as(ADD_SCHEME)
            .bind(scheme_add_input.name)
            .bind(scheme_add_input.description)
            .fetch_one(transaction)
            .instrument(span)
            .await
            .map_err(|err| handle_database_error(err.as_database_error()))?;
        Ok(SchemeDetailType::from(row))
    }

    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_scheme_list(&self, connection: &mut PgConnection) -> Result<Vec<SchemeDetailType>, ApplicationError> {
        let span = tracing::Span::current();
        let results: Vec<QuerySchemeDbResp> = sqlx::query_as(QUERY_SCHEME_LIST)
            .fetch_all(connection)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to get scheme list: {err}")))?;
        Ok(results.into_iter().map(SchemeDetailType::from).collect())
    }

    /**
     * Retrieves a single scheme.
     *
     * # Returns
     * The scheme, or `NotFound`.
     */
    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_scheme(&self, connection: &mut PgConnection, scheme_id: i64) -> Result<SchemeDetailType, ApplicationError> {
        let span = tracing::Span::current();
        let row: Option<QuerySchemeDbResp> = sqlx::query_as(QUERY_SCHEME)
            .bind(scheme_id)
            .fetch_optional(connection)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to get scheme: {err}")))?;
        let Some(row) = row else {
            tracing::debug!("Scheme with ID {} not found", scheme_id);
            return Err(ApplicationError::new(ErrorType::NotFound, "Scheme not found".to_string()));
        };
        Ok(SchemeDetailType::from(row))
    }

    /**
     * Enrolls a citizen in a scheme.
     *
     * # Returns
     * The stored enrollment. `NotFound` when the citizen or scheme is missing,
     * `ConstraintViolation` when the citizen is already enrolled.
     */
    #[instrument(skip(self, transaction), fields(result))]
    pub async fn add_beneficiary(&self, transaction: &mut PgConnection, beneficiary_add_input: BeneficiaryAddInputType) -> Result<BeneficiaryDetailType, ApplicationError> {
        let span = tracing::Span::current();
        let row: QueryBeneficiaryDbResp = sqlx::query_as(ADD_BENEFICIARY)
            .bind(beneficiary_add_input.citizen_id)
            .bind(beneficiary_add_input.scheme_id)
            .fetch_one(transaction)
            .instrument(span)
            .await
            .map_err(|err| handle_database_error(err.as_database_error()))?;
        Ok(BeneficiaryDetailType::from(row))
    }

    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_beneficiary_list(&self, connection: &mut PgConnection) -> Result<Vec<BeneficiaryDetailType>, ApplicationError> {
        let span = tracing::Span::current();
        let results: Vec<QueryBeneficiaryDbResp> = sqlx::query_as(QUERY_BENEFICIARY_LIST)
            .fetch_all(connection)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to get beneficiary list: {err}")))?;
        Ok(results.into_iter().map(BeneficiaryDetailType::from).collect())
    }

    /**
     * Reports a new issue on a street. New issues always start as `Open`.
     */
    #[instrument(skip(self, transaction), fields(result))]
    pub async fn add_issue(&self, transaction: &mut PgConnection, issue_add_input: IssueAddInputType, status: &str) -> Result<IssueDetailType, ApplicationError> {
        let span = tracing::Span::current();
        let row: QueryIssueDbResp = sqlx::query_as(ADD_ISSUE)
            .bind(issue_add_input.description)
            .bind(issue_add_input.category)
            .bind(status)
            .bind(issue_add_input.street_id)
            .fetch_one(transaction)
            .instrument(span)
            .await
            .map_err(|err| handle_database_error(err.as_database_error()))?;
        Ok(IssueDetailType::from(row))
    }

    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_issue_list_by_street(&self, connection: &mut PgConnection, street_id: i64) -> Result<Vec<IssueDetailType>, ApplicationError> {
        let span = tracing::Span::current();
        let results: Vec<QueryIssueDbResp> = sqlx::query_as(QUERY_ISSUE_LIST_BY_STREET)
            .bind(street_id)
            .fetch_all(connection)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to get issues of street: {err}")))?;
        Ok(results.into_iter().map(IssueDetailType::from).collect())
    }

    /**
     * Counts the citizens on a street who consented to be contacted.
     */
    #[instrument(skip(self, connection), fields(result))]
    pub async fn count_consenting_citizens(&self, connection: &mut PgConnection, street_id: i64) -> Result<i64, ApplicationError> {
        let span = tracing::Span::current();
        sqlx::query_scalar(COUNT_CONSENTING_CITIZENS)
            .bind(street_id)
            .fetch_one(connection)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to count consenting citizens: {err}")))
    }

    /**
     * Records a sent notification.
     *
     * # Returns
     * The id of the notification row, or `NotFound` when the street does not exist.
     */
    #[instrument(skip(self, transaction), fields(result))]
    pub async fn add_notification(&self, transaction: &mut PgConnection, street_id: i64, message: &str) -> Result<i64, ApplicationError> {
        let span = tracing::Span::current();
        sqlx::query_scalar(ADD_NOTIFICATION)
            .bind(message)
            .bind(street_id)
            .fetch_one(transaction)
            .instrument(span)
            .await
            .map_err(|err| handle_database_error(err.as_database_error()))
    }

    #[instrument(skip(self, transaction), fields(result))]
    pub async fn add_user(&self, transaction: &mut PgConnection, user_add_input: UserAddInputType) -> Result<UserDetailType, ApplicationError> {
        let span = tracing::Span::current();
        let row: QueryUserDbResp = sqlx::query_as(ADD_USER)
            .bind(user_add_input.username)
            .bind(user_add_input.role)
            .fetch_one(transaction)
            .instrument(span)
            .await
            .map_err(|err| handle_database_error(err.as_database_error()))?;
        Ok(UserDetailType::from(row))
    }

    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_user_list(&self, connection: &mut PgConnection) -> Result<Vec<UserDetailType>, ApplicationError> {
        let span = tracing::Span::current();
        let results: Vec<QueryUserDbResp> = sqlx::query_as(QUERY_USER_LIST)
            .fetch_all(connection)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to get user list: {err}")))?;
        Ok(results.into_iter().map(UserDetailType::from).collect())
    }

    /**
     * Fails with `NotFound` unless the booth exists.
     */
    #[instrument(skip(self, connection), fields(result))]
    pub async fn ensure_booth_exists(&self, connection: &mut PgConnection, booth_id: i64) -> Result<(), ApplicationError> {
        let span = tracing::Span::current();
        let exists: bool = sqlx::query_scalar(BOOTH_EXISTS)
            .bind(booth_id)
            .fetch_one(connection)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to check booth: {err}")))?;
        if !exists {
            tracing::debug!("Booth with ID {} not found", booth_id);
            return Err(ApplicationError::new(ErrorType::NotFound, "Booth not found".to_string()));
        }
        Ok(())
    }

    /**
     * Fails with `NotFound` unless the street exists.
     */
    #[instrument(skip(self, connection), fields(result))]
    pub async fn ensure_street_exists(&self, connection: &mut PgConnection, street_id: i64) -> Result<(), ApplicationError> {
        let span = tracing::Span::current();
        let exists: bool = sqlx::query_scalar(STREET_EXISTS)
            .bind(street_id)
            .fetch_one(connection)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to check street: {err}")))?;
        if !exists {
            tracing::debug!("Street with ID {} not found", street_id);
            return Err(ApplicationError::new(ErrorType::NotFound, "Street not found".to_string()));
        }
        Ok(())
    }
}

/**
 * Handles database errors and maps them to application errors.
 *
 * # Arguments
 * `error`: The database error to handle.
 *
 * # Returns
 * An `ApplicationError` corresponding to the database error.
 */
pub fn handle_database_error(error: Option<&dyn sqlx::error::DatabaseError>) -> ApplicationError {
    if let Some(db_error) = error {
        tracing::debug!("Database error: {}", db_error);
        map_database_error_code(db_error.code())
    } else {
        ApplicationError::new(ErrorType::DatabaseError, "Failed to execute database operation".to_string())
    }
}

/**
 * Maps a Postgres SQLSTATE code to an application error.
 */
fn map_database_error_code(code: Option<Cow<'_, str>>) -> ApplicationError {
    match code.as_deref() {
        // Unique violation
        Some("23505") => ApplicationError::new(ErrorType::ConstraintViolation, "Already exists".to_string()),
        // Foreign key violation
        Some("23503") => ApplicationError::new(ErrorType::NotFound, "Referenced record not found".to_string()),
        // Value too long
        Some("22001") => ApplicationError::new(ErrorType::Validation, "Value too long".to_string()),
        // Check violation
        Some("23514") => ApplicationError::new(ErrorType::Validation, "Value out of range".to_string()),
        other => {
            tracing::error!("Unhandled database error code: {:?}", other);
            ApplicationError::new(ErrorType::DatabaseError, "Unhandled database error".to_string())
        }
    }
}

impl From<QueryBoothDbResp> for BoothDetailType {
    fn from(row: QueryBoothDbResp) -> Self {
        BoothDetailType { id: row.0, name: row.1, ward: row.2, created_at: row.3 }
    }
}

impl From<QueryStreetDbResp> for StreetDetailType {
    fn from(row: QueryStreetDbResp) -> Self {
        StreetDetailType { id: row.0, name: row.1, booth_id: row.2, created_at: row.3 }
    }
}

impl TryFrom<QueryCitizenDbResp> for CitizenDetailType {
    type Error = ApplicationError;

    fn try_from(row: QueryCitizenDbResp) -> Result<Self, Self::Error> {
        let segment = row.7.parse().map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Invalid citizen row {}: {err}", row.0)))?;
        Ok(CitizenDetailType { id: row.0, name: row.1, age: row.2, gender: row.3, mobile: row.4, occupation: row.5, consent: row.6, segment, street_id: row.8, created_at: row.9 })
    }
}

impl From<QuerySchemeDbResp> for SchemeDetailType {
    fn from(row: QuerySchemeDbResp) -> Self {
        SchemeDetailType { id: row.0, name: row.1, description: row.2, created_at: row.3 }
    }
}

impl From<QueryBeneficiaryDbResp> for BeneficiaryDetailType {
    fn from(row: QueryBeneficiaryDbResp) -> Self {
        BeneficiaryDetailType { id: row.0, citizen_id: row.1, scheme_id: row.2, created_at: row.3 }
    }
}

impl From<QueryIssueDbResp> for IssueDetailType {
    fn from(row: QueryIssueDbResp) -> Self {
        IssueDetailType { id: row.0, description: row.1, category: row.2, status: row.3, street_id: row.4, created_at: row.5 }
    }
}

impl From<QueryUserDbResp> for UserDetailType {
    fn from(row: QueryUserDbResp) -> Self {
        UserDetailType { id: row.0, username: row.1, role: row.2, created_at: row.3 }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::service::segment::Segment;

    #[test]
    fn test_foreign_key_violation_is_not_found() {
        let err = map_database_error_code(Some(Cow::Borrowed("23503")));
        assert_eq!(err.error_type, ErrorType::NotFound);
    }

    #[test]
    fn test_unique_violation_is_constraint_violation() {
        let err = map_database_error_code(Some(Cow::Borrowed("23505")));
        assert_eq!(err.error_type, ErrorType::ConstraintViolation);
    }

    #[test]
    fn test_value_errors_are_validation() {
        assert_eq!(map_database_error_code(Some(Cow::Borrowed("22001"))).error_type, ErrorType::Validation);
        assert_eq!(map_database_error_code(Some(Cow::Borrowed("23514"))).error_type, ErrorType::Validation);
    }

    #[test]
    fn test_unknown_code_is_database_error() {
        assert_eq!(map_database_error_code(Some(Cow::Borrowed("40001"))).error_type, ErrorType::DatabaseError);
        assert_eq!(map_database_error_code(None).error_type, ErrorType::DatabaseError);
        assert_eq!(handle_database_error(None).error_type, ErrorType::DatabaseError);
    }

    #[test]
    fn test_citizen_row_with_unknown_segment_is_rejected() {
        let row: QueryCitizenDbResp = (1, "Ravi".to_string(), 40, "M".to_string(), "123".to_string(), "Tailor".to_string(), true, "Retired".to_string(), 1, Utc::now());
        assert!(CitizenDetailType::try_from(row.clone()).is_err());
        let mut valid = row;
        valid.7 = "MSME Owner".to_string();
        assert_eq!(CitizenDetailType::try_from(valid).unwrap().segment, Segment::MsmeOwner);
    }
}

#[cfg(feature = "integration-test")]
#[cfg(test)]
mod integration_test {
    use super::*;
    use sqlx::PgPool;

    #[sqlx::test]
    async fn test_add_and_list_booth_street_citizen() {
        let pool = init_db().await;
        let mut transaction = pool.begin().await.unwrap();
        let registry_dao = RegistryDao::new();
        let booth = registry_dao.add_booth(&mut transaction, BoothAddInputType { name: "B1".to_string(), ward: "W1".to_string() }).await.unwrap();
        let street = registry_dao.add_street(&mut transaction, StreetAddInputType { name: "S1".to_string(), booth_id: booth.id }).await.unwrap();
        assert_eq!(street.booth_id, booth.id);
        let citizen_add_input = CitizenAddInputType {
            name: "Asha".to_string(),
            age: 25,
            gender: "F".to_string(),
            mobile: "9999999999".to_string(),
            occupation: "Farmer".to_string(),
            consent: true,
            street_id: street.id,
        };
        let citizen = registry_dao.add_citizen(&mut transaction, citizen_add_input).await.unwrap();
        assert_eq!(citizen.segment.as_str(), "Youth");
        let citizens = registry_dao.get_citizen_list_by_street(&mut transaction, street.id).await.unwrap();
        assert_eq!(citizens.len(), 1);
        assert_eq!(citizens[0].id, citizen.id);
        transaction.rollback().await.unwrap(); // Rollback the transaction to avoid leaving test data in the database
    }

    #[sqlx::test]
    async fn test_add_street_with_missing_booth_is_not_found() {
        let pool = init_db().await;
        let mut transaction = pool.begin().await.unwrap();
        let registry_dao = RegistryDao::new();
        let result = registry_dao.add_street(&mut transaction, StreetAddInputType { name: "S1".to_string(), booth_id: i64::MAX }).await;
        assert_eq!(result.unwrap_err().error_type, ErrorType::NotFound);
        transaction.rollback().await.unwrap();
    }

    #[sqlx::test]
    async fn test_issue_defaults_and_missing_scheme() {
        let pool = init_db().await;
        let mut transaction = pool.begin().await.unwrap();
        let registry_dao = RegistryDao::new();
        let booth = registry_dao.add_booth(&mut transaction, BoothAddInputType { name: "B1".to_string(), ward: "W1".to_string() }).await.unwrap();
        let street = registry_dao.add_street(&mut transaction, StreetAddInputType { name: "S1".to_string(), booth_id: booth.id }).await.unwrap();
        let issue = registry_dao
            .add_issue(&mut transaction, IssueAddInputType { description: "Broken streetlight".to_string(), category: "Electricity".to_string(), street_id: street.id }, "Open")
            .await
            .unwrap();
        assert_eq!(issue.status, "Open");
        let scheme = registry_dao.get_scheme(&mut transaction, i64::MAX).await;
        assert_eq!(scheme.unwrap_err().error_type, ErrorType::NotFound);
        transaction.rollback().await.unwrap();
    }

    /**
     * Initialize the database connection pool.
     */
    async fn init_db() -> PgPool {
        dotenv::from_filename("./sqlx-postgresql-migration/.env-test").ok();
        let pool = PgPool::connect(dotenv::var("DATABASE_URL").unwrap().as_str()).await.unwrap();
        sqlx::migrate!("./sqlx-postgresql-migration/migrations").run(&pool).await.unwrap();
        pool
    }
}
