use sqlx::{Pool, Postgres, pool::PoolConnection};

use crate::{
    dao::registry::RegistryDao,
    model::{
        apperror::{ApplicationError, ErrorType},
        models::{
            BeneficiaryAddInputType, BeneficiaryDetailType, BoothAddInputType, BoothDetailType, CitizenAddInputType, CitizenDetailType, DEFAULT_ISSUE_STATUS, IssueAddInputType, IssueDetailType,
            NotificationSendInputType, NotificationSentOutputType, SchemeAddInputType, SchemeDetailType, StreetAddInputType, StreetDetailType, UserAddInputType, UserDetailType,
        },
    },
};

/**
 * Runs one write inside its own transaction. Commits on success and rolls back on failure.
 */
macro_rules! in_transaction {
    ($pool:expr, |$transaction:ident| $body:expr) => {{
        let mut $transaction = $pool.begin().await.map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to begin transaction: {err}")))?;
        let result = $body.await;
        match result {
            Ok(value) => {
                $transaction.commit().await.map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to commit transaction: {err}")))?;
                Ok(value)
            }
            Err(err) => {
                let rollback = $transaction.rollback().await;
                Err(after_rollback(err, rollback))
            }
        }
    }};
}

/**
 * Picks the error to report once a failed write has been rolled back.
 * The error of the write always wins; a failing rollback is only logged.
 */
fn after_rollback(err: ApplicationError, rollback: Result<(), sqlx::Error>) -> ApplicationError {
    if let Err(rollback_err) = rollback {
        tracing::error!("Failed to rollback transaction after \"{}\": {}", err, rollback_err);
    }
    err
}

/**
 * Represents the service for creating and listing governance records.
 */
pub struct RegistryService {
    /**
     * The DAO for record operations.
     */
    registry_dao: RegistryDao,
    /**
     * Optional connection pool for database operations. Optional for test purposes until we have a better way to mock the database.
     */
    connection_pool: Option<Pool<Postgres>>,
}

impl RegistryService {
    /**
     * Creates a new instance of `RegistryService`.
     *
     * # Arguments
     * `registry_dao`: The DAO for record operations.
     * `connection_pool`: Optional connection pool for database operations.
     */
    pub fn new(registry_dao: RegistryDao, connection_pool: Option<Pool<Postgres>>) -> Self {
        RegistryService { registry_dao, connection_pool }
    }

    fn pool(&self) -> Result<&Pool<Postgres>, ApplicationError> {
        self.connection_pool.as_ref().ok_or_else(|| ApplicationError::new(ErrorType::DatabaseError, "No database connection available".to_string()))
    }

    async fn connection(&self) -> Result<PoolConnection<Postgres>, ApplicationError> {
        self.pool()?.acquire().await.map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to acquire connection: {err}")))
    }

    pub async fn add_booth(&self, booth_add_input: BoothAddInputType) -> Result<BoothDetailType, ApplicationError> {
        in_transaction!(self.pool()?, |transaction| self.registry_dao.add_booth(&mut transaction, booth_add_input))
    }

    pub async fn get_booth_list(&self) -> Result<Vec<BoothDetailType>, ApplicationError> {
        let mut connection = self.connection().await?;
        self.registry_dao.get_booth_list(&mut connection).await
    }

    pub async fn add_street(&self, street_add_input: StreetAddInputType) -> Result<StreetDetailType, ApplicationError> {
        in_transaction!(self.pool()?, |transaction| self.registry_dao.add_street(&mut transaction, street_add_input))
    }

    pub async fn get_street_list(&self) -> Result<Vec<StreetDetailType>, ApplicationError> {
        let mut connection = self.connection().await?;
        self.registry_dao.get_street_list(&mut connection).await
    }

    /**
     * Registers a citizen. The segment is derived, never taken from the caller.
     */
    pub async fn add_citizen(&self, citizen_add_input: CitizenAddInputType) -> Result<CitizenDetailType, ApplicationError> {
        in_transaction!(self.pool()?, |transaction| self.registry_dao.add_citizen(&mut transaction, citizen_add_input))
    }

    pub async fn get_citizen_list(&self) -> Result<Vec<CitizenDetailType>, ApplicationError> {
        let mut connection = self.connection().await?;
        self.registry_dao.get_citizen_list(&mut connection).await
    }

    /**
     * Retrieves the citizens of a street.
     *
     * # Returns
     * The citizens in insertion order, or `NotFound` when the street does not exist.
     */
    pub async fn get_citizen_list_by_street(&self, street_id: i64) -> Result<Vec<CitizenDetailType>, ApplicationError> {
        let mut connection = self.connection().await?;
        self.registry_dao.ensure_street_exists(&mut connection, street_id).await?;
        self.registry_dao.get_citizen_list_by_street(&mut connection, street_id).await
    }

    pub async fn add_scheme(&self, scheme_add_input: SchemeAddInputType) -> Result<SchemeDetailType, ApplicationError> {
        in_transaction!(self.pool()?, |transaction| self.registry_dao.add_scheme(&mut transaction, scheme_add_input))
    }

    pub async fn get_scheme_list(&self) -> Result<Vec<SchemeDetailType>, ApplicationError> {
        let mut connection = self.connection().await?;
        self.registry_dao.get_scheme_list(&mut connection).await
    }

    pub async fn add_beneficiary(&self, beneficiary_add_input: BeneficiaryAddInputType) -> Result<BeneficiaryDetailType, ApplicationError> {
        in_transaction!(self.pool()?, |transaction| self.registry_dao.add_beneficiary(&mut transaction, beneficiary_add_input))
    }

    pub async fn get_beneficiary_list(&self) -> Result<Vec<BeneficiaryDetailType>, ApplicationError> {
        let mut connection = self.connection().await?;
        self.registry_dao.get_beneficiary_list(&mut connection).await
    }

    pub async fn add_issue(&self, issue_add_input: IssueAddInputType) -> Result<IssueDetailType, ApplicationError> {
        in_transaction!(self.pool()?, |transaction| self.registry_dao.add_issue(&mut transaction, issue_add_input, DEFAULT_ISSUE_STATUS))
    }

    /**
     * Retrieves the issues reported on a street, or `NotFound` when the street does not exist.
     */
    pub async fn get_issue_list_by_street(&self, street_id: i64) -> Result<Vec<IssueDetailType>, ApplicationError> {
        let mut connection = self.connection().await?;
        self.registry_dao.ensure_street_exists(&mut connection, street_id).await?;
        self.registry_dao.get_issue_list_by_street(&mut connection, street_id).await
    }

    /**
     * Records a notification to the consenting households of a street.
     * Nothing is transmitted; the result only reports how many households would be reached.
     *
     * # Arguments
     * `notification_send_input`: Street, message and the caller's role.
     *
     * # Returns
     * The recorded notification, `PermissionDenied` for non-admin callers,
     * or `NotFound` when the street does not exist.
     */
    pub async fn send_notification(&self, notification_send_input: NotificationSendInputType) -> Result<NotificationSentOutputType, ApplicationError> {
        notification_send_input.check_admin()?;
        let NotificationSendInputType { street_id, message, .. } = notification_send_input;
        let (notification_id, targeted_households) = in_transaction!(self.pool()?, |transaction| async {
            let targeted_households = self.registry_dao.count_consenting_citizens(&mut transaction, street_id).await?;
            let notification_id = self.registry_dao.add_notification(&mut transaction, street_id, &message).await?;
            Ok::<_, ApplicationError>((notification_id, targeted_households))
        })?;
        tracing::info!("Notification {} recorded for street {} reaching {} households", notification_id, street_id, targeted_households);
        Ok(NotificationSentOutputType { notification_id, street_id, message, targeted_households })
    }

    pub async fn add_user(&self, user_add_input: UserAddInputType) -> Result<UserDetailType, ApplicationError> {
        in_transaction!(self.pool()?, |transaction| self.registry_dao.add_user(&mut transaction, user_add_input))
    }

    pub async fn get_user_list(&self) -> Result<Vec<UserDetailType>, ApplicationError> {
        let mut connection = self.connection().await?;
        self.registry_dao.get_user_list(&mut connection).await
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[actix_web::test]
    async fn test_non_admin_is_denied_before_database_access() {
        let service = RegistryService::new(RegistryDao::new(), None);
        let input = NotificationSendInputType { street_id: 1, message: "Vaccination drive".to_string(), role: "volunteer".to_string() };
        let err = service.send_notification(input).await.unwrap_err();
        assert_eq!(err.error_type, ErrorType::PermissionDenied);
    }

    #[actix_web::test]
    async fn test_admin_without_database_fails_with_database_error() {
        let service = RegistryService::new(RegistryDao::new(), None);
        let input = NotificationSendInputType { street_id: 1, message: "Vaccination drive".to_string(), role: "admin".to_string() };
        let err = service.send_notification(input).await.unwrap_err();
        assert_eq!(err.error_type, ErrorType::DatabaseError);
    }

    #[test]
    fn test_rollback_failure_keeps_write_error() {
        let err = ApplicationError::new(ErrorType::ConstraintViolation, "Username already exists".to_string());
        let reported = after_rollback(err, Err(sqlx::Error::PoolClosed));
        assert_eq!(reported.error_type, ErrorType::ConstraintViolation);
        assert_eq!(reported.message, "Username already exists");
        let reported = after_rollback(ApplicationError::new(ErrorType::NotFound, "Street not found".to_string()), Ok(()));
        assert_eq!(reported.error_type, ErrorType::NotFound);
    }

    #[actix_web::test]
    async fn test_list_without_database_fails() {
        let service = RegistryService::new(RegistryDao::new(), None);
        assert_eq!(service.get_booth_list().await.unwrap_err().error_type, ErrorType::DatabaseError);
    }
}
