use sqlx::PgConnection;
use tracing::{Instrument, instrument};

use crate::model::apperror::{ApplicationError, ErrorType};

/**
 * Database response type for per-street coverage counts: street id, street name, citizens, beneficiaries.
 */
pub type QueryStreetCoverageDbResp = (i64, String, i64, i64);

/**
 * Database response type for the segment distribution: segment label and citizen count.
 */
pub type QuerySegmentCountDbResp = (String, i64);

const COUNT_CITIZENS: &str = "SELECT COUNT(*) FROM citizens";

const COUNT_SCHEME_BENEFICIARIES: &str = "SELECT COUNT(*) FROM beneficiaries WHERE scheme_id = $1";

const QUERY_ELIGIBLE_CITIZEN_IDS: &str = "SELECT id FROM citizens WHERE ($1::text IS NULL OR segment = $1) ORDER BY id";

const QUERY_SCHEME_BENEFICIARY_CITIZEN_IDS: &str = "SELECT citizen_id FROM beneficiaries WHERE scheme_id = $1 ORDER BY citizen_id";

const COUNT_BOOTH_STREETS: &str = "SELECT COUNT(*) FROM streets WHERE booth_id = $1";

const COUNT_BOOTH_CITIZENS: &str = "SELECT COUNT(*) FROM citizens c JOIN streets s ON c.street_id = s.id WHERE s.booth_id = $1";

const COUNT_BOOTH_BENEFICIARIES: &str = "SELECT COUNT(*) FROM beneficiaries b
                                         JOIN citizens c ON b.citizen_id = c.id
                                         JOIN streets s ON c.street_id = s.id
                                         WHERE s.booth_id = $1 AND ($2::bigint IS NULL OR b.scheme_id = $2)";

const QUERY_STREET_COVERAGE: &str = "SELECT s.id, s.name, COUNT(DISTINCT c.id) AS citizens, COUNT(b.id) AS beneficiaries
                                     FROM streets s
                                     LEFT JOIN citizens c ON c.street_id = s.id
                                     LEFT JOIN beneficiaries b ON b.citizen_id = c.id AND b.scheme_id = $2
                                     WHERE s.booth_id = $1
                                     GROUP BY s.id, s.name
                                     ORDER BY s.id";

const QUERY_SEGMENT_DISTRIBUTION: &str = "SELECT c.segment, COUNT(c.id) FROM citizens c
                                          JOIN streets s ON c.street_id = s.id
                                          WHERE s.booth_id = $1
                                          GROUP BY c.segment
                                          ORDER BY c.segment";

/**
 * DAO for the read-only aggregate queries behind the coverage statistics.
 */
pub struct CoverageDao {}

impl CoverageDao {
    /**
     * Creates a new instance of `CoverageDao`.
     */
    pub fn new() -> Self {
        CoverageDao {}
    }

    /**
     * Counts all citizens in the system.
     */
    #[instrument(skip(self, connection), fields(result))]
    pub async fn count_citizens(&self, connection: &mut PgConnection) -> Result<i64, ApplicationError> {
        let span = tracing::Span::current();
        sqlx::query_scalar(COUNT_CITIZENS)
            .fetch_one(connection)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to count citizens: {err}")))
    }

    /**
     * Counts the enrollments of a scheme.
     */
    #[instrument(skip(self, connection), fields(result))]
    pub async fn count_scheme_beneficiaries(&self, connection: &mut PgConnection, scheme_id: i64) -> Result<i64, ApplicationError> {
        let span = tracing::Span::current();
        sqlx::query_scalar(COUNT_SCHEME_BENEFICIARIES)
            .bind(scheme_id)
            .fetch_one(connection)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to count scheme beneficiaries: {err}")))
    }

    /**
     * Retrieves the ids of citizens eligible for a scheme.
     *
     * # Arguments
     * `connection`: The database connection.
     * `segment`: Segment label to restrict to, or `None` for every citizen.
     *
     * # Returns
     * Citizen ids ordered by id.
     */
    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_eligible_citizen_ids(&self, connection: &mut PgConnection, segment: Option<&str>) -> Result<Vec<i64>, ApplicationError> {
        let span = tracing::Span::current();
        sqlx::query_scalar(QUERY_ELIGIBLE_CITIZEN_IDS)
            .bind(segment)
            .fetch_all(connection)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to get eligible citizens: {err}")))
    }

    /**
     * Retrieves the ids of citizens enrolled in a scheme.
     */
    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_beneficiary_citizen_ids(&self, connection: &mut PgConnection, scheme_id: i64) -> Result<Vec<i64>, ApplicationError> {
        let span = tracing::Span::current();
        sqlx::query_scalar(QUERY_SCHEME_BENEFICIARY_CITIZEN_IDS)
            .bind(scheme_id)
            .fetch_all(connection)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to get scheme beneficiaries: {err}")))
    }

    #[instrument(skip(self, connection), fields(result))]
    pub async fn count_booth_streets(&self, connection: &mut PgConnection, booth_id: i64) -> Result<i64, ApplicationError> {
        let span = tracing::Span::current();
        sqlx::query_scalar(COUNT_BOOTH_STREETS)
            .bind(booth_id)
            .fetch_one(connection)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to count booth streets: {err}")))
    }

    /**
     * Counts the citizens living on the streets of a booth.
     */
    #[instrument(skip(self, connection), fields(result))]
    pub async fn count_booth_citizens(&self, connection: &mut PgConnection, booth_id: i64) -> Result<i64, ApplicationError> {
        let span = tracing::Span::current();
        sqlx::query_scalar(COUNT_BOOTH_CITIZENS)
            .bind(booth_id)
            .fetch_one(connection)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to count booth citizens: {err}")))
    }

    /**
     * Counts the enrollments of the citizens of a booth.
     *
     * # Arguments
     * `connection`: The database connection.
     * `booth_id`: The booth.
     * `scheme_id`: Restrict to one scheme, or `None` for all schemes.
     */
    #[instrument(skip(self, connection), fields(result))]
    pub async fn count_booth_beneficiaries(&self, connection: &mut PgConnection, booth_id: i64, scheme_id: Option<i64>) -> Result<i64, ApplicationError> {
        let span = tracing::Span::current();
        sqlx::query_scalar(COUNT_BOOTH_BENEFICIARIES)
            .bind(booth_id)
            .bind(scheme_id)
            .fetch_one(connection)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to count booth beneficiaries: {err}")))
    }

    /**
     * Retrieves citizen and enrollment counts for every street of a booth, ordered by street id.
     * Streets without citizens are included with zero counts.
     */
    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_street_coverage_counts(&self, connection: &mut PgConnection, booth_id: i64, scheme_id: i64) -> Result<Vec<QueryStreetCoverageDbResp>, ApplicationError> {
        let span = tracing::Span::current();
        sqlx::query_as(QUERY_STREET_COVERAGE)
            .bind(booth_id)
            .bind(scheme_id)
            .fetch_all(connection)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to get street coverage: {err}")))
    }

    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_segment_counts(&self, connection: &mut PgConnection, booth_id: i64) -> Result<Vec<QuerySegmentCountDbResp>, ApplicationError> {
        let span = tracing::Span::current();
        sqlx::query_as(QUERY_SEGMENT_DISTRIBUTION)
            .bind(booth_id)
            .fetch_all(connection)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to get segment distribution: {err}")))
    }
}
