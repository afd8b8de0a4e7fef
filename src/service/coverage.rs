use std::collections::HashSet;

use rust_decimal::{Decimal, RoundingStrategy};
use sqlx::{PgConnection, Pool, Postgres, pool::PoolConnection};

use crate::{
    dao::{
        coverage::{CoverageDao, QuerySegmentCountDbResp, QueryStreetCoverageDbResp},
        registry::RegistryDao,
    },
    model::{
        apperror::{ApplicationError, ErrorType},
        models::{BoothCoverageOutputType, BoothSummaryOutputType, GapAnalysisOutputType, SchemeCoverageOutputType, SegmentDistributionOutputType, StreetCoverageOutputType},
    },
    service::segment::Segment,
};

/**
 * Decimal places kept in every percentage.
 */
const PERCENTAGE_SCALE: u32 = 2;

/**
 * Computes `part / total * 100` rounded to two decimals. A zero total yields zero.
 *
 * # Arguments
 * `part`: The counted subset.
 * `total`: The population size.
 *
 * # Returns
 * The percentage.
 */
pub fn percentage(part: i64, total: i64) -> Decimal {
    if total == 0 {
        return Decimal::ZERO;
    }
    (Decimal::from(part) * Decimal::ONE_HUNDRED / Decimal::from(total)).round_dp_with_strategy(PERCENTAGE_SCALE, RoundingStrategy::MidpointNearestEven)
}

/**
 * Segment a scheme targets, derived from its name. `None` means every citizen is eligible.
 */
pub fn eligible_segment(scheme_name: &str) -> Option<Segment> {
    let scheme_name = scheme_name.to_ascii_lowercase();
    if scheme_name.contains("farmer") {
        Some(Segment::Farmer)
    } else if scheme_name.contains("youth") {
        Some(Segment::Youth)
    } else {
        None
    }
}

/**
 * Builds the gap statistics of a scheme.
 *
 * # Arguments
 * `scheme_name`: Name of the scheme.
 * `eligible_ids`: Citizens eligible for the scheme.
 * `beneficiary_ids`: Citizens enrolled in the scheme, eligible or not.
 *
 * # Returns
 * The gap statistics. Not covered is the set difference of eligible and enrolled citizens.
 */
pub fn gap_analysis(scheme_name: String, eligible_ids: &[i64], beneficiary_ids: &[i64]) -> GapAnalysisOutputType {
    let eligible: HashSet<i64> = eligible_ids.iter().copied().collect();
    let enrolled: HashSet<i64> = beneficiary_ids.iter().copied().collect();
    let eligible_count = count(eligible.len());
    let not_covered_count = count(eligible.difference(&enrolled).count());
    GapAnalysisOutputType {
        scheme_name,
        eligible_count,
        beneficiary_count: count(beneficiary_ids.len()),
        not_covered_count,
        gap_percentage: percentage(not_covered_count, eligible_count),
    }
}

#[allow(clippy::cast_possible_wrap)]
fn count(len: usize) -> i64 {
    len as i64
}

impl From<QueryStreetCoverageDbResp> for StreetCoverageOutputType {
    fn from(row: QueryStreetCoverageDbResp) -> Self {
        let (street_id, street_name, total_citizens, beneficiaries) = row;
        StreetCoverageOutputType { street_id, street_name, total_citizens, beneficiaries, coverage_percentage: percentage(beneficiaries, total_citizens) }
    }
}

/**
 * Collects segment counts into a label keyed map.
 */
fn segment_distribution(rows: Vec<QuerySegmentCountDbResp>) -> SegmentDistributionOutputType {
    rows.into_iter().collect()
}

/**
 * Represents the service computing coverage and gap statistics.
 */
pub struct CoverageService {
    /**
     * The DAO for aggregate queries.
     */
    coverage_dao: CoverageDao,
    /**
     * The DAO for record lookups and existence checks.
     */
    registry_dao: RegistryDao,
    /**
     * Optional connection pool for database operations. Optional for test purposes until we have a better way to mock the database.
     */
    connection_pool: Option<Pool<Postgres>>,
}

impl CoverageService {
    /**
     * Creates a new instance of `CoverageService`.
     *
     * # Arguments
     * `coverage_dao`: The DAO for aggregate queries.
     * `registry_dao`: The DAO for record lookups.
     * `connection_pool`: Optional connection pool for database operations.
     */
    pub fn new(coverage_dao: CoverageDao, registry_dao: RegistryDao, connection_pool: Option<Pool<Postgres>>) -> Self {
        CoverageService { coverage_dao, registry_dao, connection_pool }
    }

    async fn connection(&self) -> Result<PoolConnection<Postgres>, ApplicationError> {
        let Some(connection_pool) = &self.connection_pool else {
            return Err(ApplicationError::new(ErrorType::DatabaseError, "No database connection available".to_string()));
        };
        connection_pool.acquire().await.map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to acquire connection: {err}")))
    }

    /**
     * Coverage of a scheme over every citizen in the system.
     *
     * # Returns
     * The coverage, or `NotFound` when the scheme does not exist.
     */
    pub async fn get_scheme_coverage(&self, scheme_id: i64) -> Result<SchemeCoverageOutputType, ApplicationError> {
        let mut connection = self.connection().await?;
        self.scheme_coverage(&mut connection, scheme_id).await
    }

    async fn scheme_coverage(&self, connection: &mut PgConnection, scheme_id: i64) -> Result<SchemeCoverageOutputType, ApplicationError> {
        self.registry_dao.get_scheme(connection, scheme_id).await?;
        let total_citizens = self.coverage_dao.count_citizens(connection).await?;
        let beneficiaries = self.coverage_dao.count_scheme_beneficiaries(connection, scheme_id).await?;
        Ok(SchemeCoverageOutputType { scheme_id, total_citizens, beneficiaries, coverage_percentage: percentage(beneficiaries, total_citizens) })
    }

    /**
     * Eligible citizens of a scheme who are not enrolled yet.
     *
     * # Returns
     * The gap statistics, or `NotFound` when the scheme does not exist.
     */
    pub async fn get_gap_analysis(&self, scheme_id: i64) -> Result<GapAnalysisOutputType, ApplicationError> {
        let mut connection = self.connection().await?;
        self.scheme_gap(&mut connection, scheme_id).await
    }

    async fn scheme_gap(&self, connection: &mut PgConnection, scheme_id: i64) -> Result<GapAnalysisOutputType, ApplicationError> {
        let scheme = self.registry_dao.get_scheme(connection, scheme_id).await?;
        let segment = eligible_segment(&scheme.name);
        let eligible_ids = self.coverage_dao.get_eligible_citizen_ids(connection, segment.as_ref().map(Segment::as_str)).await?;
        let beneficiary_ids = self.coverage_dao.get_beneficiary_citizen_ids(connection, scheme_id).await?;
        Ok(gap_analysis(scheme.name, &eligible_ids, &beneficiary_ids))
    }

    /**
     * Coverage of a scheme among the citizens of one booth.
     */
    pub async fn get_booth_scheme_coverage(&self, booth_id: i64, scheme_id: i64) -> Result<BoothCoverageOutputType, ApplicationError> {
        let mut connection = self.connection().await?;
        self.registry_dao.ensure_booth_exists(&mut connection, booth_id).await?;
        self.registry_dao.get_scheme(&mut connection, scheme_id).await?;
        let total_citizens = self.coverage_dao.count_booth_citizens(&mut connection, booth_id).await?;
        let beneficiaries = self.coverage_dao.count_booth_beneficiaries(&mut connection, booth_id, Some(scheme_id)).await?;
        Ok(BoothCoverageOutputType { booth_id, scheme_id, total_citizens, beneficiaries, coverage_percentage: percentage(beneficiaries, total_citizens) })
    }

    /**
     * Coverage of a scheme for each street of a booth, ordered by street id.
     */
    pub async fn get_street_coverage(&self, booth_id: i64, scheme_id: i64) -> Result<Vec<StreetCoverageOutputType>, ApplicationError> {
        let mut connection = self.connection().await?;
        self.registry_dao.ensure_booth_exists(&mut connection, booth_id).await?;
        self.registry_dao.get_scheme(&mut connection, scheme_id).await?;
        let rows = self.coverage_dao.get_street_coverage_counts(&mut connection, booth_id, scheme_id).await?;
        Ok(rows.into_iter().map(StreetCoverageOutputType::from).collect())
    }

    /**
     * Number of citizens per segment within a booth.
     */
    pub async fn get_segment_distribution(&self, booth_id: i64) -> Result<SegmentDistributionOutputType, ApplicationError> {
        let mut connection = self.connection().await?;
        self.registry_dao.ensure_booth_exists(&mut connection, booth_id).await?;
        let rows = self.coverage_dao.get_segment_counts(&mut connection, booth_id).await?;
        Ok(segment_distribution(rows))
    }

    pub async fn get_booth_summary(&self, booth_id: i64) -> Result<BoothSummaryOutputType, ApplicationError> {
        let mut connection = self.connection().await?;
        self.registry_dao.ensure_booth_exists(&mut connection, booth_id).await?;
        let total_streets = self.coverage_dao.count_booth_streets(&mut connection, booth_id).await?;
        let total_citizens = self.coverage_dao.count_booth_citizens(&mut connection, booth_id).await?;
        let total_beneficiaries = self.coverage_dao.count_booth_beneficiaries(&mut connection, booth_id, None).await?;
        Ok(BoothSummaryOutputType { booth_id, total_streets, total_citizens, total_beneficiaries })
    }
}

#[cfg(test)]
mod test {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_percentage_zero_total_is_zero() {
        assert_eq!(percentage(0, 0), Decimal::ZERO);
        assert_eq!(percentage(5, 0), Decimal::ZERO);
    }

    #[test]
    fn test_percentage_rounds_to_two_decimals() {
        assert_eq!(percentage(1, 3), Decimal::from_str("33.33").unwrap());
        assert_eq!(percentage(2, 3), Decimal::from_str("66.67").unwrap());
        assert_eq!(percentage(1, 8), Decimal::from_str("12.5").unwrap());
        assert_eq!(percentage(1, 1), Decimal::ONE_HUNDRED);
    }

    #[test]
    fn test_percentage_is_bounded_when_part_is_subset() {
        for total in 1..=25 {
            for part in 0..=total {
                let value = percentage(part, total);
                assert!(value >= Decimal::ZERO && value <= Decimal::ONE_HUNDRED, "{part}/{total} gave {value}");
            }
        }
    }

    #[test]
    fn test_eligible_segment_from_scheme_name() {
        assert_eq!(eligible_segment("Farmer Support"), Some(Segment::Farmer));
        assert_eq!(eligible_segment("PM-KISAN for FARMERS"), Some(Segment::Farmer));
        assert_eq!(eligible_segment("Youth Skilling"), Some(Segment::Youth));
        assert_eq!(eligible_segment("Old Age Pension"), None);
    }

    #[test]
    fn test_gap_single_unenrolled_farmer() {
        let gap = gap_analysis("Farmer Support".to_string(), &[7], &[]);
        assert_eq!(gap.eligible_count, 1);
        assert_eq!(gap.beneficiary_count, 0);
        assert_eq!(gap.not_covered_count, 1);
        assert_eq!(gap.gap_percentage, Decimal::ONE_HUNDRED);
    }

    #[test]
    fn test_gap_counts_enrolled_outside_eligible_set() {
        let gap = gap_analysis("Farmer Support".to_string(), &[1, 2, 3, 4], &[2, 9]);
        assert_eq!(gap.eligible_count, 4);
        assert_eq!(gap.beneficiary_count, 2);
        assert_eq!(gap.not_covered_count, 3);
        assert_eq!(gap.gap_percentage, Decimal::from_str("75").unwrap());
    }

    #[test]
    fn test_gap_with_no_eligible_citizens_is_zero() {
        let gap = gap_analysis("Youth Skilling".to_string(), &[], &[3]);
        assert_eq!(gap.eligible_count, 0);
        assert_eq!(gap.not_covered_count, 0);
        assert_eq!(gap.gap_percentage, Decimal::ZERO);
    }

    #[test]
    fn test_gap_not_covered_plus_covered_never_exceeds_eligible() {
        let eligible: Vec<i64> = (1..=20).collect();
        for enrolled_upto in 0..=25 {
            let enrolled: Vec<i64> = (10..10 + enrolled_upto).collect();
            let gap = gap_analysis("General".to_string(), &eligible, &enrolled);
            let covered_within_eligible = enrolled.iter().filter(|id| eligible.contains(*id)).count() as i64;
            assert!(gap.not_covered_count + covered_within_eligible <= gap.eligible_count);
            assert!(gap.not_covered_count >= 0);
        }
    }

    #[test]
    fn test_street_coverage_row() {
        let row: QueryStreetCoverageDbResp = (3, "Gandhi Road".to_string(), 3, 1);
        let street = StreetCoverageOutputType::from(row);
        assert_eq!(street.street_id, 3);
        assert_eq!(street.coverage_percentage, Decimal::from_str("33.33").unwrap());
        let empty = StreetCoverageOutputType::from((4, "Nehru Street".to_string(), 0, 0));
        assert_eq!(empty.coverage_percentage, Decimal::ZERO);
    }

    #[test]
    fn test_segment_distribution_map() {
        let distribution = segment_distribution(vec![("Youth".to_string(), 2), ("Farmer".to_string(), 5)]);
        assert_eq!(distribution.len(), 2);
        assert_eq!(distribution.get("Farmer"), Some(&5));
        assert_eq!(distribution.keys().next().map(String::as_str), Some("Farmer"));
    }

    #[actix_web::test]
    async fn test_aggregates_without_database_fail() {
        let service = CoverageService::new(CoverageDao::new(), RegistryDao::new(), None);
        assert_eq!(service.get_scheme_coverage(1).await.unwrap_err().error_type, ErrorType::DatabaseError);
        assert_eq!(service.get_booth_summary(1).await.unwrap_err().error_type, ErrorType::DatabaseError);
    }
}
