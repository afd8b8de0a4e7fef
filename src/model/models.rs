use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::{
    model::apperror::{ApplicationError, ErrorType},
    service::segment::Segment,
};

/**
 * Role allowed to send notifications.
 */
pub const ADMIN_ROLE: &str = "admin";

/**
 * Default status of a newly reported issue.
 */
pub const DEFAULT_ISSUE_STATUS: &str = "Open";

/***************** Validation helpers *********************/

/**
 * Fails with a validation error if the value is blank.
 */
fn require_text(field: &str, value: &str) -> Result<(), ApplicationError> {
    if value.trim().is_empty() {
        return Err(ApplicationError::new(ErrorType::Validation, format!("{field} must not be empty")));
    }
    Ok(())
}

/**
 * Fails with a validation error if the id is not positive.
 */
pub fn require_id(field: &str, value: i64) -> Result<(), ApplicationError> {
    if value <= 0 {
        return Err(ApplicationError::new(ErrorType::Validation, format!("{field} must be a positive id")));
    }
    Ok(())
}

/***************** Booth *********************/

#[derive(Debug, Clone)]
pub struct BoothAddInputType {
    pub name: String,
    pub ward: String,
}

impl BoothAddInputType {
    pub fn validate(self) -> Result<Self, ApplicationError> {
        require_text("name", &self.name)?;
        require_text("ward", &self.ward)?;
        Ok(self)
    }
}

#[derive(Debug, Clone)]
pub struct BoothDetailType {
    pub id: i64,
    pub name: String,
    pub ward: String,
    pub created_at: DateTime<Utc>,
}

/***************** Street *********************/

#[derive(Debug, Clone)]
pub struct StreetAddInputType {
    pub name: String,
    pub booth_id: i64,
}

impl StreetAddInputType {
    pub fn validate(self) -> Result<Self, ApplicationError> {
        require_text("name", &self.name)?;
        require_id("booth_id", self.booth_id)?;
        Ok(self)
    }
}

#[derive(Debug, Clone)]
pub struct StreetDetailType {
    pub id: i64,
    pub name: String,
    pub booth_id: i64,
    pub created_at: DateTime<Utc>,
}

/***************** Citizen *********************/

/**
 * Input for registering a citizen. The segment is never supplied by the caller.
 */
#[derive(Debug, Clone)]
pub struct CitizenAddInputType {
    pub name: String,
    pub age: i32,
    pub gender: String,
    pub mobile: String,
    pub occupation: String,
    pub consent: bool,
    pub street_id: i64,
}

impl CitizenAddInputType {
    pub fn validate(self) -> Result<Self, ApplicationError> {
        require_text("name", &self.name)?;
        if self.age < 0 {
            return Err(ApplicationError::new(ErrorType::Validation, "age must not be negative".to_string()));
        }
        require_id("street_id", self.street_id)?;
        Ok(self)
    }

    pub fn segment(&self) -> Segment {
        Segment::determine(self.age, &self.occupation)
    }
}

#[derive(Debug, Clone)]
pub struct CitizenDetailType {
    pub id: i64,
    pub name: String,
    pub age: i32,
    pub gender: String,
    pub mobile: String,
    pub occupation: String,
    pub consent: bool,
    pub segment: Segment,
    pub street_id: i64,
    pub created_at: DateTime<Utc>,
}

/***************** Scheme *********************/

#[derive(Debug, Clone)]
pub struct SchemeAddInputType {
    pub name: String,
    pub description: String,
}

impl SchemeAddInputType {
    pub fn validate(self) -> Result<Self, ApplicationError> {
        require_text("name", &self.name)?;
        Ok(self)
    }
}

#[derive(Debug, Clone)]
pub struct SchemeDetailType {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/***************** Beneficiary *********************/

#[derive(Debug, Clone)]
pub struct BeneficiaryAddInputType {
    pub citizen_id: i64,
    pub scheme_id: i64,
}

impl BeneficiaryAddInputType {
    pub fn validate(self) -> Result<Self, ApplicationError> {
        require_id("citizen_id", self.citizen_id)?;
        require_id("scheme_id", self.scheme_id)?;
        Ok(self)
    }
}

#[derive(Debug, Clone)]
pub struct BeneficiaryDetailType {
    pub id: i64,
    pub citizen_id: i64,
    pub scheme_id: i64,
    pub created_at: DateTime<Utc>,
}

/***************** Issue *********************/

#[derive(Debug, Clone)]
pub struct IssueAddInputType {
    pub description: String,
    pub category: String,
    pub street_id: i64,
}

impl IssueAddInputType {
    pub fn validate(self) -> Result<Self, ApplicationError> {
        require_text("description", &self.description)?;
        require_text("category", &self.category)?;
        require_id("street_id", self.street_id)?;
        Ok(self)
    }
}

#[derive(Debug, Clone)]
pub struct IssueDetailType {
    pub id: i64,
    pub description: String,
    pub category: String,
    pub status: String,
    pub street_id: i64,
    pub created_at: DateTime<Utc>,
}

/***************** Notification *********************/

#[derive(Debug, Clone)]
pub struct NotificationSendInputType {
    pub street_id: i64,
    pub message: String,
    pub role: String,
}

impl NotificationSendInputType {
    /**
     * The role is checked before the other fields, so non-admins are denied whatever they send.
     */
    pub fn validate(self) -> Result<Self, ApplicationError> {
        self.check_admin()?;
        require_id("street_id", self.street_id)?;
        require_text("message", &self.message)?;
        Ok(self)
    }

    /**
     * Only admins may send notifications. The role is a free-text string.
     */
    pub fn check_admin(&self) -> Result<(), ApplicationError> {
        if self.role != ADMIN_ROLE {
            return Err(ApplicationError::new(ErrorType::PermissionDenied, "Access denied".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct NotificationSentOutputType {
    pub notification_id: i64,
    pub street_id: i64,
    pub message: String,
    pub targeted_households: i64,
}

/***************** User *********************/

#[derive(Debug, Clone)]
pub struct UserAddInputType {
    pub username: String,
    pub role: String,
}

impl UserAddInputType {
    pub fn validate(self) -> Result<Self, ApplicationError> {
        require_text("username", &self.username)?;
        require_text("role", &self.role)?;
        Ok(self)
    }
}

#[derive(Debug, Clone)]
pub struct UserDetailType {
    pub id: i64,
    pub username: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

/***************** Coverage statistics *********************/

#[derive(Debug, Clone, PartialEq)]
pub struct SchemeCoverageOutputType {
    pub scheme_id: i64,
    pub total_citizens: i64,
    pub beneficiaries: i64,
    pub coverage_percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GapAnalysisOutputType {
    pub scheme_name: String,
    pub eligible_count: i64,
    pub beneficiary_count: i64,
    pub not_covered_count: i64,
    pub gap_percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoothCoverageOutputType {
    pub booth_id: i64,
    pub scheme_id: i64,
    pub total_citizens: i64,
    pub beneficiaries: i64,
    pub coverage_percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StreetCoverageOutputType {
    pub street_id: i64,
    pub street_name: String,
    pub total_citizens: i64,
    pub beneficiaries: i64,
    pub coverage_percentage: Decimal,
}

/**
 * Citizen count per segment label, ordered by label.
 */
pub type SegmentDistributionOutputType = BTreeMap<String, i64>;

#[derive(Debug, Clone, PartialEq)]
pub struct BoothSummaryOutputType {
    pub booth_id: i64,
    pub total_streets: i64,
    pub total_citizens: i64,
    pub total_beneficiaries: i64,
}

#[cfg(test)]
mod test {
    use super::*;

    fn citizen(age: i32, occupation: &str) -> CitizenAddInputType {
        CitizenAddInputType {
            name: "Asha".to_string(),
            age,
            gender: "F".to_string(),
            mobile: "9999999999".to_string(),
            occupation: occupation.to_string(),
            consent: true,
            street_id: 1,
        }
    }

    #[test]
    fn test_citizen_segment_is_derived() {
        assert_eq!(citizen(25, "Farmer").segment(), Segment::Youth);
        assert_eq!(citizen(45, "Farmer").segment(), Segment::Farmer);
    }

    #[test]
    fn test_citizen_validation() {
        assert!(citizen(25, "Farmer").validate().is_ok());
        let err = citizen(-1, "Farmer").validate().unwrap_err();
        assert_eq!(err.error_type, ErrorType::Validation);
        let mut blank_name = citizen(25, "Farmer");
        blank_name.name = "  ".to_string();
        assert_eq!(blank_name.validate().unwrap_err().error_type, ErrorType::Validation);
        let mut no_street = citizen(25, "Farmer");
        no_street.street_id = 0;
        assert_eq!(no_street.validate().unwrap_err().error_type, ErrorType::Validation);
    }

    #[test]
    fn test_booth_and_street_validation() {
        assert!(BoothAddInputType { name: "B1".to_string(), ward: "W1".to_string() }.validate().is_ok());
        assert!(BoothAddInputType { name: "B1".to_string(), ward: String::new() }.validate().is_err());
        assert!(StreetAddInputType { name: "S1".to_string(), booth_id: 1 }.validate().is_ok());
        assert!(StreetAddInputType { name: "S1".to_string(), booth_id: -3 }.validate().is_err());
    }

    #[test]
    fn test_beneficiary_validation() {
        assert!(BeneficiaryAddInputType { citizen_id: 1, scheme_id: 2 }.validate().is_ok());
        assert!(BeneficiaryAddInputType { citizen_id: 0, scheme_id: 2 }.validate().is_err());
    }

    #[test]
    fn test_only_admin_may_notify() {
        let mut input = NotificationSendInputType { street_id: 1, message: "Camp on Sunday".to_string(), role: "volunteer".to_string() };
        assert_eq!(input.check_admin().unwrap_err().error_type, ErrorType::PermissionDenied);
        input.role = "Admin".to_string();
        assert!(input.check_admin().is_err());
        input.role = ADMIN_ROLE.to_string();
        assert!(input.check_admin().is_ok());
    }

    #[test]
    fn test_role_is_checked_before_fields() {
        let input = NotificationSendInputType { street_id: 0, message: "".to_string(), role: "volunteer".to_string() };
        assert_eq!(input.validate().unwrap_err().error_type, ErrorType::PermissionDenied);
        let input = NotificationSendInputType { street_id: 1, message: "".to_string(), role: ADMIN_ROLE.to_string() };
        assert_eq!(input.validate().unwrap_err().error_type, ErrorType::Validation);
    }
}
