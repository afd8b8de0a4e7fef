use actix_web::{
    Either, HttpResponse, ResponseError,
    error::{JsonPayloadError, PathError, QueryPayloadError},
    http::StatusCode,
    web,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    model::{
        apperror::{ApplicationError, ErrorType},
        models::{
            BeneficiaryAddInputType, BeneficiaryDetailType, BoothAddInputType, BoothCoverageOutputType, BoothDetailType, BoothSummaryOutputType, CitizenAddInputType, CitizenDetailType,
            GapAnalysisOutputType, IssueAddInputType, IssueDetailType, NotificationSendInputType, NotificationSentOutputType, SchemeAddInputType, SchemeCoverageOutputType, SchemeDetailType,
            StreetAddInputType, StreetCoverageOutputType, StreetDetailType, UserAddInputType, UserDetailType,
        },
    },
    service::segment::Segment,
};

/***************** Request binding *********************/

/**
 * Create inputs are accepted as a JSON body or as query parameters, e.g. `POST /booths/?name=B1&ward=W1`.
 * The body is tried first. When neither form binds, the body error is reported.
 */
pub type RequestInput<T> = Either<web::Json<T>, web::Query<T>>;

/**
 * Unwraps the request structure from whichever form it arrived in.
 */
pub fn request_input<T>(input: RequestInput<T>) -> T {
    match input {
        Either::Left(body) => body.into_inner(),
        Either::Right(query) => query.into_inner(),
    }
}

/***************** Status models *********************/

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub message: String,
}

/***************** Booth models *********************/

#[derive(Debug, Deserialize)]
pub struct BoothAddRequest {
    pub name: String,
    pub ward: String,
}

impl From<BoothAddRequest> for BoothAddInputType {
    fn from(request: BoothAddRequest) -> Self {
        BoothAddInputType { name: request.name, ward: request.ward }
    }
}

#[derive(Debug, Serialize)]
pub struct BoothResponse {
    pub id: i64,
    pub name: String,
    pub ward: String,
    pub created_at: DateTime<Utc>,
}

impl From<BoothDetailType> for BoothResponse {
    fn from(booth: BoothDetailType) -> Self {
        BoothResponse { id: booth.id, name: booth.name, ward: booth.ward, created_at: booth.created_at }
    }
}

/***************** Street models *********************/

#[derive(Debug, Deserialize)]
pub struct StreetAddRequest {
    pub name: String,
    pub booth_id: i64,
}

impl From<StreetAddRequest> for StreetAddInputType {
    fn from(request: StreetAddRequest) -> Self {
        StreetAddInputType { name: request.name, booth_id: request.booth_id }
    }
}

#[derive(Debug, Serialize)]
pub struct StreetResponse {
    pub id: i64,
    pub name: String,
    pub booth_id: i64,
    pub created_at: DateTime<Utc>,
}

impl From<StreetDetailType> for StreetResponse {
    fn from(street: StreetDetailType) -> Self {
        StreetResponse { id: street.id, name: street.name, booth_id: street.booth_id, created_at: street.created_at }
    }
}

/***************** Citizen models *********************/

/**
 * Request structure for registering a citizen. There is no segment field; it is derived.
 */
#[derive(Debug, Deserialize)]
pub struct CitizenAddRequest {
    pub name: String,
    pub age: i32,
    pub gender: String,
    pub mobile: String,
    pub occupation: String,
    pub street_id: i64,
    /**
     * Consent to be contacted. Defaults to true.
     */
    #[serde(default = "default_consent")]
    pub consent: bool,
}

fn default_consent() -> bool {
    true
}

impl From<CitizenAddRequest> for CitizenAddInputType {
    fn from(request: CitizenAddRequest) -> Self {
        CitizenAddInputType {
            name: request.name,
            age: request.age,
            gender: request.gender,
            mobile: request.mobile,
            occupation: request.occupation,
            consent: request.consent,
            street_id: request.street_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CitizenResponse {
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

impl From<CitizenDetailType> for CitizenResponse {
    fn from(citizen: CitizenDetailType) -> Self {
        CitizenResponse {
            id: citizen.id,
            name: citizen.name,
            age: citizen.age,
            gender: citizen.gender,
            mobile: citizen.mobile,
            occupation: citizen.occupation,
            consent: citizen.consent,
            segment: citizen.segment,
            street_id: citizen.street_id,
            created_at: citizen.created_at,
        }
    }
}

/***************** Scheme models *********************/

#[derive(Debug, Deserialize)]
pub struct SchemeAddRequest {
    pub name: String,
    pub description: String,
}

impl From<SchemeAddRequest> for SchemeAddInputType {
    fn from(request: SchemeAddRequest) -> Self {
        SchemeAddInputType { name: request.name, description: request.description }
    }
}

#[derive(Debug, Serialize)]
pub struct SchemeResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl From<SchemeDetailType> for SchemeResponse {
    fn from(scheme: SchemeDetailType) -> Self {
        SchemeResponse { id: scheme.id, name: scheme.name, description: scheme.description, created_at: scheme.created_at }
    }
}

/***************** Beneficiary models *********************/

#[derive(Debug, Deserialize)]
pub struct BeneficiaryAddRequest {
    pub citizen_id: i64,
    pub scheme_id: i64,
}

impl From<BeneficiaryAddRequest> for BeneficiaryAddInputType {
    fn from(request: BeneficiaryAddRequest) -> Self {
        BeneficiaryAddInputType { citizen_id: request.citizen_id, scheme_id: request.scheme_id }
    }
}

#[derive(Debug, Serialize)]
pub struct BeneficiaryResponse {
    pub id: i64,
    pub citizen_id: i64,
    pub scheme_id: i64,
    pub created_at: DateTime<Utc>,
}

impl From<BeneficiaryDetailType> for BeneficiaryResponse {
    fn from(beneficiary: BeneficiaryDetailType) -> Self {
        BeneficiaryResponse { id: beneficiary.id, citizen_id: beneficiary.citizen_id, scheme_id: beneficiary.scheme_id, created_at: beneficiary.created_at }
    }
}

/***************** Issue models *********************/

#[derive(Debug, Deserialize)]
pub struct IssueAddRequest {
    pub description: String,
    pub category: String,
    pub street_id: i64,
}

impl From<IssueAddRequest> for IssueAddInputType {
    fn from(request: IssueAddRequest) -> Self {
        IssueAddInputType { description: request.description, category: request.category, street_id: request.street_id }
    }
}

#[derive(Debug, Serialize)]
pub struct IssueResponse {
    pub id: i64,
    pub description: String,
    pub category: String,
    pub status: String,
    pub street_id: i64,
    pub created_at: DateTime<Utc>,
}

impl From<IssueDetailType> for IssueResponse {
    fn from(issue: IssueDetailType) -> Self {
        IssueResponse { id: issue.id, description: issue.description, category: issue.category, status: issue.status, street_id: issue.street_id, created_at: issue.created_at }
    }
}

/***************** Notification models *********************/

#[derive(Debug, Deserialize)]
pub struct NotificationSendRequest {
    pub street_id: i64,
    pub message: String,
    /**
     * Role of the caller. Only `admin` may send.
     */
    pub role: String,
}

impl From<NotificationSendRequest> for NotificationSendInputType {
    fn from(request: NotificationSendRequest) -> Self {
        NotificationSendInputType { street_id: request.street_id, message: request.message, role: request.role }
    }
}

#[derive(Debug, Serialize)]
pub struct NotificationSentResponse {
    pub street_id: i64,
    pub message: String,
    pub targeted_households: i64,
}

impl From<NotificationSentOutputType> for NotificationSentResponse {
    fn from(output: NotificationSentOutputType) -> Self {
        NotificationSentResponse { street_id: output.street_id, message: output.message, targeted_households: output.targeted_households }
    }
}

/***************** User models *********************/

#[derive(Debug, Deserialize)]
pub struct UserAddRequest {
    pub username: String,
    pub role: String,
}

impl From<UserAddRequest> for UserAddInputType {
    fn from(request: UserAddRequest) -> Self {
        UserAddInputType { username: request.username, role: request.role }
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserDetailType> for UserResponse {
    fn from(user: UserDetailType) -> Self {
        UserResponse { id: user.id, username: user.username, role: user.role, created_at: user.created_at }
    }
}

/***************** Coverage models *********************/

#[derive(Debug, Serialize)]
pub struct SchemeCoverageResponse {
    pub scheme_id: i64,
    pub total_citizens: i64,
    pub beneficiaries: i64,
    pub coverage_percentage: Decimal,
}

impl From<SchemeCoverageOutputType> for SchemeCoverageResponse {
    fn from(output: SchemeCoverageOutputType) -> Self {
        SchemeCoverageResponse { scheme_id: output.scheme_id, total_citizens: output.total_citizens, beneficiaries: output.beneficiaries, coverage_percentage: output.coverage_percentage }
    }
}

#[derive(Debug, Serialize)]
pub struct GapAnalysisResponse {
    pub scheme_name: String,
    pub eligible_count: i64,
    pub beneficiary_count: i64,
    pub not_covered_count: i64,
    pub gap_percentage: Decimal,
}

impl From<GapAnalysisOutputType> for GapAnalysisResponse {
    fn from(output: GapAnalysisOutputType) -> Self {
        GapAnalysisResponse {
            scheme_name: output.scheme_name,
            eligible_count: output.eligible_count,
            beneficiary_count: output.beneficiary_count,
            not_covered_count: output.not_covered_count,
            gap_percentage: output.gap_percentage,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BoothCoverageResponse {
    pub booth_id: i64,
    pub scheme_id: i64,
    pub total_citizens: i64,
    pub beneficiaries: i64,
    pub coverage_percentage: Decimal,
}

impl From<BoothCoverageOutputType> for BoothCoverageResponse {
    fn from(output: BoothCoverageOutputType) -> Self {
        BoothCoverageResponse {
            booth_id: output.booth_id,
            scheme_id: output.scheme_id,
            total_citizens: output.total_citizens,
            beneficiaries: output.beneficiaries,
            coverage_percentage: output.coverage_percentage,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StreetCoverageResponse {
    pub street_id: i64,
    pub street_name: String,
    pub total_citizens: i64,
    pub beneficiaries: i64,
    pub coverage_percentage: Decimal,
}

impl From<StreetCoverageOutputType> for StreetCoverageResponse {
    fn from(output: StreetCoverageOutputType) -> Self {
        StreetCoverageResponse {
            street_id: output.street_id,
            street_name: output.street_name,
            total_citizens: output.total_citizens,
            beneficiaries: output.beneficiaries,
            coverage_percentage: output.coverage_percentage,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BoothSummaryResponse {
    pub booth_id: i64,
    pub total_streets: i64,
    pub total_citizens: i64,
    pub total_beneficiaries: i64,
}

impl From<BoothSummaryOutputType> for BoothSummaryResponse {
    fn from(output: BoothSummaryOutputType) -> Self {
        BoothSummaryResponse { booth_id: output.booth_id, total_streets: output.total_streets, total_citizens: output.total_citizens, total_beneficiaries: output.total_beneficiaries }
    }
}

/***************** Error models *********************/

/**
 * Custom error response for the application.
 */
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /**
     * The error code associated with the error type.
     */
    pub code: u16,
    /**
     * A human-readable message describing the error.
     */
    pub message: String,
}

impl ResponseError for ApplicationError {
    fn status_code(&self) -> StatusCode {
        get_statuscode(&self.error_type)
    }

    /**
     * Generates an error response for the application error.
     */
    fn error_response(&self) -> HttpResponse {
        let error_response = ErrorResponse { code: get_error_code(&self.error_type), message: self.message.clone() };
        HttpResponse::build(get_statuscode(&self.error_type)).json(&error_response)
    }
}

/**
* Maps application errors to HTTP status codes.
*
* # Arguments
* `application_error`: The type of error that occurred.
*
* # Returns
* The corresponding HTTP status code.
*/
fn get_statuscode(application_error: &ErrorType) -> StatusCode {
    match application_error {
        ErrorType::Initialization | ErrorType::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
        ErrorType::Validation => StatusCode::BAD_REQUEST,
        ErrorType::NotFound => StatusCode::NOT_FOUND,
        ErrorType::ConstraintViolation => StatusCode::CONFLICT,
        ErrorType::PermissionDenied => StatusCode::FORBIDDEN,
    }
}

/**
 * Maps application errors to error codes.
 *
 * # Arguments
 * `application_error`: The type of error that occurred.
 *
 * # Returns
 * The corresponding error code.
 */
fn get_error_code(application_error: &ErrorType) -> u16 {
    match application_error {
        ErrorType::Initialization => 1001,
        ErrorType::DatabaseError => 1003,
        ErrorType::Validation => 1004,
        ErrorType::NotFound => 1005,
        ErrorType::ConstraintViolation => 1006,
        ErrorType::PermissionDenied => 1007,
    }
}

/**
 * JSON body configuration reporting binding failures as validation errors.
 */
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _request| ApplicationError::new(ErrorType::Validation, format!("Invalid request body: {err}")).into())
}

/**
 * Query string configuration reporting binding failures as validation errors.
 */
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err: QueryPayloadError, _request| ApplicationError::new(ErrorType::Validation, format!("Invalid query parameters: {err}")).into())
}

/**
 * Path configuration reporting malformed ids as validation errors.
 */
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err: PathError, _request| ApplicationError::new(ErrorType::Validation, format!("Invalid path: {err}")).into())
}
