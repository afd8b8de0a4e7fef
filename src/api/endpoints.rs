use actix_web::{
    HttpRequest, HttpResponse, get, post,
    web::{self, Path},
};
use tracing::{Instrument, instrument};

use crate::{
    api::{
        rest::{
            BeneficiaryAddRequest, BeneficiaryResponse, BoothAddRequest, BoothCoverageResponse, BoothResponse, BoothSummaryResponse, CitizenAddRequest, CitizenResponse, GapAnalysisResponse,
            IssueAddRequest, IssueResponse, NotificationSendRequest, NotificationSentResponse, SchemeAddRequest, SchemeCoverageResponse, SchemeResponse, StatusResponse, StreetAddRequest,
            RequestInput, StreetCoverageResponse, StreetResponse, UserAddRequest, UserResponse, request_input,
        },
        state::AppState,
    },
    model::{
        apperror::ApplicationError,
        models::{BeneficiaryAddInputType, BoothAddInputType, CitizenAddInputType, IssueAddInputType, NotificationSendInputType, SchemeAddInputType, StreetAddInputType, UserAddInputType, require_id},
    },
};

/**
 * Registers every endpoint of the API.
 */
pub fn configure(config: &mut web::ServiceConfig) {
    config
        .service(root)
        .service(booth_add)
        .service(booth_list)
        .service(street_add)
        .service(street_list)
        .service(citizen_add)
        .service(citizen_list)
        .service(street_citizen_list)
        .service(scheme_add)
        .service(scheme_list)
        .service(beneficiary_add)
        .service(beneficiary_list)
        .service(scheme_coverage)
        .service(scheme_gap_analysis)
        .service(booth_scheme_coverage)
        .service(booth_street_coverage)
        .service(booth_segment_distribution)
        .service(booth_summary)
        .service(issue_add)
        .service(street_issue_list)
        .service(notification_send)
        .service(user_add)
        .service(user_list);
}

/**
 * Status endpoint.
 */
#[get("/")]
pub async fn root() -> HttpResponse {
    HttpResponse::Ok().json(StatusResponse { message: "Governance Backend Running".to_string() })
}

/***************** Booths *********************/

#[instrument(level = "info", skip(http_request, app_state), fields(service = "addBooth", trace_id = get_trace_id(&http_request), result))]
#[post("/booths")]
pub async fn booth_add(http_request: HttpRequest, request_body: RequestInput<BoothAddRequest>, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let booth_add_input = BoothAddInputType::from(request_input(request_body)).validate()?;
    let booth = app_state.registry_service.add_booth(booth_add_input).instrument(span).await?;
    Ok(HttpResponse::Created().json(BoothResponse::from(booth)))
}

#[instrument(level = "info", skip(http_request, app_state), fields(service = "listBooths", trace_id = get_trace_id(&http_request), result))]
#[get("/booths")]
pub async fn booth_list(http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let booths = app_state.registry_service.get_booth_list().instrument(span).await?;
    Ok(HttpResponse::Ok().json(booths.into_iter().map(BoothResponse::from).collect::<Vec<_>>()))
}

/***************** Streets *********************/

#[instrument(level = "info", skip(http_request, app_state), fields(service = "addStreet", trace_id = get_trace_id(&http_request), result))]
#[post("/streets")]
pub async fn street_add(http_request: HttpRequest, request_body: RequestInput<StreetAddRequest>, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let street_add_input = StreetAddInputType::from(request_input(request_body)).validate()?;
    let street = app_state.registry_service.add_street(street_add_input).instrument(span).await?;
    Ok(HttpResponse::Created().json(StreetResponse::from(street)))
}

#[instrument(level = "info", skip(http_request, app_state), fields(service = "listStreets", trace_id = get_trace_id(&http_request), result))]
#[get("/streets")]
pub async fn street_list(http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let streets = app_state.registry_service.get_street_list().instrument(span).await?;
    Ok(HttpResponse::Ok().json(streets.into_iter().map(StreetResponse::from).collect::<Vec<_>>()))
}

/***************** Citizens *********************/

/**
 * Registers a citizen. The segment is computed from age and occupation.
 */
#[instrument(level = "info", skip(http_request, app_state), fields(service = "addCitizen", trace_id = get_trace_id(&http_request), result))]
#[post("/citizens")]
pub async fn citizen_add(http_request: HttpRequest, request_body: RequestInput<CitizenAddRequest>, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let citizen_add_input = CitizenAddInputType::from(request_input(request_body)).validate()?;
    let citizen = app_state.registry_service.add_citizen(citizen_add_input).instrument(span).await?;
    Ok(HttpResponse::Created().json(CitizenResponse::from(citizen)))
}

#[instrument(level = "info", skip(http_request, app_state), fields(service = "listCitizens", trace_id = get_trace_id(&http_request), result))]
#[get("/citizens")]
pub async fn citizen_list(http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let citizens = app_state.registry_service.get_citizen_list().instrument(span).await?;
    Ok(HttpResponse::Ok().json(citizens.into_iter().map(CitizenResponse::from).collect::<Vec<_>>()))
}

#[instrument(level = "info", skip(http_request, app_state), fields(service = "listStreetCitizens", trace_id = get_trace_id(&http_request), result))]
#[get("/streets/{streetId}/citizens")]
pub async fn street_citizen_list(path: Path<i64>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let street_id = path.into_inner();
    require_id("street_id", street_id)?;
    let citizens = app_state.registry_service.get_citizen_list_by_street(street_id).instrument(span).await?;
    Ok(HttpResponse::Ok().json(citizens.into_iter().map(CitizenResponse::from).collect::<Vec<_>>()))
}

/***************** Schemes and beneficiaries *********************/

#[instrument(level = "info", skip(http_request, app_state), fields(service = "addScheme", trace_id = get_trace_id(&http_request), result))]
#[post("/schemes")]
pub async fn scheme_add(http_request: HttpRequest, request_body: RequestInput<SchemeAddRequest>, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let scheme_add_input = SchemeAddInputType::from(request_input(request_body)).validate()?;
    let scheme = app_state.registry_service.add_scheme(scheme_add_input).instrument(span).await?;
    Ok(HttpResponse::Created().json(SchemeResponse::from(scheme)))
}

#[instrument(level = "info", skip(http_request, app_state), fields(service = "listSchemes", trace_id = get_trace_id(&http_request), result))]
#[get("/schemes")]
pub async fn scheme_list(http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let schemes = app_state.registry_service.get_scheme_list().instrument(span).await?;
    Ok(HttpResponse::Ok().json(schemes.into_iter().map(SchemeResponse::from).collect::<Vec<_>>()))
}

#[instrument(level = "info", skip(http_request, app_state), fields(service = "addBeneficiary", trace_id = get_trace_id(&http_request), result))]
#[post("/beneficiaries")]
pub async fn beneficiary_add(http_request: HttpRequest, request_body: RequestInput<BeneficiaryAddRequest>, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let beneficiary_add_input = BeneficiaryAddInputType::from(request_input(request_body)).validate()?;
    let beneficiary = app_state.registry_service.add_beneficiary(beneficiary_add_input).instrument(span).await?;
    Ok(HttpResponse::Created().json(BeneficiaryResponse::from(beneficiary)))
}

#[instrument(level = "info", skip(http_request, app_state), fields(service = "listBeneficiaries", trace_id = get_trace_id(&http_request), result))]
#[get("/beneficiaries")]
pub async fn beneficiary_list(http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let beneficiaries = app_state.registry_service.get_beneficiary_list().instrument(span).await?;
    Ok(HttpResponse::Ok().json(beneficiaries.into_iter().map(BeneficiaryResponse::from).collect::<Vec<_>>()))
}

/***************** Coverage statistics *********************/

/**
 * Share of all citizens enrolled in a scheme.
 */
#[instrument(level = "info", skip(http_request, app_state), fields(service = "schemeCoverage", trace_id = get_trace_id(&http_request), result))]
#[get("/schemes/{schemeId}/coverage")]
pub async fn scheme_coverage(path: Path<i64>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let scheme_id = path.into_inner();
    require_id("scheme_id", scheme_id)?;
    let coverage = app_state.coverage_service.get_scheme_coverage(scheme_id).instrument(span).await?;
    Ok(HttpResponse::Ok().json(SchemeCoverageResponse::from(coverage)))
}

/**
 * Eligible citizens not yet enrolled in a scheme.
 */
#[instrument(level = "info", skip(http_request, app_state), fields(service = "schemeGapAnalysis", trace_id = get_trace_id(&http_request), result))]
#[get("/schemes/{schemeId}/gap-analysis")]
pub async fn scheme_gap_analysis(path: Path<i64>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let scheme_id = path.into_inner();
    require_id("scheme_id", scheme_id)?;
    let gap = app_state.coverage_service.get_gap_analysis(scheme_id).instrument(span).await?;
    Ok(HttpResponse::Ok().json(GapAnalysisResponse::from(gap)))
}

#[instrument(level = "info", skip(http_request, app_state), fields(service = "boothSchemeCoverage", trace_id = get_trace_id(&http_request), result))]
#[get("/booths/{boothId}/scheme-coverage/{schemeId}")]
pub async fn booth_scheme_coverage(path: Path<(i64, i64)>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let (booth_id, scheme_id) = path.into_inner();
    require_id("booth_id", booth_id)?;
    require_id("scheme_id", scheme_id)?;
    let coverage = app_state.coverage_service.get_booth_scheme_coverage(booth_id, scheme_id).instrument(span).await?;
    Ok(HttpResponse::Ok().json(BoothCoverageResponse::from(coverage)))
}

#[instrument(level = "info", skip(http_request, app_state), fields(service = "boothStreetCoverage", trace_id = get_trace_id(&http_request), result))]
#[get("/booths/{boothId}/street-coverage/{schemeId}")]
pub async fn booth_street_coverage(path: Path<(i64, i64)>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let (booth_id, scheme_id) = path.into_inner();
    require_id("booth_id", booth_id)?;
    require_id("scheme_id", scheme_id)?;
    let streets = app_state.coverage_service.get_street_coverage(booth_id, scheme_id).instrument(span).await?;
    Ok(HttpResponse::Ok().json(streets.into_iter().map(StreetCoverageResponse::from).collect::<Vec<_>>()))
}

#[instrument(level = "info", skip(http_request, app_state), fields(service = "boothSegmentDistribution", trace_id = get_trace_id(&http_request), result))]
#[get("/booths/{boothId}/segment-distribution")]
pub async fn booth_segment_distribution(path: Path<i64>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let booth_id = path.into_inner();
    require_id("booth_id", booth_id)?;
    let distribution = app_state.coverage_service.get_segment_distribution(booth_id).instrument(span).await?;
    Ok(HttpResponse::Ok().json(distribution))
}

#[instrument(level = "info", skip(http_request, app_state), fields(service = "boothSummary", trace_id = get_trace_id(&http_request), result))]
#[get("/booths/{boothId}/summary")]
pub async fn booth_summary(path: Path<i64>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let booth_id = path.into_inner();
    require_id("booth_id", booth_id)?;
    let summary = app_state.coverage_service.get_booth_summary(booth_id).instrument(span).await?;
    Ok(HttpResponse::Ok().json(BoothSummaryResponse::from(summary)))
}

/***************** Issues *********************/

#[instrument(level = "info", skip(http_request, app_state), fields(service = "addIssue", trace_id = get_trace_id(&http_request), result))]
#[post("/issues")]
pub async fn issue_add(http_request: HttpRequest, request_body: RequestInput<IssueAddRequest>, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let issue_add_input = IssueAddInputType::from(request_input(request_body)).validate()?;
    let issue = app_state.registry_service.add_issue(issue_add_input).instrument(span).await?;
    Ok(HttpResponse::Created().json(IssueResponse::from(issue)))
}

#[instrument(level = "info", skip(http_request, app_state), fields(service = "listStreetIssues", trace_id = get_trace_id(&http_request), result))]
#[get("/streets/{streetId}/issues")]
pub async fn street_issue_list(path: Path<i64>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let street_id = path.into_inner();
    require_id("street_id", street_id)?;
    let issues = app_state.registry_service.get_issue_list_by_street(street_id).instrument(span).await?;
    Ok(HttpResponse::Ok().json(issues.into_iter().map(IssueResponse::from).collect::<Vec<_>>()))
}

/***************** Notifications *********************/

/**
 * Records a notification to a street. Only the `admin` role may send.
 */
#[instrument(level = "info", skip(http_request, app_state), fields(service = "sendNotification", trace_id = get_trace_id(&http_request), result))]
#[post("/notifications")]
pub async fn notification_send(http_request: HttpRequest, request_body: RequestInput<NotificationSendRequest>, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let notification_send_input = NotificationSendInputType::from(request_input(request_body)).validate()?;
    let sent = app_state.registry_service.send_notification(notification_send_input).instrument(span).await?;
    Ok(HttpResponse::Ok().json(NotificationSentResponse::from(sent)))
}

/***************** Users *********************/

#[instrument(level = "info", skip(http_request, app_state), fields(service = "addUser", trace_id = get_trace_id(&http_request), result))]
#[post("/users")]
pub async fn user_add(http_request: HttpRequest, request_body: RequestInput<UserAddRequest>, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let user_add_input = UserAddInputType::from(request_input(request_body)).validate()?;
    let user = app_state.registry_service.add_user(user_add_input).instrument(span).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

#[instrument(level = "info", skip(http_request, app_state), fields(service = "listUsers", trace_id = get_trace_id(&http_request), result))]
#[get("/users")]
pub async fn user_list(http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let users = app_state.registry_service.get_user_list().instrument(span).await?;
    Ok(HttpResponse::Ok().json(users.into_iter().map(UserResponse::from).collect::<Vec<_>>()))
}

/**
 * Retrieves the trace ID from the HTTP request headers.
 * If the trace ID is not present, a new UUID is generated.
 */
fn get_trace_id(http_request: &HttpRequest) -> String {
    http_request.headers().get("X-Trace-ID").and_then(|v| v.to_str().ok().map(std::string::ToString::to_string)).unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

#[cfg(test)]
mod test {
    use actix_web::{App, http::StatusCode, middleware::NormalizePath, test, test::TestRequest};
    use serde_json::{Value, json};

    use super::*;
    use crate::{
        api::rest::{json_config, path_config, query_config},
        dao::{coverage::CoverageDao, registry::RegistryDao},
        service::{coverage::CoverageService, registry::RegistryService},
    };

    /**
     * Application state without a database. Requests that reach the store fail with a database error.
     */
    fn state_without_database() -> web::Data<AppState> {
        web::Data::new(AppState::new(RegistryService::new(RegistryDao::new(), None), CoverageService::new(CoverageDao::new(), RegistryDao::new(), None)))
    }

    macro_rules! test_app {
        () => {
            test::init_service(App::new().wrap(NormalizePath::trim()).app_data(state_without_database()).app_data(json_config()).app_data(query_config()).app_data(path_config()).configure(configure)).await
        };
    }

    #[actix_web::test]
    async fn test_get_trace_id_exists() {
        let request = TestRequest::default().insert_header(("X-Trace-ID", "test")).to_http_request();
        let trace_id = get_trace_id(&request);
        assert_eq!(trace_id, "test");
    }

    #[actix_web::test]
    async fn test_get_trace_id_not_exists() {
        let request = TestRequest::default().to_http_request();
        let trace_id = get_trace_id(&request);
        assert!(!trace_id.is_empty());
    }

    #[actix_web::test]
    async fn test_root_reports_status() {
        let app = test_app!();
        let body: Value = test::call_and_read_body_json(&app, TestRequest::get().uri("/").to_request()).await;
        assert_eq!(body["message"], "Governance Backend Running");
    }

    #[actix_web::test]
    async fn test_notification_from_volunteer_is_forbidden() {
        let app = test_app!();
        let request = TestRequest::post().uri("/notifications/").set_json(json!({ "street_id": 1, "message": "Health camp", "role": "volunteer" })).to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["code"], 1007);
    }

    #[actix_web::test]
    async fn test_notification_from_admin_passes_role_check() {
        let app = test_app!();
        let request = TestRequest::post().uri("/notifications/").set_json(json!({ "street_id": 1, "message": "Health camp", "role": "admin" })).to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[actix_web::test]
    async fn test_blank_message_from_volunteer_is_forbidden() {
        let app = test_app!();
        let request = TestRequest::post().uri("/notifications/").set_json(json!({ "street_id": 1, "message": " ", "role": "volunteer" })).to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_notification_from_query_string() {
        let app = test_app!();
        let response = test::call_service(&app, TestRequest::post().uri("/notifications/?street_id=1&message=Camp&role=volunteer").to_request()).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_booth_from_query_string_reaches_service() {
        let app = test_app!();
        let response = test::call_service(&app, TestRequest::post().uri("/booths/?name=B1&ward=W1").to_request()).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["code"], 1003);
    }

    #[actix_web::test]
    async fn test_incomplete_query_string_is_bad_request() {
        let app = test_app!();
        let response = test::call_service(&app, TestRequest::post().uri("/booths/?name=B1").to_request()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_malformed_body_is_bad_request() {
        let app = test_app!();
        let request = TestRequest::post().uri("/booths/").set_json(json!({ "name": "B1" })).to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["code"], 1004);
    }

    #[actix_web::test]
    async fn test_negative_age_is_bad_request() {
        let app = test_app!();
        let request = TestRequest::post()
            .uri("/citizens/")
            .set_json(json!({ "name": "Asha", "age": -4, "gender": "F", "mobile": "1", "occupation": "Farmer", "street_id": 1 }))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_non_numeric_path_is_bad_request() {
        let app = test_app!();
        let response = test::call_service(&app, TestRequest::get().uri("/booths/abc/summary").to_request()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_zero_path_id_is_bad_request() {
        let app = test_app!();
        let response = test::call_service(&app, TestRequest::get().uri("/booths/0/scheme-coverage/1").to_request()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_list_without_database_is_server_error() {
        let app = test_app!();
        let response = test::call_service(&app, TestRequest::get().uri("/booths/").to_request()).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["code"], 1003);
    }
}

#[cfg(feature = "integration-test")]
#[cfg(test)]
mod integration_test {
    use actix_web::{App, http::StatusCode, middleware::NormalizePath, test, test::TestRequest};
    use serde_json::{Value, json};
    use sqlx::PgPool;

    use super::*;
    use crate::{
        api::rest::{json_config, path_config, query_config},
        dao::{coverage::CoverageDao, registry::RegistryDao},
        service::{coverage::CoverageService, registry::RegistryService},
    };

    #[actix_web::test]
    async fn test_farmer_scheme_scenario() {
        let pool = init_db().await;
        let state = web::Data::new(AppState::new(RegistryService::new(RegistryDao::new(), Some(pool.clone())), CoverageService::new(CoverageDao::new(), RegistryDao::new(), Some(pool))));
        let app = test::init_service(App::new().wrap(NormalizePath::trim()).app_data(state).app_data(json_config()).app_data(query_config()).app_data(path_config()).configure(configure)).await;

        let booth: Value = test::call_and_read_body_json(&app, TestRequest::post().uri("/booths/").set_json(json!({ "name": "B1", "ward": "W1" })).to_request()).await;
        let query_response = test::call_service(&app, TestRequest::post().uri("/booths/?name=B2&ward=W2").to_request()).await;
        assert_eq!(query_response.status(), StatusCode::CREATED);
        let query_booth: Value = test::read_body_json(query_response).await;
        assert_eq!(query_booth["ward"], "W2");
        let street: Value = test::call_and_read_body_json(&app, TestRequest::post().uri("/streets/").set_json(json!({ "name": "S1", "booth_id": booth["id"] })).to_request()).await;
        let youth: Value = test::call_and_read_body_json(
            &app,
            TestRequest::post().uri("/citizens/").set_json(json!({ "name": "Asha", "age": 25, "gender": "F", "mobile": "1", "occupation": "Farmer", "street_id": street["id"] })).to_request(),
        )
        .await;
        assert_eq!(youth["segment"], "Youth");
        let farmer: Value = test::call_and_read_body_json(
            &app,
            TestRequest::post().uri("/citizens/").set_json(json!({ "name": "Ravi", "age": 45, "gender": "M", "mobile": "2", "occupation": "Farmer", "street_id": street["id"] })).to_request(),
        )
        .await;
        assert_eq!(farmer["segment"], "Farmer");
        let scheme: Value = test::call_and_read_body_json(&app, TestRequest::post().uri("/schemes/").set_json(json!({ "name": "Farmer Support", "description": "Seeds" })).to_request()).await;

        let uri = format!("/schemes/{}/gap-analysis", scheme["id"]);
        let first: Value = test::call_and_read_body_json(&app, TestRequest::get().uri(&uri).to_request()).await;
        let second: Value = test::call_and_read_body_json(&app, TestRequest::get().uri(&uri).to_request()).await;
        assert_eq!(first, second);
        assert_eq!(first["not_covered_count"].as_i64(), first["eligible_count"].as_i64());

        let summary: Value = test::call_and_read_body_json(&app, TestRequest::get().uri(&format!("/booths/{}/summary", booth["id"])).to_request()).await;
        assert_eq!(summary["total_citizens"], 2);

        let notification: Value = test::call_and_read_body_json(
            &app,
            TestRequest::post().uri("/notifications/").set_json(json!({ "street_id": street["id"], "message": "Camp", "role": "admin" })).to_request(),
        )
        .await;
        assert_eq!(notification["targeted_households"], 2);

        let missing = test::call_service(&app, TestRequest::get().uri("/schemes/999999999/gap-analysis").to_request()).await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
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
