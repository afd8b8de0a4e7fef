use std::time::{Duration, Instant};

use actix_web::{
    Error,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
};
use tracing::{debug, warn};

/**
 * Requests taking longer than this are reported at warn level.
 */
const SLOW_REQUEST_THRESHOLD: Duration = Duration::from_secs(1);

/**
 * Logs method, path, status and duration of every request under the `performance` target.
 * The `X-Trace-ID` header is included when the caller sent one.
 */
pub async fn timing_middleware(request: ServiceRequest, next: Next<impl MessageBody>) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let start_time = Instant::now();
    let path = request.path().to_owned();
    let method = request.method().to_owned();
    let trace_id = request.headers().get("X-Trace-ID").and_then(|value| value.to_str().ok()).unwrap_or("-").to_owned();
    let response = next.call(request).await;
    let response_code = match &response {
        Ok(service_response) => service_response.status().as_u16(),
        Err(err) => err.as_response_error().status_code().as_u16(),
    };
    let duration = start_time.elapsed();
    if is_slow(duration) {
        warn!(target: "performance", trace_id, "Slow request {} {} with status {} took {}ms", method, path, response_code, duration.as_millis());
    } else {
        debug!(target: "performance", trace_id, "Request for {} {} with status {} processed in {}ms", method, path, response_code, duration.as_millis());
    }
    response
}

fn is_slow(duration: Duration) -> bool {
    duration > SLOW_REQUEST_THRESHOLD
}

#[cfg(test)]
mod test {
    use actix_web::{App, HttpResponse, http::StatusCode, middleware::from_fn, test, web};

    use super::*;

    #[::std::prelude::v1::test]
    fn test_is_slow() {
        assert!(!is_slow(Duration::from_millis(20)));
        assert!(is_slow(Duration::from_millis(1500)));
    }

    #[actix_web::test]
    async fn test_response_passes_through() {
        let app = test::init_service(App::new().wrap(from_fn(timing_middleware)).route("/", web::get().to(|| async { HttpResponse::Accepted().finish() }))).await;
        let response = test::call_service(&app, test::TestRequest::get().uri("/").insert_header(("X-Trace-ID", "abc")).to_request()).await;
        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }
}
