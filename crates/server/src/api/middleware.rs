//! Request metrics and caller identification.

use axum::{
    body::Body,
    extract::FromRequestParts,
    http::{request::Parts, Request},
    middleware::Next,
    response::Response,
};
use std::future::Future;
use std::time::Instant;

use crate::metrics::{
    normalize_path, HTTP_REQUESTS_IN_FLIGHT, HTTP_REQUESTS_TOTAL, HTTP_REQUEST_DURATION,
};

/// Header carrying the caller's session identifier.
pub const SESSION_HEADER: &str = "x-session-id";

/// Caller used when no session header is sent.
pub const ANONYMOUS: &str = "anonymous";

const MAX_SESSION_LEN: usize = 128;

/// Metrics middleware that tracks HTTP request duration and counts.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = normalize_path(request.uri().path());

    HTTP_REQUESTS_IN_FLIGHT.inc();

    let response = next.run(request).await;

    HTTP_REQUESTS_IN_FLIGHT.dec();

    let duration = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    HTTP_REQUEST_DURATION
        .with_label_values(&[&method, &path, &status])
        .observe(duration);
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[&method, &path, &status])
        .inc();

    response
}

/// Extractor for the caller identity.
///
/// Reads `X-Session-Id`. A missing, blank, non-UTF-8 or oversized header
/// falls back to `anonymous`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller(pub String);

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        let caller = parts
            .headers
            .get(SESSION_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty() && value.len() <= MAX_SESSION_LEN)
            .unwrap_or(ANONYMOUS)
            .to_string();
        std::future::ready(Ok(Caller(caller)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, middleware, routing::get, Router};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn echo_caller(Caller(caller): Caller) -> String {
        caller
    }

    fn app() -> Router {
        Router::new()
            .route("/whoami", get(echo_caller))
            .layer(middleware::from_fn(metrics_middleware))
    }

    async fn whoami(header: Option<&str>) -> String {
        let mut builder = Request::builder().uri("/whoami");
        if let Some(value) = header {
            builder = builder.header("X-Session-Id", value);
        }
        let response = app()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_caller_from_header() {
        assert_eq!(whoami(Some("  session-42 ")).await, "session-42");
    }

    #[tokio::test]
    async fn test_caller_defaults_to_anonymous() {
        assert_eq!(whoami(None).await, ANONYMOUS);
        assert_eq!(whoami(Some("   ")).await, ANONYMOUS);
        let oversized = "x".repeat(MAX_SESSION_LEN + 1);
        assert_eq!(whoami(Some(oversized.as_str())).await, ANONYMOUS);
    }

    #[tokio::test]
    async fn test_metrics_middleware_counts_requests() {
        let before = HTTP_REQUESTS_TOTAL
            .with_label_values(&["GET", "/whoami", "200"])
            .get();
        whoami(None).await;
        let after = HTTP_REQUESTS_TOTAL
            .with_label_values(&["GET", "/whoami", "200"])
            .get();
        assert!(after > before);
    }
}
