//! HTTP metrics middleware for recording request/response metrics

use std::time::Instant;

use axum::{body::Body, http::Request, middleware::Next, response::Response};

use super::logging::matched_path;
use crate::infrastructure::observability::record_http_request;

/// Middleware to record HTTP request metrics
///
/// Labels use the matched route template so identifiers do not inflate
/// cardinality.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = matched_path(&request);

    let response = next.run(request).await;

    record_http_request(
        method.as_str(),
        &path,
        response.status().as_u16(),
        start.elapsed(),
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{middleware, routing::get, Router};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_passes_response_through() {
        let app = Router::new()
            .route("/api/tasks/{id}", get(|| async { "task" }))
            .layer(middleware::from_fn(metrics_middleware));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/tasks/550e8400-e29b-41d4-a716-446655440000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), axum::http::StatusCode::OK);
    }
}
