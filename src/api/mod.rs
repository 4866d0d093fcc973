//! HTTP API module
//!
//! A small router used by the `serve` command to show in-flight requests
//! being drained on shutdown.

pub mod handlers;
pub mod responses;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router() -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/work", get(work_handler))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    #[tokio::test]
    async fn health_reports_ok() {
        let response = create_router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn work_echoes_duration() {
        let response = create_router()
            .oneshot(Request::get("/work?ms=5").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["waited_ms"], 5);
    }

    #[tokio::test]
    async fn work_rejects_oversized_requests() {
        let uri = format!("/work?ms={}", MAX_WORK_MS + 1);
        let response = create_router()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
