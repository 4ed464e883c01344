//! Upload server
//!
//! Thin HTTP surface over the predictor:
//! - `GET /health` - liveness and model summary
//! - `GET /labels` - classes in model output order
//! - `POST /classify` - raw image body, returns a prediction
//! - `POST /session/navigate` - page navigation on a caller-supplied session

pub mod routes;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::AppConfig;
use crate::inference::Predictor;

pub use state::{AppState, SharedState};

/// Build the router over a loaded predictor
pub fn router(predictor: Arc<Predictor>, max_upload_bytes: usize) -> Router {
    let state = Arc::new(AppState::new(predictor));

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/labels", get(routes::labels::list_labels))
        .route("/classify", post(routes::classify::classify_upload))
        .route("/session/navigate", post(routes::session::navigate))
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

/// Bind and serve until the process is stopped
pub async fn serve(config: &AppConfig, predictor: Arc<Predictor>) -> anyhow::Result<()> {
    let app = router(predictor, config.max_upload_bytes);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use image::{DynamicImage, ImageFormat, RgbImage};
    use tower::ServiceExt;

    use crate::inference::engine::test_support::FixedEngine;
    use crate::labels::{ClassIndex, LabelRegistry};

    fn test_router(max_upload_bytes: usize) -> Router {
        let classes = ClassIndex::from_ordered(["lung_aca", "lung_bnt", "lung_scc"]).unwrap();
        let predictor = Predictor::new(
            Arc::new(FixedEngine::new(vec![0.1, 0.7, 0.2])),
            Arc::new(classes),
            LabelRegistry::reference(),
        )
        .unwrap();
        router(Arc::new(predictor), max_upload_bytes)
    }

    fn png_body() -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(RgbImage::new(16, 16))
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    fn post_classify(body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/classify")
            .body(Body::from(body))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_classify_png_through_router() {
        let body = png_body();
        assert!(body.len() < 4096);

        let response = test_router(4096)
            .oneshot(post_classify(body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = json_body(response).await;
        assert_eq!(json["class_key"], "lung_bnt");
    }

    #[tokio::test]
    async fn test_garbage_upload_is_422_with_error_body() {
        let response = test_router(4096)
            .oneshot(post_classify(b"not an image".to_vec()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let json = json_body(response).await;
        assert!(json["error"].is_string());
    }

    #[tokio::test]
    async fn test_oversized_upload_is_rejected() {
        let response = test_router(4096)
            .oneshot(post_classify(vec![0u8; 8192]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_route_table() {
        let app = test_router(4096);

        let health = app
            .clone()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(health.status(), StatusCode::OK);

        let labels = app
            .clone()
            .oneshot(Request::get("/labels").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(labels.status(), StatusCode::OK);
        assert_eq!(json_body(labels).await.as_array().map(Vec::len), Some(3));

        let navigate = app
            .clone()
            .oneshot(
                Request::post("/session/navigate")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"target":"Classifier"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(navigate.status(), StatusCode::OK);
        assert_eq!(json_body(navigate).await["session"]["page"], "Classifier");

        let missing = app
            .oneshot(Request::get("/predict").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }
}
