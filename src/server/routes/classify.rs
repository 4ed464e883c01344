//! Classification endpoint - raw image upload in, prediction out

use axum::{body::Bytes, extract::State, Json};
use tracing::warn;

use crate::inference::PredictionResult;
use crate::server::routes::ApiError;
use crate::server::state::SharedState;

/// POST /classify - Classify the uploaded image body
pub async fn classify_upload(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<PredictionResult>, ApiError> {
    let predictor = state.predictor.clone();

    // Forward pass is CPU/GPU bound; keep it off the async workers
    let result = tokio::task::spawn_blocking(move || predictor.classify(&body))
        .await
        .map_err(|e| ApiError::internal(format!("classification task failed: {}", e)))?;

    match result {
        Ok(prediction) => Ok(Json(prediction)),
        Err(e) => {
            warn!("Rejected upload: {}", e);
            Err(e.into())
        }
    }
}
