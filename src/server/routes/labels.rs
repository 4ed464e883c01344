//! Label listing endpoint

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::server::state::SharedState;

/// One class the served model can predict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelInfo {
    pub class_index: usize,
    pub class_key: String,
    pub display_name: String,
    pub description: String,
}

/// GET /labels - Classes in model output order
pub async fn list_labels(State(state): State<SharedState>) -> Json<Vec<LabelInfo>> {
    let registry = state.predictor.registry();
    let labels = state
        .predictor
        .classes()
        .classes()
        .iter()
        .enumerate()
        .map(|(class_index, key)| LabelInfo {
            class_index,
            class_key: key.clone(),
            display_name: registry.display_name(key),
            description: registry.description(key).to_string(),
        })
        .collect();

    Json(labels)
}
