//! HTTP route handlers

pub mod classify;
pub mod health;
pub mod labels;
pub mod session;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use crate::utils::error::OncoDataError;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Error returned by handlers, rendered as `{"error": "..."}`
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<OncoDataError> for ApiError {
    fn from(err: OncoDataError) -> Self {
        let status = match &err {
            OncoDataError::InvalidImage(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => {
                error!("Request failed: {}", err);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}
