use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Forecast store error: {0}")]
    Store(#[from] StoreError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Store(e) => {
                tracing::error!(operation = e.operation(), error = %e, "Forecast store unavailable");
                (StatusCode::SERVICE_UNAVAILABLE, "Forecast store unavailable")
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
