pub mod model;
pub mod system;

pub use model::*;
pub use system::*;

use axum::{http::StatusCode, Json};

use crate::api::types::ErrorResponse;
use crate::error::IrisError;

/// Error half of every handler result
pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub(crate) fn error_response(status: StatusCode, detail: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            detail: detail.into(),
        }),
    )
}

/// Map a service error onto its HTTP status
pub(crate) fn api_error(err: IrisError) -> ApiError {
    let status = match &err {
        IrisError::Unauthorized(_) => StatusCode::FORBIDDEN,
        IrisError::NotTrained => StatusCode::BAD_REQUEST,
        IrisError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if !err.is_client_error() {
        tracing::error!("Request failed: {}", err);
    }
    error_response(status, err.to_string())
}
