use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use tracing::info;

use super::{api_error, error_response, ApiError};
use crate::api::{
    auth::ensure_api_key,
    state::AppState,
    types::{PredictResponse, StatusResponse, TrainRequest, TrainResponse},
};
use crate::model::FeatureVector;

/// POST /model/train
///
/// The body is optional; an empty body trains with the default parameters.
pub async fn train_model(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> std::result::Result<Json<TrainResponse>, ApiError> {
    ensure_api_key(&headers, &state.config.api_key)?;

    let req = if body.iter().all(u8::is_ascii_whitespace) {
        TrainRequest::default()
    } else {
        serde_json::from_slice::<TrainRequest>(&body)
            .map_err(|e| error_response(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?
    };

    info!(
        "Training requested (test_size={}, random_state={})",
        req.test_size, req.random_state
    );
    let summary = state
        .registry
        .train(req.into())
        .await
        .map_err(api_error)?;

    Ok(Json(summary.into()))
}

/// POST /model/predict
///
/// Any body that does not decode to four measurements is a 422, whatever its
/// content type; 400 is reserved for a missing model.
pub async fn predict_species(
    State(state): State<AppState>,
    body: Bytes,
) -> std::result::Result<Json<PredictResponse>, ApiError> {
    let features = serde_json::from_slice::<FeatureVector>(&body)
        .map_err(|e| error_response(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;
    features.validate().map_err(api_error)?;

    let prediction = state
        .registry
        .predict(&features)
        .await
        .map_err(api_error)?;

    Ok(Json(prediction.into()))
}

/// GET /model/status
pub async fn model_status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(state.registry.status().await.into())
}
