use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use hrpulse_sentiment::{
    run_feedback_batch, BatchOutcome, FeedbackInput, TierStatus, TieredAnalysis,
};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

const MIN_RATING: f32 = 1.0;
const MAX_RATING: f32 = 5.0;

#[derive(Debug, Deserialize)]
pub(super) struct AnalyzeRequest {
    pub text: Option<String>,
    #[serde(default)]
    pub rating: Option<f32>,
}

#[derive(Debug, Deserialize)]
pub(super) struct BatchRequest {
    pub items: Vec<AnalyzeRequest>,
}

/// Empty text is valid and yields the neutral default; a missing `text` is not.
fn validate(request: AnalyzeRequest) -> Result<FeedbackInput, String> {
    let text = request.text.ok_or_else(|| "text is required".to_string())?;

    if let Some(rating) = request.rating {
        if !rating.is_finite() || !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(format!(
                "rating must be between {MIN_RATING} and {MAX_RATING}, got {rating}"
            ));
        }
    }

    Ok(FeedbackInput {
        text,
        rating: request.rating,
    })
}

fn json_body<T>(
    req_id: &RequestId,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| {
            ApiError::new(req_id.0.clone(), "validation_error", rejection.body_text())
        })
}

pub(super) async fn analyze_feedback(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<TieredAnalysis>>, ApiError> {
    let request = json_body(&req_id, payload)?;
    let input = validate(request)
        .map_err(|message| ApiError::new(req_id.0.clone(), "validation_error", message))?;

    let analysis = state
        .analyzer
        .analyze_with_tier(&input.text, input.rating)
        .await;

    Ok(Json(ApiResponse {
        data: analysis,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn analyze_batch(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<BatchRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<BatchOutcome>>, ApiError> {
    let request = json_body(&req_id, payload)?;

    if request.items.is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "items must not be empty",
        ));
    }
    if request.items.len() > state.max_batch_size {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            format!(
                "batch of {} items exceeds the limit of {}",
                request.items.len(),
                state.max_batch_size
            ),
        ));
    }

    let inputs = request
        .items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            validate(item).map_err(|message| format!("items[{index}]: {message}"))
        })
        .collect::<Result<Vec<_>, _>>()
        .map_err(|message| ApiError::new(req_id.0.clone(), "validation_error", message))?;

    let outcome = run_feedback_batch(&state.analyzer, &inputs, state.batch_concurrency).await;

    Ok(Json(ApiResponse {
        data: outcome,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn list_capabilities(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<TierStatus>>> {
    Json(ApiResponse {
        data: state.analyzer.tiers(),
        meta: ResponseMeta::new(req_id.0),
    })
}
