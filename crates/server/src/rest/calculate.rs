use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde_json::Value;

use shared_types::{AppError, CalculateSentenceResponse, CalculationRequest, ErrorBody};

use crate::pipeline;
use crate::state::AppState;
use crate::validate;

/// POST /calculate_sentence
///
/// The body is taken as raw JSON so validation can report every violation
/// in a single 422 rather than stopping at the first.
#[utoipa::path(
    post,
    path = "/calculate_sentence",
    request_body = CalculationRequest,
    responses(
        (status = 200, description = "Sentencing calculation result", body = CalculateSentenceResponse),
        (status = 400, description = "Malformed JSON body", body = ErrorBody),
        (status = 404, description = "Offence not found", body = ErrorBody),
        (status = 422, description = "Validation failure", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody)
    ),
    tag = "sentencing"
)]
pub async fn calculate_sentence(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<CalculateSentenceResponse>, AppError> {
    let Json(body) = payload.map_err(|e| AppError::bad_request(e.body_text()))?;
    let input = validate::parse_calculation(&body).map_err(AppError::validation)?;
    let response = pipeline::run_calculation(&state, &body, &input).await?;
    Ok(Json(response))
}
