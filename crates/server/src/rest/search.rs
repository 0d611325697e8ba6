use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde_json::Value;

use shared_types::{AppError, ErrorBody, SearchGuidelinesRequest, SearchGuidelinesResponse};

use crate::retrieval;
use crate::state::AppState;
use crate::validate;

/// POST /search_guidelines
#[utoipa::path(
    post,
    path = "/search_guidelines",
    request_body = SearchGuidelinesRequest,
    responses(
        (status = 200, description = "Ranked guideline chunks", body = SearchGuidelinesResponse),
        (status = 400, description = "Malformed JSON body", body = ErrorBody),
        (status = 422, description = "Validation failure", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody)
    ),
    tag = "retrieval"
)]
pub async fn search_guidelines(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SearchGuidelinesResponse>, AppError> {
    let Json(body) = payload.map_err(|e| AppError::bad_request(e.body_text()))?;
    let input = validate::parse_search(&body).map_err(AppError::validation)?;
    let results = retrieval::retrieve(
        &state,
        &input.query,
        input.offence_id.as_deref(),
        input.top_k,
    )
    .await?;
    Ok(Json(SearchGuidelinesResponse { results }))
}
