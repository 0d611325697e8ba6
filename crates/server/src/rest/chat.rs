use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde_json::Value;

use shared_types::{AppError, ChatTurnRequest, ChatTurnResponse, ErrorBody};

use crate::chat as chat_orchestrator;
use crate::state::AppState;
use crate::validate;

/// POST /chat_turn
#[utoipa::path(
    post,
    path = "/chat_turn",
    request_body = ChatTurnRequest,
    responses(
        (status = 200, description = "Chat turn reply with citations", body = ChatTurnResponse),
        (status = 400, description = "Malformed JSON body", body = ErrorBody),
        (status = 404, description = "Offence not found", body = ErrorBody),
        (status = 422, description = "Validation failure", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody)
    ),
    tag = "retrieval"
)]
pub async fn chat_turn(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ChatTurnResponse>, AppError> {
    let Json(body) = payload.map_err(|e| AppError::bad_request(e.body_text()))?;
    let input = validate::parse_chat(&body).map_err(AppError::validation)?;
    let response = chat_orchestrator::run_turn(&state, input).await?;
    Ok(Json(response))
}
