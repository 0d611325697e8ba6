use axum::Json;
use utoipa::OpenApi;

use shared_types::{
    CalculateSentenceResponse, CalculationRequest, ChatTurnRequest, ChatTurnResponse, ErrorBody,
    ErrorDetail, GuidelineChunk, MatchedRange, MinimumDecision, OffenceRecord, PleaStage,
    ReleaseDecision, SearchGuidelinesRequest, SearchGuidelinesResponse, SentenceType,
    SentencingMatrixRow, ValidationIssue,
};

use crate::rest::health::HealthResponse;

/// Aggregate OpenAPI document for the service.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Sentencing Calculation & Retrieval Service",
        description = "Deterministic sentencing outcomes (plea discounts, statutory minimum \
                       floors, release fractions, victim surcharge) plus hybrid retrieval over \
                       indexed guideline chunks."
    ),
    paths(
        crate::rest::health::health_check,
        crate::rest::calculate::calculate_sentence,
        crate::rest::search::search_guidelines,
        crate::rest::chat::chat_turn,
    ),
    components(schemas(
        HealthResponse,
        CalculationRequest,
        CalculateSentenceResponse,
        SearchGuidelinesRequest,
        SearchGuidelinesResponse,
        ChatTurnRequest,
        ChatTurnResponse,
        GuidelineChunk,
        MatchedRange,
        MinimumDecision,
        ReleaseDecision,
        OffenceRecord,
        SentencingMatrixRow,
        PleaStage,
        SentenceType,
        ErrorBody,
        ErrorDetail,
        ValidationIssue,
    )),
    tags(
        (name = "health", description = "Liveness"),
        (name = "sentencing", description = "Deterministic sentencing calculation"),
        (name = "retrieval", description = "Guideline retrieval and chat turns"),
    )
)]
pub struct ApiDoc;

/// GET /openapi.json
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
