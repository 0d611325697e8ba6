use serde::{Deserialize, Serialize};

use crate::calculation::CalculateSentenceResponse;

/// A scored guideline chunk returned by retrieval.
///
/// `score` is the fused ranking score: `0.75 * (1 - cosine_distance) +
/// 0.25 * ts_rank` on the hybrid path, plain `ts_rank` on the lexical path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct GuidelineChunk {
    pub id: String,
    pub guideline_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offence_id: Option<String>,
    pub guideline_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vector_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_score: Option<f64>,
}

/// Body of `POST /search_guidelines`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SearchGuidelinesRequest {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offence_id: Option<String>,
    /// Clamped into 1..=20; defaults to the configured retrieval top-k.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<i64>,
}

/// Body of the `POST /search_guidelines` success response.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SearchGuidelinesResponse {
    pub results: Vec<GuidelineChunk>,
}

/// Body of `POST /chat_turn`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ChatTurnRequest {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offence_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offence_query: Option<String>,
    /// Optional calculation sub-request; absent offence identifiers are
    /// inherited from the outer request.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub calculation: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<i64>,
}

/// Body of the `POST /chat_turn` success response.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ChatTurnResponse {
    pub reply: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calculation: Option<CalculateSentenceResponse>,
    pub citations: Vec<GuidelineChunk>,
    pub follow_ups: Vec<String>,
}
