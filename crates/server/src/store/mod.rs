pub mod supabase;

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

use shared_types::{AppError, GuidelineChunk, OffenceRecord, SentencingMatrixRow};

/// Failure modes of the guideline store.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    /// The store rejected an identifier as not being a valid UUID.
    /// Surfaces to clients as a 422.
    MalformedId(String),
    /// Any other store failure. Surfaces as a 500 with the store's message.
    Backend(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::MalformedId(msg) => write!(f, "malformed identifier: {}", msg),
            StoreError::Backend(msg) => write!(f, "store error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::MalformedId(msg) => AppError::unprocessable(msg),
            StoreError::Backend(msg) => AppError::store(msg),
        }
    }
}

/// Port over the store's RPC surface.
///
/// The process holds exactly one implementation, built at startup and
/// injected into orchestrators through application state; the rules engine
/// itself never touches this trait.
#[async_trait]
pub trait GuidelineStore: Send + Sync {
    /// `fetch_offence_by_id(uuid)`; `None` when no row matches.
    async fn fetch_offence_by_id(&self, id: &str) -> Result<Option<OffenceRecord>, StoreError>;

    /// `search_offences(query, limit)`: trigram-similarity ordered,
    /// best match first, ties broken by canonical name ascending.
    async fn search_offences(
        &self,
        query: &str,
        limit: i64,
    ) -> Result<Vec<OffenceRecord>, StoreError>;

    /// `fetch_sentencing_matrix(uuid)`; rows deduped on matrix_id.
    async fn fetch_sentencing_matrix(
        &self,
        offence_id: &str,
    ) -> Result<Vec<SentencingMatrixRow>, StoreError>;

    /// `search_chunks_text(query, top_k, offence_id)`: lexical ranking.
    async fn search_chunks_text(
        &self,
        query: &str,
        top_k: i64,
        offence_id: Option<&str>,
    ) -> Result<Vec<GuidelineChunk>, StoreError>;

    /// `search_chunks_hybrid(query, embedding, top_k, offence_id)`:
    /// fused vector + lexical ranking.
    async fn search_chunks_hybrid(
        &self,
        query: &str,
        embedding: &[f32],
        top_k: i64,
        offence_id: Option<&str>,
    ) -> Result<Vec<GuidelineChunk>, StoreError>;

    /// `store_calculation_audit(offence_id, request, result)`; best-effort,
    /// callers swallow failures.
    async fn store_calculation_audit(
        &self,
        offence_id: &str,
        request: &Value,
        result: &Value,
    ) -> Result<(), StoreError>;
}
