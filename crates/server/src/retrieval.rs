//! Hybrid guideline retrieval.
//!
//! Vector + lexical fusion when the embedding service is available;
//! silent degradation to lexical-only when it is not (disabled, missing
//! key, or a failed embedding call).

use shared_types::{AppError, GuidelineChunk};

use crate::embedding::Embedder;
use crate::state::AppState;
use crate::store::GuidelineStore;

/// Bounds on the requested result count.
const TOP_K_MIN: i64 = 1;
const TOP_K_MAX: i64 = 20;

/// Clamp a requested top-k into range, falling back to the configured
/// default when absent.
pub fn effective_top_k(requested: Option<i64>, default_top_k: i64) -> i64 {
    requested.unwrap_or(default_top_k).clamp(TOP_K_MIN, TOP_K_MAX)
}

/// Retrieve guideline chunks for a query, optionally filtered to an
/// offence (directly or via its guideline links, applied store-side).
pub async fn retrieve(
    state: &AppState,
    query: &str,
    offence_id: Option<&str>,
    top_k: Option<i64>,
) -> Result<Vec<GuidelineChunk>, AppError> {
    let k = effective_top_k(top_k, state.settings.retrieval_top_k);
    retrieve_with(
        state.store.as_ref(),
        state.embedder.as_ref(),
        state.settings.enable_vector_search,
        query,
        offence_id,
        k,
    )
    .await
}

async fn retrieve_with(
    store: &dyn GuidelineStore,
    embedder: &dyn Embedder,
    enable_vector_search: bool,
    query: &str,
    offence_id: Option<&str>,
    top_k: i64,
) -> Result<Vec<GuidelineChunk>, AppError> {
    if enable_vector_search && embedder.is_configured() {
        match embedder.embed(query).await {
            Ok(embedding) => {
                let chunks = store
                    .search_chunks_hybrid(query, &embedding, top_k, offence_id)
                    .await?;
                return Ok(chunks);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Embedding failed; falling back to lexical search");
            }
        }
    }

    let chunks = store.search_chunks_text(query, top_k, offence_id).await?;
    Ok(chunks)
}
