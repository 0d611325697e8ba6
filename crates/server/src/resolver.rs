//! Offence resolver: by id, or by fuzzy name via the store's trigram
//! similarity RPC.

use shared_types::{AppError, CalculationInput, OffenceRecord};

use crate::store::GuidelineStore;

/// Number of candidates requested from the fuzzy search; the best match
/// wins, the rest only inform the disambiguation notice.
const FUZZY_LIMIT: i64 = 5;

/// Resolve the offence named by the input. Returns the canonical record
/// plus any trace lines describing how it was found.
pub async fn resolve(
    store: &dyn GuidelineStore,
    input: &CalculationInput,
) -> Result<(OffenceRecord, Vec<String>), AppError> {
    if let Some(id) = &input.offence_id {
        let offence = store
            .fetch_offence_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Offence {} not found", id)))?;
        return Ok((offence, Vec::new()));
    }

    // Validation guarantees one of the two identifiers is present.
    let Some(query) = &input.offence_query else {
        return Err(AppError::bad_request(
            "Either offence_id or offence_query must be provided",
        ));
    };

    let candidates = store.search_offences(query, FUZZY_LIMIT).await?;
    let candidate_count = candidates.len();
    let Some(offence) = candidates.into_iter().next() else {
        return Err(AppError::not_found(format!(
            "No offence matched query '{}'",
            query
        )));
    };

    let mut trace = vec![format!(
        "Resolved offence query '{}' to '{}' ({}).",
        query, offence.name, offence.id
    )];
    if candidate_count > 1 {
        trace.push(format!(
            "{} candidate offences matched the query; the highest-similarity match was selected.",
            candidate_count
        ));
    }

    Ok((offence, trace))
}
