//! Calculation pipeline: resolve, look up the matrix, run the engine,
//! then queue the best-effort audit write.

use serde_json::Value;

use shared_types::{AppError, CalculateSentenceResponse, CalculationInput};

use crate::state::AppState;
use crate::{audit, engine, matrix, resolver};

/// Run a validated calculation end to end. `raw_request` is the request
/// body as received, persisted verbatim in the audit record.
pub async fn run_calculation(
    state: &AppState,
    raw_request: &Value,
    input: &CalculationInput,
) -> Result<CalculateSentenceResponse, AppError> {
    let (offence, trace) = resolver::resolve(state.store.as_ref(), input).await?;

    let matched_range = matrix::lookup(
        state.store.as_ref(),
        &offence.id,
        input.culpability.as_deref(),
        input.harm.as_deref(),
    )
    .await?;

    let response = engine::calculate(&offence, input, matched_range, trace);

    // Queued strictly after the response payload is finalised.
    audit::spawn_audit(
        state.store.clone(),
        offence.id.clone(),
        raw_request.clone(),
        &response,
    );

    Ok(response)
}
