//! Best-effort audit writes.
//!
//! The audit insert runs after the response payload is finalised and never
//! affects the caller: failures and timeouts are logged at `warn` and
//! swallowed.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use shared_types::CalculateSentenceResponse;

use crate::store::GuidelineStore;

/// Ceiling on how long an audit write may run before being abandoned.
const AUDIT_TIMEOUT: Duration = Duration::from_secs(2);

/// Fire-and-forget audit insert for a completed calculation.
pub fn spawn_audit(
    store: Arc<dyn GuidelineStore>,
    offence_id: String,
    request: Value,
    response: &CalculateSentenceResponse,
) {
    let result = match serde_json::to_value(response) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(error = %e, "Audit payload could not be serialised");
            return;
        }
    };

    tokio::spawn(async move {
        let write = store.store_calculation_audit(&offence_id, &request, &result);
        match tokio::time::timeout(AUDIT_TIMEOUT, write).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::warn!(error = %e, offence_id = %offence_id, "Audit write failed")
            }
            Err(_) => {
                tracing::warn!(offence_id = %offence_id, "Audit write timed out")
            }
        }
    });
}
