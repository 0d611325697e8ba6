//! Culpability/harm matrix lookup.

use shared_types::{AppError, MatchedRange, SentencingMatrixRow};

use crate::store::GuidelineStore;

/// Fetch an offence's matrix and match the request's culpability/harm
/// labels against it. No match is not an error; the response just carries
/// a null matched range.
pub async fn lookup(
    store: &dyn GuidelineStore,
    offence_id: &str,
    culpability: Option<&str>,
    harm: Option<&str>,
) -> Result<Option<MatchedRange>, AppError> {
    let (Some(culpability), Some(harm)) = (culpability, harm) else {
        return Ok(None);
    };
    let rows = store.fetch_sentencing_matrix(offence_id).await?;
    Ok(best_match(&rows, culpability, harm))
}

/// Case-folded exact match on both labels first; failing that, a
/// case-folded substring match (request label contained in row label).
pub fn best_match(
    rows: &[SentencingMatrixRow],
    culpability: &str,
    harm: &str,
) -> Option<MatchedRange> {
    let culp = culpability.to_lowercase();
    let harm = harm.to_lowercase();

    if let Some(row) = rows
        .iter()
        .find(|r| r.culpability.to_lowercase() == culp && r.harm.to_lowercase() == harm)
    {
        return Some(row.clone().into());
    }

    rows.iter()
        .find(|r| {
            r.culpability.to_lowercase().contains(&culp) && r.harm.to_lowercase().contains(&harm)
        })
        .map(|row| row.clone().into())
}
