use serde::{Deserialize, Serialize};

// ── Offence validation constants ────────────────────────────────────

/// Valid minimum-sentence codes carried on offence metadata. The empty
/// string (no minimum regime) is also accepted on records.
pub const MINIMUM_SENTENCE_CODES: &[&str] = &["A", "B", "C1", "C2", "C3", "C4", "D", "E"];

/// Check whether a minimum-sentence code string is one of the known codes.
pub fn is_minimum_sentence_code(s: &str) -> bool {
    MINIMUM_SENTENCE_CODES.contains(&s)
}

// ── OffenceRecord ───────────────────────────────────────────────────

/// Canonical offence metadata as resolved from the catalogue.
///
/// Immutable for the lifetime of a request. The seven statutory flags gate
/// minimum-sentence, release-point, and warning behaviour in the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct OffenceRecord {
    /// Opaque UUID string assigned by the catalogue.
    pub id: String,
    pub name: String,
    pub short_name: String,
    pub offence_category: String,
    /// Legislative provision, e.g. "Offences Against the Person Act 1861 s.18".
    pub provision: String,
    pub guideline_url: String,
    pub legislation_url: String,
    pub maximum_sentence_type: String,
    /// Free-text maximum; contains "life" when a life maximum applies.
    pub maximum_sentence_amount: String,
    /// One of MINIMUM_SENTENCE_CODES, or "" when no minimum regime attaches.
    pub minimum_sentence_code: String,
    pub specified_violent: bool,
    pub specified_sexual: bool,
    pub specified_terrorist: bool,
    pub listed_offence: bool,
    pub schedule18a_offence: bool,
    pub schedule19za: bool,
    pub cta_notification: bool,
}

impl OffenceRecord {
    /// Whether the offence carries a life maximum (case-folded substring
    /// match on the maximum-sentence text).
    pub fn has_life_maximum(&self) -> bool {
        self.maximum_sentence_amount.to_lowercase().contains("life")
    }

    /// Whether any of the specified-offence flags (violent / sexual /
    /// terrorist) is set.
    pub fn is_specified(&self) -> bool {
        self.specified_violent || self.specified_sexual || self.specified_terrorist
    }
}

// ── Sentencing matrix ───────────────────────────────────────────────

/// One culpability/harm cell of an offence's sentencing matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SentencingMatrixRow {
    pub matrix_id: String,
    pub culpability: String,
    pub harm: String,
    pub starting_point: String,
    pub category_range: String,
}

/// The matrix cell matched against the request's culpability/harm labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MatchedRange {
    pub culpability: String,
    pub harm: String,
    pub starting_point: String,
    pub category_range: String,
}

impl From<SentencingMatrixRow> for MatchedRange {
    fn from(row: SentencingMatrixRow) -> Self {
        Self {
            culpability: row.culpability,
            harm: row.harm,
            starting_point: row.starting_point,
            category_range: row.category_range,
        }
    }
}
