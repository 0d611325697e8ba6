use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::offence::MatchedRange;

// ── Plea stage ──────────────────────────────────────────────────────

/// Procedural moment at which a guilty plea was indicated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PleaStage {
    FirstStage,
    AfterFirstStageBeforeTrial,
    DayOfTrial,
    AfterTrialBegins,
    NotGuilty,
}

/// Wire labels for PleaStage, used in validation error messages.
pub const PLEA_STAGES: &[&str] = &[
    "first_stage",
    "after_first_stage_before_trial",
    "day_of_trial",
    "after_trial_begins",
    "not_guilty",
];

impl PleaStage {
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "first_stage" => Some(Self::FirstStage),
            "after_first_stage_before_trial" => Some(Self::AfterFirstStageBeforeTrial),
            "day_of_trial" => Some(Self::DayOfTrial),
            "after_trial_begins" => Some(Self::AfterTrialBegins),
            "not_guilty" => Some(Self::NotGuilty),
            _ => None,
        }
    }

    pub fn as_wire(&self) -> &'static str {
        match self {
            Self::FirstStage => "first_stage",
            Self::AfterFirstStageBeforeTrial => "after_first_stage_before_trial",
            Self::DayOfTrial => "day_of_trial",
            Self::AfterTrialBegins => "after_trial_begins",
            Self::NotGuilty => "not_guilty",
        }
    }
}

// ── Sentence type ───────────────────────────────────────────────────

/// Disposal type being considered for the offence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SentenceType {
    DeterminateCustodialSentence,
    ExtendedSentence,
    SpecialCustodialSentence,
    DetentionAndTrainingOrder,
    MandatoryLifeSentence,
    DiscretionaryLifeSentence,
    SuspendedSentenceOrder,
    CommunityOrder,
    YouthRehabilitationOrder,
    Fine,
    ConditionalDischarge,
}

/// Wire labels for SentenceType, used in validation error messages.
pub const SENTENCE_TYPES: &[&str] = &[
    "determinate_custodial_sentence",
    "extended_sentence",
    "special_custodial_sentence",
    "detention_and_training_order",
    "mandatory_life_sentence",
    "discretionary_life_sentence",
    "suspended_sentence_order",
    "community_order",
    "youth_rehabilitation_order",
    "fine",
    "conditional_discharge",
];

impl SentenceType {
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "determinate_custodial_sentence" => Some(Self::DeterminateCustodialSentence),
            "extended_sentence" => Some(Self::ExtendedSentence),
            "special_custodial_sentence" => Some(Self::SpecialCustodialSentence),
            "detention_and_training_order" => Some(Self::DetentionAndTrainingOrder),
            "mandatory_life_sentence" => Some(Self::MandatoryLifeSentence),
            "discretionary_life_sentence" => Some(Self::DiscretionaryLifeSentence),
            "suspended_sentence_order" => Some(Self::SuspendedSentenceOrder),
            "community_order" => Some(Self::CommunityOrder),
            "youth_rehabilitation_order" => Some(Self::YouthRehabilitationOrder),
            "fine" => Some(Self::Fine),
            "conditional_discharge" => Some(Self::ConditionalDischarge),
            _ => None,
        }
    }

    pub fn as_wire(&self) -> &'static str {
        match self {
            Self::DeterminateCustodialSentence => "determinate_custodial_sentence",
            Self::ExtendedSentence => "extended_sentence",
            Self::SpecialCustodialSentence => "special_custodial_sentence",
            Self::DetentionAndTrainingOrder => "detention_and_training_order",
            Self::MandatoryLifeSentence => "mandatory_life_sentence",
            Self::DiscretionaryLifeSentence => "discretionary_life_sentence",
            Self::SuspendedSentenceOrder => "suspended_sentence_order",
            Self::CommunityOrder => "community_order",
            Self::YouthRehabilitationOrder => "youth_rehabilitation_order",
            Self::Fine => "fine",
            Self::ConditionalDischarge => "conditional_discharge",
        }
    }

    /// Sentence types that put the offender into immediate custody.
    pub fn is_custodial(&self) -> bool {
        matches!(
            self,
            Self::DeterminateCustodialSentence
                | Self::ExtendedSentence
                | Self::SpecialCustodialSentence
                | Self::DetentionAndTrainingOrder
        )
    }

    pub fn is_life(&self) -> bool {
        matches!(self, Self::MandatoryLifeSentence | Self::DiscretionaryLifeSentence)
    }
}

// ── Request / validated input ───────────────────────────────────────

/// Wire shape of a `/calculate_sentence` request body.
///
/// This struct documents the contract; the server validates the raw JSON
/// field-by-field so that every violation is reported in one 422 response
/// rather than failing on the first.
#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CalculationRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offence_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offence_query: Option<String>,
    /// ISO-8601 date, interpreted as UTC midnight.
    pub offence_date: Option<String>,
    pub conviction_date: Option<String>,
    pub sentence_date: Option<String>,
    pub age_at_offence: Option<i64>,
    pub age_at_conviction: Option<i64>,
    pub age_at_sentence: Option<i64>,
    pub plea_stage: Option<PleaStage>,
    pub sentence_type: Option<SentenceType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub culpability: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub harm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pre_plea_term_months: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension_months: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fine_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dangerousness_assessed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prior_listed_offence_with_custody: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prior_relevant_weapon_conviction: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terrorism_connection: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_sentence_unjust_or_exceptional: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replicate_ace_release_bug: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prior_domestic_burglary_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prior_class_a_trafficking_count: Option<i64>,
}

/// Fully validated calculation input. Every field here has passed schema
/// and cross-field validation; the engine consumes it without re-checking.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculationInput {
    pub offence_id: Option<String>,
    pub offence_query: Option<String>,
    pub offence_date: NaiveDate,
    pub conviction_date: NaiveDate,
    pub sentence_date: NaiveDate,
    pub age_at_offence: u32,
    pub age_at_conviction: u32,
    pub age_at_sentence: u32,
    pub plea_stage: PleaStage,
    pub sentence_type: SentenceType,
    pub culpability: Option<String>,
    pub harm: Option<String>,
    pub pre_plea_term_months: Option<f64>,
    /// Validated and carried through, reserved for extended-sentence
    /// handling; not used by the core computation.
    pub extension_months: f64,
    pub fine_amount: Option<f64>,
    pub dangerousness_assessed: bool,
    pub prior_listed_offence_with_custody: bool,
    pub prior_relevant_weapon_conviction: bool,
    pub terrorism_connection: bool,
    pub minimum_sentence_unjust_or_exceptional: bool,
    pub replicate_ace_release_bug: bool,
    pub prior_domestic_burglary_count: u32,
    pub prior_class_a_trafficking_count: u32,
}

// ── Engine decisions ────────────────────────────────────────────────

/// Outcome of the minimum-sentence decider.
///
/// `floor_post_months` may be `None` even when triggered: the youth
/// detention-and-training-order branches impose no post-plea floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MinimumDecision {
    pub triggered: bool,
    pub floor_pre_months: Option<f64>,
    pub floor_post_months: Option<f64>,
    pub reason: Option<String>,
}

impl MinimumDecision {
    pub fn not_triggered() -> Self {
        Self {
            triggered: false,
            floor_pre_months: None,
            floor_post_months: None,
            reason: None,
        }
    }

    pub fn not_triggered_with_reason(reason: impl Into<String>) -> Self {
        Self {
            triggered: false,
            floor_pre_months: None,
            floor_post_months: None,
            reason: Some(reason.into()),
        }
    }

    pub fn triggered(
        floor_pre_months: f64,
        floor_post_months: Option<f64>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            triggered: true,
            floor_pre_months: Some(floor_pre_months),
            floor_post_months,
            reason: Some(reason.into()),
        }
    }
}

/// Outcome of the release-fraction decider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ReleaseDecision {
    /// One of 0.4, 0.5, 2/3, or `None` when no determinate fraction applies.
    pub fraction: Option<f64>,
    pub reason: String,
}

// ── Response ────────────────────────────────────────────────────────

/// Full outcome of a sentencing calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CalculateSentenceResponse {
    pub offence_id: String,
    pub offence_name: String,
    pub sentence_type: SentenceType,
    pub pre_plea_term_months: Option<f64>,
    pub post_plea_term_months: Option<f64>,
    pub minimum_sentence_triggered: bool,
    pub minimum_floor_pre_plea_months: Option<f64>,
    pub minimum_floor_post_plea_months: Option<f64>,
    pub release_fraction: Option<f64>,
    pub estimated_time_in_custody_months: Option<f64>,
    pub victim_surcharge_gbp: f64,
    pub matched_range: Option<MatchedRange>,
    pub warnings: Vec<String>,
    pub trace: Vec<String>,
}

// ── Shared numeric helpers ──────────────────────────────────────────

/// Round to 2 decimal places, the display precision of all terms and
/// monetary amounts.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Format a month count without trailing noise: whole values print as
/// integers, fractional values to at most 2dp.
pub fn fmt_months(m: f64) -> String {
    let r = round2(m);
    if r.fract().abs() < f64::EPSILON {
        format!("{}", r as i64)
    } else {
        format!("{}", r)
    }
}
