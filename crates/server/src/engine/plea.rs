//! Plea-stage discount.

use shared_types::{round2, PleaStage};

/// Exact rational discount factor for a plea stage, as (numerator,
/// denominator). Applied before any rounding.
pub fn discount_factor(stage: PleaStage) -> (u32, u32) {
    match stage {
        PleaStage::FirstStage => (2, 3),
        PleaStage::AfterFirstStageBeforeTrial => (3, 4),
        PleaStage::DayOfTrial => (9, 10),
        PleaStage::AfterTrialBegins => (19, 20),
        PleaStage::NotGuilty => (1, 1),
    }
}

/// Post-plea term: `round2(pre * factor)`. A missing pre-plea term yields a
/// missing post-plea term.
pub fn apply(stage: PleaStage, pre_plea_term_months: Option<f64>) -> Option<f64> {
    let (num, den) = discount_factor(stage);
    pre_plea_term_months.map(|pre| round2(pre * f64::from(num) / f64::from(den)))
}
