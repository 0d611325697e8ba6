//! Deterministic sentencing rules engine.
//!
//! Pure functions only: the orchestrator consumes a resolved offence and a
//! validated input and produces the full calculation response. Trace lines
//! are emitted in a fixed order (plea, minimum, floor lifts, release); the
//! surcharge contributes no trace line.

pub mod floors;
pub mod minimum;
pub mod plea;
pub mod release;
pub mod surcharge;
pub mod warnings;

use chrono::NaiveDate;

use shared_types::{
    fmt_months, round2, CalculateSentenceResponse, CalculationInput, MatchedRange, OffenceRecord,
};

/// Calendar date from literal components. All call sites pass fixed
/// statutory dates.
pub(crate) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date literal")
}

/// Run the full calculation pipeline. `trace` carries any lines emitted
/// during offence resolution and is extended in pipeline order.
pub fn calculate(
    offence: &OffenceRecord,
    input: &CalculationInput,
    matched_range: Option<MatchedRange>,
    mut trace: Vec<String>,
) -> CalculateSentenceResponse {
    // Plea discount
    let pre = input.pre_plea_term_months.map(round2);
    let post = plea::apply(input.plea_stage, pre);
    let (num, den) = plea::discount_factor(input.plea_stage);
    match (pre, post) {
        (Some(_), Some(p)) => trace.push(format!(
            "Plea stage {}: discount factor {}/{} gives post-plea term {} months",
            input.plea_stage.as_wire(),
            num,
            den,
            fmt_months(p)
        )),
        _ => trace.push("No pre-plea term provided; plea discount not applied".to_string()),
    }

    // Minimum sentence
    let decision = minimum::decide(offence, input);
    match (decision.triggered, &decision.reason) {
        (true, Some(reason)) => trace.push(format!("Minimum sentence engaged: {}", reason)),
        (false, Some(reason)) => trace.push(format!("Minimum sentence not engaged: {}", reason)),
        _ => trace.push("No minimum sentence provision engaged".to_string()),
    }

    // Floor lifts
    let (pre, post) = floors::apply(&decision, pre, post, &mut trace);

    // Release fraction
    let release = release::decide(
        input.sentence_type,
        offence,
        post,
        input.terrorism_connection,
        input.replicate_ace_release_bug,
    );
    match release.fraction {
        Some(f) => trace.push(format!(
            "Release point {}: {}",
            release::fraction_label(f),
            release.reason
        )),
        None => trace.push(format!("No release fraction: {}", release.reason)),
    }

    let estimated_time_in_custody_months = match (post, release.fraction) {
        (Some(term), Some(fraction)) => Some(round2(term * fraction)),
        _ => None,
    };

    let victim_surcharge_gbp = surcharge::amount(
        input.offence_date,
        input.age_at_offence,
        input.sentence_type,
        input.fine_amount,
        post.or(pre),
    );

    let warnings = warnings::synthesise(offence, input, pre);

    CalculateSentenceResponse {
        offence_id: offence.id.clone(),
        offence_name: offence.name.clone(),
        sentence_type: input.sentence_type,
        pre_plea_term_months: pre,
        post_plea_term_months: post,
        minimum_sentence_triggered: decision.triggered,
        minimum_floor_pre_plea_months: decision.floor_pre_months,
        minimum_floor_post_plea_months: decision.floor_post_months,
        release_fraction: release.fraction,
        estimated_time_in_custody_months,
        victim_surcharge_gbp,
        matched_range,
        warnings,
        trace,
    }
}
