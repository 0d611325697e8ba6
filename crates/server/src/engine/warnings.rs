//! Warning synthesiser: flags mandatory-life, dangerousness, and
//! Schedule 18A mismatches that the sentencer should review.

use shared_types::{CalculationInput, OffenceRecord, SentenceType};

pub const WARN_REPEAT_LISTED: &str = "Mandatory life sentence route may be engaged for repeat \
     listed offence; review SC283/SC273 conditions.";
pub const WARN_DANGEROUSNESS_LIFE_MAX: &str = "Dangerousness + specified offence + life max may \
     trigger mandatory life provisions; review SC285/SC274/SC258.";
pub const WARN_SPECIAL_NOT_18A: &str = "Special custodial sentence selected but offence is not \
     marked Schedule 18A in offence metadata.";

/// Evaluate the warning conjunctions against the final pre-plea term.
pub fn synthesise(
    offence: &OffenceRecord,
    input: &CalculationInput,
    final_pre_plea_months: Option<f64>,
) -> Vec<String> {
    let mut warnings = Vec::new();

    let adult = input.age_at_sentence >= 18;
    if offence.listed_offence
        && adult
        && input.prior_listed_offence_with_custody
        && final_pre_plea_months.is_some_and(|pre| pre >= 120.0)
    {
        warnings.push(WARN_REPEAT_LISTED.to_string());
    }

    if offence.is_specified() && input.dangerousness_assessed && offence.has_life_maximum() {
        warnings.push(WARN_DANGEROUSNESS_LIFE_MAX.to_string());
    }

    if input.sentence_type == SentenceType::SpecialCustodialSentence && !offence.schedule18a_offence
    {
        warnings.push(WARN_SPECIAL_NOT_18A.to_string());
    }

    warnings
}
