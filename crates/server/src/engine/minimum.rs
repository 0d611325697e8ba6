//! Minimum-sentence decider.
//!
//! Maps an offence's minimum-sentence code (A, B, C1-C4, D, E) plus the
//! offender's dates, ages, plea, and prior convictions onto a floor
//! decision. Floors are stated in months to 1dp; the guilty-plea floor
//! discount is a fixed 0.8 of the pre-plea floor, independent of the plea
//! discount table.

use chrono::NaiveDate;

use shared_types::{CalculationInput, MinimumDecision, OffenceRecord, PleaStage};

use super::date;

/// Fixed discount applied to a minimum floor on any guilty plea.
const GUILTY_PLEA_FLOOR_FACTOR: f64 = 0.8;

pub const REASON_OVERRIDE: &str = "minimum disapplied by input override";
pub const REASON_THIRD_BURGLARY: &str =
    "Minimum sentence: third domestic burglary (36-month floor)";
pub const REASON_THIRD_TRAFFICKING: &str =
    "Minimum sentence: third Class A drug trafficking offence (84-month floor)";
pub const REASON_FIREARM_ADULT: &str =
    "Minimum sentence: prohibited firearm, offender aged 18 or over (60-month floor)";
pub const REASON_FIREARM_YOUTH: &str =
    "Minimum sentence: prohibited firearm, offender aged 16-17 (36-month floor)";
pub const REASON_REPEAT_WEAPON_ADULT: &str =
    "Minimum sentence: repeat bladed article or offensive weapon offence (6-month floor)";
pub const REASON_REPEAT_WEAPON_YOUTH: &str =
    "Minimum sentence: repeat bladed article or offensive weapon offence aged 16-17 \
     (4-month detention and training order)";
pub const REASON_THREATENING_WEAPON_ADULT: &str =
    "Minimum sentence: threatening with a bladed article or offensive weapon (6-month floor)";
pub const REASON_THREATENING_WEAPON_YOUTH: &str =
    "Minimum sentence: threatening with a bladed article or offensive weapon aged 16-17 \
     (4-month detention and training order)";

/// Decide whether a statutory minimum floor applies.
pub fn decide(offence: &OffenceRecord, input: &CalculationInput) -> MinimumDecision {
    if input.minimum_sentence_unjust_or_exceptional {
        return MinimumDecision::not_triggered_with_reason(REASON_OVERRIDE);
    }

    let code = offence.minimum_sentence_code.trim();
    if code.is_empty() {
        return MinimumDecision::not_triggered();
    }

    let adult = input.age_at_sentence >= 18;
    let youth_16_17 = (16..=17).contains(&input.age_at_sentence);
    let guilty = input.plea_stage != PleaStage::NotGuilty;

    match code {
        "A" => {
            if adult && input.prior_domestic_burglary_count >= 2 {
                MinimumDecision::triggered(
                    36.0,
                    Some(discounted(36.0, guilty)),
                    REASON_THIRD_BURGLARY,
                )
            } else {
                MinimumDecision::not_triggered()
            }
        }
        "B" => {
            if adult
                && input.offence_date >= date(1997, 10, 1)
                && input.prior_class_a_trafficking_count >= 2
            {
                MinimumDecision::triggered(
                    84.0,
                    Some(discounted(84.0, guilty)),
                    REASON_THIRD_TRAFFICKING,
                )
            } else {
                MinimumDecision::not_triggered()
            }
        }
        "C1" => firearm(Some(date(2004, 1, 22)), input.offence_date, adult, youth_16_17),
        "C2" => firearm(Some(date(2007, 4, 6)), input.offence_date, adult, youth_16_17),
        "C3" => firearm(Some(date(2014, 7, 14)), input.offence_date, adult, youth_16_17),
        "C4" => firearm(None, input.offence_date, adult, youth_16_17),
        "D" => {
            let in_scope = input.offence_date >= date(2015, 7, 17)
                && input.age_at_offence >= 16
                && input.prior_relevant_weapon_conviction;
            if !in_scope {
                MinimumDecision::not_triggered()
            } else if input.age_at_conviction >= 18 {
                MinimumDecision::triggered(
                    6.0,
                    Some(discounted(6.0, guilty)),
                    REASON_REPEAT_WEAPON_ADULT,
                )
            } else if (16..=17).contains(&input.age_at_conviction) {
                // DTO route: no post-plea floor.
                MinimumDecision::triggered(4.0, None, REASON_REPEAT_WEAPON_YOUTH)
            } else {
                MinimumDecision::not_triggered()
            }
        }
        "E" => {
            if adult {
                MinimumDecision::triggered(
                    6.0,
                    Some(discounted(6.0, guilty)),
                    REASON_THREATENING_WEAPON_ADULT,
                )
            } else if youth_16_17 {
                // DTO route: no post-plea floor.
                MinimumDecision::triggered(4.0, None, REASON_THREATENING_WEAPON_YOUTH)
            } else {
                MinimumDecision::not_triggered()
            }
        }
        other => MinimumDecision::not_triggered_with_reason(format!(
            "Unsupported minimum code {}",
            other
        )),
    }
}

fn discounted(floor: f64, guilty: bool) -> f64 {
    if guilty {
        floor * GUILTY_PLEA_FLOOR_FACTOR
    } else {
        floor
    }
}

/// The firearm codes share one shape: an optional offence-date threshold and
/// an age split. Neither branch discounts the floor on a guilty plea.
fn firearm(
    threshold: Option<NaiveDate>,
    offence_date: NaiveDate,
    adult: bool,
    youth_16_17: bool,
) -> MinimumDecision {
    if let Some(t) = threshold {
        if offence_date < t {
            return MinimumDecision::not_triggered();
        }
    }
    if adult {
        MinimumDecision::triggered(60.0, Some(60.0), REASON_FIREARM_ADULT)
    } else if youth_16_17 {
        MinimumDecision::triggered(36.0, Some(36.0), REASON_FIREARM_YOUTH)
    } else {
        MinimumDecision::not_triggered()
    }
}
