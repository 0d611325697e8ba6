//! Release-fraction decider.
//!
//! Branch order is significant; the first matching branch wins. The final
//! branch deliberately supports bug-for-bug replication of a legacy
//! upstream (the "ACE bug"): when `replicate_ace_release_bug` is set the
//! 0.4 and 0.5 outcomes are swapped. That flag defaults to true on requests,
//! so the corrected behaviour is strictly opt-in.

use shared_types::{OffenceRecord, ReleaseDecision, SentenceType};

pub const TWO_THIRDS: f64 = 2.0 / 3.0;

/// Provision/name fragments that force two-thirds release at 48+ months.
const SERIOUS_VIOLENT_NAMES: &[&str] = &[
    "manslaughter",
    "soliciting to commit murder",
    "grievous bodily harm with intent",
    "wounding with intent",
    "gbh with intent",
];

/// Provision fragments excluded from the forty-percent regime.
const FORTY_PERCENT_EXCLUDED_PROVISIONS: &[&str] = &[
    "serious crime act 2015 s.76",
    "serious crime act 2015 s.75a",
    "sentencing act 2020 s.363",
    "family law act 1996 s.42a",
    "domestic abuse act 2021 s.39",
    "national security act",
    "official secrets act",
];

/// Decide the release fraction for a sentence. `term` is the post-plea
/// term after floor application.
pub fn decide(
    sentence_type: SentenceType,
    offence: &OffenceRecord,
    term: Option<f64>,
    terrorism_connection: bool,
    replicate_ace_release_bug: bool,
) -> ReleaseDecision {
    if sentence_type.is_life() {
        return ReleaseDecision {
            fraction: None,
            reason: "Life sentence: release not represented as determinate fraction".to_string(),
        };
    }

    if matches!(
        sentence_type,
        SentenceType::CommunityOrder
            | SentenceType::YouthRehabilitationOrder
            | SentenceType::Fine
            | SentenceType::ConditionalDischarge
    ) {
        return ReleaseDecision {
            fraction: None,
            reason: "Non-custodial".to_string(),
        };
    }

    if sentence_type == SentenceType::SuspendedSentenceOrder {
        return ReleaseDecision {
            fraction: None,
            reason: "Suspended: no immediate custody".to_string(),
        };
    }

    let Some(term) = term else {
        return ReleaseDecision {
            fraction: None,
            reason: "No custodial term".to_string(),
        };
    };

    if matches!(
        sentence_type,
        SentenceType::ExtendedSentence | SentenceType::SpecialCustodialSentence
    ) {
        return ReleaseDecision {
            fraction: Some(TWO_THIRDS),
            reason: "Extended/special custodial at two-thirds".to_string(),
        };
    }

    if !sentence_type.is_custodial() {
        return ReleaseDecision {
            fraction: None,
            reason: "Not treated as custodial".to_string(),
        };
    }

    let life_max = offence.has_life_maximum();

    if term >= 84.0 && life_max && (offence.specified_sexual || offence.specified_violent) {
        return ReleaseDecision {
            fraction: Some(TWO_THIRDS),
            reason: "Term of 7 years or more for specified offence with life maximum: \
                     two-thirds release"
                .to_string(),
        };
    }

    if offence.schedule19za || terrorism_connection {
        return ReleaseDecision {
            fraction: Some(TWO_THIRDS),
            reason: "Terrorism-connected or Schedule 19ZA offence: two-thirds release".to_string(),
        };
    }

    if term >= 48.0 && life_max && offence.specified_sexual {
        return ReleaseDecision {
            fraction: Some(TWO_THIRDS),
            reason: "Term of 4 years or more for specified sexual offence with life maximum: \
                     two-thirds release"
                .to_string(),
        };
    }

    if term >= 48.0 && matches_serious_violent_name(offence) {
        return ReleaseDecision {
            fraction: Some(TWO_THIRDS),
            reason: "Term of 4 years or more for listed violent offence: two-thirds release"
                .to_string(),
        };
    }

    let forty = forty_percent_regime(offence, term);
    let fraction: f64 = if replicate_ace_release_bug {
        // Intentionally swapped to replicate the legacy upstream.
        if forty {
            0.5
        } else {
            0.4
        }
    } else if forty {
        0.4
    } else {
        0.5
    };

    let reason = if (fraction - 0.4).abs() < f64::EPSILON {
        "Determinate sentence released at forty percent".to_string()
    } else {
        "Determinate sentence released at one-half".to_string()
    };

    ReleaseDecision {
        fraction: Some(fraction),
        reason,
    }
}

/// Whether the sentence sits in the post-2022 forty-percent release regime.
/// True unless any exclusion holds.
pub fn forty_percent_regime(offence: &OffenceRecord, term: f64) -> bool {
    if term > 48.0 && offence.specified_violent {
        return false;
    }
    if offence
        .offence_category
        .to_lowercase()
        .contains("sexual offence")
    {
        return false;
    }

    let provision = offence.provision.to_lowercase();
    if provision.contains("protection from harassment") && provision.contains("stalking") {
        return false;
    }
    if FORTY_PERCENT_EXCLUDED_PROVISIONS
        .iter()
        .any(|p| provision.contains(p))
    {
        return false;
    }

    true
}

fn matches_serious_violent_name(offence: &OffenceRecord) -> bool {
    let provision = offence.provision.to_lowercase();
    let name = offence.name.to_lowercase();
    SERIOUS_VIOLENT_NAMES
        .iter()
        .any(|n| provision.contains(n) || name.contains(n))
}

/// Human-readable label for a release fraction, used in traces and chat
/// summaries.
pub fn fraction_label(fraction: f64) -> &'static str {
    if (fraction - 0.4).abs() < 1e-9 {
        "40%"
    } else if (fraction - 0.5).abs() < 1e-9 {
        "50%"
    } else {
        "two-thirds"
    }
}
