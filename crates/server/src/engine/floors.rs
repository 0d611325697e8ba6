//! Floor application: lift pre/post terms up to any triggered minimum.

use shared_types::{fmt_months, MinimumDecision};

/// Apply a minimum decision to the pre/post terms, appending a trace line
/// for every lift. A term below its floor is raised to it; a missing term
/// is set to the floor outright.
pub fn apply(
    decision: &MinimumDecision,
    pre: Option<f64>,
    post: Option<f64>,
    trace: &mut Vec<String>,
) -> (Option<f64>, Option<f64>) {
    if !decision.triggered {
        return (pre, post);
    }

    let pre = lift(pre, decision.floor_pre_months, "Pre-plea", trace);
    let post = lift(post, decision.floor_post_months, "Post-plea", trace);
    (pre, post)
}

fn lift(
    term: Option<f64>,
    floor: Option<f64>,
    label: &str,
    trace: &mut Vec<String>,
) -> Option<f64> {
    let Some(floor) = floor else {
        return term;
    };
    match term {
        None => {
            trace.push(format!(
                "{} term set to minimum floor {} months",
                label,
                fmt_months(floor)
            ));
            Some(floor)
        }
        Some(t) if t < floor => {
            trace.push(format!(
                "{} term raised from {} to minimum floor {} months",
                label,
                fmt_months(t),
                fmt_months(floor)
            ));
            Some(floor)
        }
        Some(t) => Some(t),
    }
}
