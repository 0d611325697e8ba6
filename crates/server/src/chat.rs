//! Chat-turn orchestrator: optional calculation plus retrieval, composed
//! into a reply with citations and follow-up prompts.

use serde_json::{Map, Value};

use shared_types::{
    fmt_months, AppError, CalculateSentenceResponse, ChatTurnResponse, GuidelineChunk,
};

use crate::engine::release;
use crate::state::AppState;
use crate::validate::{self, ChatInput};
use crate::{pipeline, retrieval};

pub const REPLY_NEEDS_OFFENCE: &str = "I need one more detail before I can calculate a sentence.";
pub const FOLLOW_UP_NEEDS_OFFENCE: &str =
    "Which offence is this for? Provide offence_id or offence name.";
pub const FOLLOW_UP_OFFER_CALCULATION: &str =
    "Add a calculation object to compute a sentence for this offence.";

/// Run one chat turn.
pub async fn run_turn(state: &AppState, input: ChatInput) -> Result<ChatTurnResponse, AppError> {
    let calculation = match &input.calculation {
        Some(calc) => Some(run_sub_calculation(state, &input, calc.clone()).await?),
        None => None,
    };

    // Retrieval always runs on the user message; the offence filter prefers
    // the freshly resolved offence over the raw request context.
    let filter_offence_id = calculation
        .as_ref()
        .map(|c| c.offence_id.clone())
        .or_else(|| input.offence_id.clone());
    let citations = retrieval::retrieve(
        state,
        &input.message,
        filter_offence_id.as_deref(),
        input.top_k,
    )
    .await?;

    let has_offence_context = input.offence_id.is_some() || input.offence_query.is_some();
    let (reply, follow_ups) = compose_reply(&calculation, &citations, has_offence_context);

    Ok(ChatTurnResponse {
        reply,
        calculation,
        citations,
        follow_ups,
    })
}

/// Run the nested calculation, inheriting offence context from the outer
/// request where the sub-request leaves it out.
async fn run_sub_calculation(
    state: &AppState,
    input: &ChatInput,
    mut calc: Map<String, Value>,
) -> Result<CalculateSentenceResponse, AppError> {
    if !has_text(&calc, "offence_id") {
        if let Some(id) = &input.offence_id {
            calc.insert("offence_id".to_string(), Value::String(id.clone()));
        }
    }
    if !has_text(&calc, "offence_id") && !has_text(&calc, "offence_query") {
        if let Some(q) = &input.offence_query {
            calc.insert("offence_query".to_string(), Value::String(q.clone()));
        }
    }

    let raw = Value::Object(calc);
    let parsed = validate::parse_calculation_at(&raw, &["body", "calculation"])
        .map_err(AppError::validation)?;
    pipeline::run_calculation(state, &raw, &parsed).await
}

fn has_text(map: &Map<String, Value>, key: &str) -> bool {
    map.get(key)
        .and_then(Value::as_str)
        .is_some_and(|s| !s.trim().is_empty())
}

fn compose_reply(
    calculation: &Option<CalculateSentenceResponse>,
    citations: &[GuidelineChunk],
    has_offence_context: bool,
) -> (String, Vec<String>) {
    if calculation.is_none() && !has_offence_context {
        return (
            REPLY_NEEDS_OFFENCE.to_string(),
            vec![FOLLOW_UP_NEEDS_OFFENCE.to_string()],
        );
    }

    let mut lines = Vec::new();
    let mut follow_ups = Vec::new();

    match calculation {
        Some(calc) => {
            lines.push(summarise(calc));
            if !calc.warnings.is_empty() {
                lines.push(format!("Warnings: {}", calc.warnings.join(" ")));
            }
        }
        None => follow_ups.push(FOLLOW_UP_OFFER_CALCULATION.to_string()),
    }

    if let Some(top) = citations.first() {
        lines.push(citation_line(top));
    }

    let reply = if lines.is_empty() {
        "No matching guidance was found for that message.".to_string()
    } else {
        lines.join("\n")
    };
    (reply, follow_ups)
}

/// One-line summary of a calculation outcome.
fn summarise(calc: &CalculateSentenceResponse) -> String {
    let term = |t: Option<f64>| t.map(fmt_months).unwrap_or_else(|| "n/a".to_string());
    let fraction = calc
        .release_fraction
        .map(release::fraction_label)
        .unwrap_or("n/a");
    format!(
        "{} ({}): pre-plea term {} months, post-plea term {} months, release point {}, \
         estimated custody {} months, victim surcharge {} GBP.",
        calc.offence_name,
        calc.sentence_type.as_wire(),
        term(calc.pre_plea_term_months),
        term(calc.post_plea_term_months),
        fraction,
        term(calc.estimated_time_in_custody_months),
        calc.victim_surcharge_gbp,
    )
}

fn citation_line(chunk: &GuidelineChunk) -> String {
    match &chunk.url {
        Some(url) => format!("Top citation: {} <{}>", chunk.guideline_name, url),
        None => format!("Top citation: {}", chunk.guideline_name),
    }
}
