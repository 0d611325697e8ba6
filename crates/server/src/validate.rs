//! Request validation.
//!
//! Bodies are walked field-by-field over the raw JSON so that every
//! violation is collected and returned in a single 422 `detail` array,
//! rather than short-circuiting on the first failure. Unknown fields are
//! rejected.

use chrono::NaiveDate;
use serde_json::{Map, Value};

use shared_types::{
    CalculationInput, PleaStage, SentenceType, ValidationIssue, PLEA_STAGES, SENTENCE_TYPES,
};

const CALCULATION_FIELDS: &[&str] = &[
    "offence_id",
    "offence_query",
    "offence_date",
    "conviction_date",
    "sentence_date",
    "age_at_offence",
    "age_at_conviction",
    "age_at_sentence",
    "plea_stage",
    "sentence_type",
    "culpability",
    "harm",
    "pre_plea_term_months",
    "extension_months",
    "fine_amount",
    "dangerousness_assessed",
    "prior_listed_offence_with_custody",
    "prior_relevant_weapon_conviction",
    "terrorism_connection",
    "minimum_sentence_unjust_or_exceptional",
    "replicate_ace_release_bug",
    "prior_domestic_burglary_count",
    "prior_class_a_trafficking_count",
];

const SEARCH_FIELDS: &[&str] = &["query", "offence_id", "top_k"];

const CHAT_FIELDS: &[&str] = &["message", "offence_id", "offence_query", "calculation", "top_k"];

pub const MIN_AGE: i64 = 10;
pub const MAX_AGE: i64 = 120;

/// Validated `/search_guidelines` input.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchInput {
    pub query: String,
    pub offence_id: Option<String>,
    pub top_k: Option<i64>,
}

/// Validated `/chat_turn` input. The calculation sub-request stays raw
/// here; the chat orchestrator merges inherited offence context into it
/// before running it through `parse_calculation_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatInput {
    pub message: String,
    pub offence_id: Option<String>,
    pub offence_query: Option<String>,
    pub calculation: Option<Map<String, Value>>,
    pub top_k: Option<i64>,
}

// ── Field reader ────────────────────────────────────────────────────

struct FieldReader<'a> {
    obj: &'a Map<String, Value>,
    prefix: &'a [&'a str],
    issues: Vec<ValidationIssue>,
}

impl<'a> FieldReader<'a> {
    fn new(obj: &'a Map<String, Value>, prefix: &'a [&'a str]) -> Self {
        Self {
            obj,
            prefix,
            issues: Vec::new(),
        }
    }

    fn push(&mut self, field: &str, msg: &str, kind: &str, input: Option<&Value>) {
        let mut loc: Vec<&str> = self.prefix.to_vec();
        loc.push(field);
        let mut issue = ValidationIssue::new(&loc, msg, kind);
        if let Some(v) = input {
            issue = issue.with_input(v.clone());
        }
        self.issues.push(issue);
    }

    /// Cross-field issue anchored at the object itself.
    fn push_cross(&mut self, msg: &str) {
        self.issues
            .push(ValidationIssue::new(self.prefix, msg, "value_error"));
    }

    fn reject_unknown(&mut self, allowed: &[&str]) {
        for (key, value) in self.obj {
            if !allowed.contains(&key.as_str()) {
                self.push(key, "Extra inputs are not permitted", "extra_forbidden", Some(value));
            }
        }
    }

    fn opt_string(&mut self, field: &str) -> Option<String> {
        match self.obj.get(field) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(v) => {
                self.push(field, "Input should be a valid string", "string_type", Some(v));
                None
            }
        }
    }

    fn req_string(&mut self, field: &str) -> Option<String> {
        match self.obj.get(field) {
            None | Some(Value::Null) => {
                self.push(field, "Field required", "missing", None);
                None
            }
            Some(Value::String(s)) if s.trim().is_empty() => {
                self.push(
                    field,
                    "String should have at least 1 character",
                    "string_too_short",
                    Some(&Value::String(s.clone())),
                );
                None
            }
            Some(Value::String(s)) => Some(s.clone()),
            Some(v) => {
                self.push(field, "Input should be a valid string", "string_type", Some(v));
                None
            }
        }
    }

    fn req_date(&mut self, field: &str) -> Option<NaiveDate> {
        match self.obj.get(field) {
            None | Some(Value::Null) => {
                self.push(field, "Field required", "missing", None);
                None
            }
            Some(v @ Value::String(s)) => match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                Ok(d) => Some(d),
                Err(_) => {
                    self.push(
                        field,
                        "Input should be a valid ISO-8601 date (YYYY-MM-DD)",
                        "date_type",
                        Some(v),
                    );
                    None
                }
            },
            Some(v) => {
                self.push(
                    field,
                    "Input should be a valid ISO-8601 date (YYYY-MM-DD)",
                    "date_type",
                    Some(v),
                );
                None
            }
        }
    }

    fn int_value(&mut self, field: &str, v: &Value) -> Option<i64> {
        match v.as_i64() {
            Some(i) => Some(i),
            None => {
                self.push(field, "Input should be a valid integer", "int_type", Some(v));
                None
            }
        }
    }

    fn req_age(&mut self, field: &str) -> Option<i64> {
        match self.obj.get(field) {
            None | Some(Value::Null) => {
                self.push(field, "Field required", "missing", None);
                None
            }
            Some(v) => {
                let age = self.int_value(field, v)?;
                if !(MIN_AGE..=MAX_AGE).contains(&age) {
                    self.push(
                        field,
                        &format!("Input should be between {} and {}", MIN_AGE, MAX_AGE),
                        "int_range",
                        Some(v),
                    );
                    return None;
                }
                Some(age)
            }
        }
    }

    /// Non-negative integer count, defaulting to 0.
    fn opt_count(&mut self, field: &str) -> u32 {
        match self.obj.get(field) {
            None | Some(Value::Null) => 0,
            Some(v) => match self.int_value(field, v) {
                Some(i) if i >= 0 => i as u32,
                Some(_) => {
                    self.push(
                        field,
                        "Input should be greater than or equal to 0",
                        "int_range",
                        Some(v),
                    );
                    0
                }
                None => 0,
            },
        }
    }

    fn opt_int(&mut self, field: &str) -> Option<i64> {
        match self.obj.get(field) {
            None | Some(Value::Null) => None,
            Some(v) => self.int_value(field, v),
        }
    }

    /// Optional non-negative number (integers accepted).
    fn opt_nonneg_number(&mut self, field: &str) -> Option<f64> {
        match self.obj.get(field) {
            None | Some(Value::Null) => None,
            Some(v) => match v.as_f64() {
                Some(n) if n >= 0.0 => Some(n),
                Some(_) => {
                    self.push(
                        field,
                        "Input should be greater than or equal to 0",
                        "float_range",
                        Some(v),
                    );
                    None
                }
                None => {
                    self.push(field, "Input should be a valid number", "float_type", Some(v));
                    None
                }
            },
        }
    }

    fn opt_bool(&mut self, field: &str, default: bool) -> bool {
        match self.obj.get(field) {
            None | Some(Value::Null) => default,
            Some(Value::Bool(b)) => *b,
            Some(v) => {
                self.push(field, "Input should be a valid boolean", "bool_type", Some(v));
                default
            }
        }
    }

    fn req_literal<T>(
        &mut self,
        field: &str,
        allowed: &[&str],
        parse: impl Fn(&str) -> Option<T>,
    ) -> Option<T> {
        match self.obj.get(field) {
            None | Some(Value::Null) => {
                self.push(field, "Field required", "missing", None);
                None
            }
            Some(v @ Value::String(s)) => match parse(s) {
                Some(parsed) => Some(parsed),
                None => {
                    self.push(
                        field,
                        &format!("Input should be one of: {}", allowed.join(", ")),
                        "literal_error",
                        Some(v),
                    );
                    None
                }
            },
            Some(v) => {
                self.push(
                    field,
                    &format!("Input should be one of: {}", allowed.join(", ")),
                    "literal_error",
                    Some(v),
                );
                None
            }
        }
    }
}

fn as_object<'a>(body: &'a Value, prefix: &[&str]) -> Result<&'a Map<String, Value>, Vec<ValidationIssue>> {
    body.as_object().ok_or_else(|| {
        vec![ValidationIssue::new(prefix, "Input should be an object", "dict_type")
            .with_input(body.clone())]
    })
}

// ── Calculation ─────────────────────────────────────────────────────

/// Validate a `/calculate_sentence` body rooted at `["body"]`.
pub fn parse_calculation(body: &Value) -> Result<CalculationInput, Vec<ValidationIssue>> {
    parse_calculation_at(body, &["body"])
}

/// Validate a calculation request at an arbitrary location (used for the
/// nested sub-request of `/chat_turn`).
pub fn parse_calculation_at(
    body: &Value,
    prefix: &[&str],
) -> Result<CalculationInput, Vec<ValidationIssue>> {
    let obj = as_object(body, prefix)?;
    let mut r = FieldReader::new(obj, prefix);
    r.reject_unknown(CALCULATION_FIELDS);

    let offence_id = r.opt_string("offence_id").filter(|s| !s.trim().is_empty());
    let offence_query = r.opt_string("offence_query").filter(|s| !s.trim().is_empty());

    let offence_date = r.req_date("offence_date");
    let conviction_date = r.req_date("conviction_date");
    let sentence_date = r.req_date("sentence_date");

    let age_at_offence = r.req_age("age_at_offence");
    let age_at_conviction = r.req_age("age_at_conviction");
    let age_at_sentence = r.req_age("age_at_sentence");

    let plea_stage = r.req_literal("plea_stage", PLEA_STAGES, PleaStage::from_wire);
    let sentence_type = r.req_literal("sentence_type", SENTENCE_TYPES, SentenceType::from_wire);

    let culpability = r.opt_string("culpability");
    let harm = r.opt_string("harm");
    let pre_plea_term_months = r.opt_nonneg_number("pre_plea_term_months");
    let extension_months = r.opt_nonneg_number("extension_months").unwrap_or(0.0);
    let fine_amount = r.opt_nonneg_number("fine_amount");

    let dangerousness_assessed = r.opt_bool("dangerousness_assessed", false);
    let prior_listed_offence_with_custody = r.opt_bool("prior_listed_offence_with_custody", false);
    let prior_relevant_weapon_conviction = r.opt_bool("prior_relevant_weapon_conviction", false);
    let terrorism_connection = r.opt_bool("terrorism_connection", false);
    let minimum_sentence_unjust_or_exceptional =
        r.opt_bool("minimum_sentence_unjust_or_exceptional", false);
    let replicate_ace_release_bug = r.opt_bool("replicate_ace_release_bug", true);

    let prior_domestic_burglary_count = r.opt_count("prior_domestic_burglary_count");
    let prior_class_a_trafficking_count = r.opt_count("prior_class_a_trafficking_count");

    // Cross-field constraints, checked only where the fields parsed.
    if offence_id.is_none() && offence_query.is_none() {
        r.push_cross("At least one of offence_id or offence_query must be provided");
    }
    if let (Some(od), Some(cd), Some(sd)) = (offence_date, conviction_date, sentence_date) {
        if !(od <= cd && cd <= sd) {
            r.push_cross("Dates must satisfy offence_date <= conviction_date <= sentence_date");
        }
    }
    if let (Some(ao), Some(ac), Some(a_s)) = (age_at_offence, age_at_conviction, age_at_sentence) {
        if !(ao <= ac && ac <= a_s) {
            r.push_cross(
                "Ages must be non-decreasing across offence, conviction, and sentence dates",
            );
        }
    }

    // Every None among the required fields has already pushed an issue.
    match (
        (offence_date, conviction_date, sentence_date),
        (age_at_offence, age_at_conviction, age_at_sentence),
        (plea_stage, sentence_type),
        r.issues.is_empty(),
    ) {
        (
            (Some(offence_date), Some(conviction_date), Some(sentence_date)),
            (Some(age_at_offence), Some(age_at_conviction), Some(age_at_sentence)),
            (Some(plea_stage), Some(sentence_type)),
            true,
        ) => Ok(CalculationInput {
            offence_id,
            offence_query,
            offence_date,
            conviction_date,
            sentence_date,
            age_at_offence: age_at_offence as u32,
            age_at_conviction: age_at_conviction as u32,
            age_at_sentence: age_at_sentence as u32,
            plea_stage,
            sentence_type,
            culpability,
            harm,
            pre_plea_term_months,
            extension_months,
            fine_amount,
            dangerousness_assessed,
            prior_listed_offence_with_custody,
            prior_relevant_weapon_conviction,
            terrorism_connection,
            minimum_sentence_unjust_or_exceptional,
            replicate_ace_release_bug,
            prior_domestic_burglary_count,
            prior_class_a_trafficking_count,
        }),
        _ => Err(r.issues),
    }
}

// ── Search ──────────────────────────────────────────────────────────

pub fn parse_search(body: &Value) -> Result<SearchInput, Vec<ValidationIssue>> {
    let prefix = &["body"];
    let obj = as_object(body, prefix)?;
    let mut r = FieldReader::new(obj, prefix);
    r.reject_unknown(SEARCH_FIELDS);

    let query = r.req_string("query");
    let offence_id = r.opt_string("offence_id").filter(|s| !s.trim().is_empty());
    let top_k = r.opt_int("top_k");

    match (query, r.issues.is_empty()) {
        (Some(query), true) => Ok(SearchInput {
            query,
            offence_id,
            top_k,
        }),
        _ => Err(r.issues),
    }
}

// ── Chat ────────────────────────────────────────────────────────────

pub fn parse_chat(body: &Value) -> Result<ChatInput, Vec<ValidationIssue>> {
    let prefix = &["body"];
    let obj = as_object(body, prefix)?;
    let mut r = FieldReader::new(obj, prefix);
    r.reject_unknown(CHAT_FIELDS);

    let message = r.req_string("message");
    let offence_id = r.opt_string("offence_id").filter(|s| !s.trim().is_empty());
    let offence_query = r.opt_string("offence_query").filter(|s| !s.trim().is_empty());
    let top_k = r.opt_int("top_k");

    let calculation = match obj.get("calculation") {
        None | Some(Value::Null) => None,
        Some(Value::Object(map)) => Some(map.clone()),
        Some(v) => {
            r.push("calculation", "Input should be an object", "dict_type", Some(v));
            None
        }
    };

    match (message, r.issues.is_empty()) {
        (Some(message), true) => Ok(ChatInput {
            message,
            offence_id,
            offence_query,
            calculation,
            top_k,
        }),
        _ => Err(r.issues),
    }
}
