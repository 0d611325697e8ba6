//! HTTP-level validation behaviour: 422 detail arrays and 400 protocol
//! errors.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::{self, calc_body, COMMON_ASSAULT_ID};

#[tokio::test]
async fn empty_body_reports_every_missing_field() {
    let (app, _store) = common::test_app();
    let (status, body) = common::post_json(&app, "/calculate_sentence", &json!({})).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let detail = body["detail"].as_array().expect("detail array");
    let missing = detail
        .iter()
        .filter(|i| i["type"] == json!("missing"))
        .count();
    assert_eq!(missing, 8);
    // plus the cross-field offence identifier rule
    assert!(detail.iter().any(|i| i["type"] == json!("value_error")));
}

#[tokio::test]
async fn all_violations_come_back_in_one_response() {
    let (app, _store) = common::test_app();
    let mut body = calc_body(COMMON_ASSAULT_ID);
    body["age_at_offence"] = json!(7);
    body["plea_stage"] = json!("sometime");
    body["surprise"] = json!(1);
    let (status, resp) = common::post_json(&app, "/calculate_sentence", &body).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let detail = resp["detail"].as_array().unwrap();
    let types: Vec<&str> = detail.iter().map(|i| i["type"].as_str().unwrap()).collect();
    assert!(types.contains(&"int_range"));
    assert!(types.contains(&"literal_error"));
    assert!(types.contains(&"extra_forbidden"));
    assert_eq!(detail.len(), 3);
}

#[tokio::test]
async fn issues_carry_loc_and_input() {
    let (app, _store) = common::test_app();
    let mut body = calc_body(COMMON_ASSAULT_ID);
    body["sentence_type"] = json!("hard_labour");
    let (status, resp) = common::post_json(&app, "/calculate_sentence", &body).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let issue = &resp["detail"][0];
    assert_eq!(issue["loc"], json!(["body", "sentence_type"]));
    assert_eq!(issue["input"], json!("hard_labour"));
    assert!(issue["msg"].as_str().unwrap().contains("determinate_custodial_sentence"));
}

#[tokio::test]
async fn date_ordering_violation_is_a_value_error() {
    let (app, _store) = common::test_app();
    let mut body = calc_body(COMMON_ASSAULT_ID);
    body["sentence_date"] = json!("2023-01-01");
    let (status, resp) = common::post_json(&app, "/calculate_sentence", &body).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(resp["detail"][0]["type"], json!("value_error"));
    assert_eq!(resp["detail"][0]["loc"], json!(["body"]));
}

#[tokio::test]
async fn malformed_json_is_a_400_with_string_detail() {
    let (app, _store) = common::test_app();
    let (status, resp) = common::post_raw(&app, "/calculate_sentence", "{not json").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(resp["detail"].is_string());
}

#[tokio::test]
async fn search_validation() {
    let (app, _store) = common::test_app();

    let (status, resp) = common::post_json(&app, "/search_guidelines", &json!({})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(resp["detail"][0]["loc"], json!(["body", "query"]));

    let (status, resp) =
        common::post_json(&app, "/search_guidelines", &json!({"query": "x", "limit": 2})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(resp["detail"][0]["type"], json!("extra_forbidden"));
}

#[tokio::test]
async fn chat_validation_nests_calculation_errors() {
    let (app, _store) = common::test_app();
    let body = json!({
        "message": "how long?",
        "offence_id": COMMON_ASSAULT_ID,
        "calculation": {
            "plea_stage": "first_stage"
        }
    });
    let (status, resp) = common::post_json(&app, "/chat_turn", &body).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let detail = resp["detail"].as_array().unwrap();
    assert!(detail
        .iter()
        .all(|i| i["loc"][0] == json!("body") && i["loc"][1] == json!("calculation")));
    // the missing date/age/sentence-type fields are all reported
    assert!(detail.len() >= 6);
}

#[tokio::test]
async fn health_route_answers_ok() {
    let (app, _store) = common::test_app();
    let (status, body) = common::get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn openapi_document_is_served() {
    let (app, _store) = common::test_app();
    let (status, body) = common::get(&app, "/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/calculate_sentence"].is_object());
    assert!(body["paths"]["/chat_turn"].is_object());
}
