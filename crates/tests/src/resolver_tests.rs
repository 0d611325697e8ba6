//! Offence resolution through the HTTP surface: by id, fuzzily by name,
//! and the associated error statuses.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::{self, calc_body, COMMON_ASSAULT_ID, MISSING_ID};

#[tokio::test]
async fn unknown_offence_id_is_404() {
    let (app, _store) = common::test_app();
    let (status, body) = common::post_json(&app, "/calculate_sentence", &calc_body(MISSING_ID)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["detail"],
        json!(format!("Offence {} not found", MISSING_ID))
    );
}

#[tokio::test]
async fn malformed_offence_id_is_422_from_the_store() {
    let (app, _store) = common::test_app();
    let (status, body) =
        common::post_json(&app, "/calculate_sentence", &calc_body("not-a-uuid")).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .contains("invalid input syntax for type uuid"));
}

#[tokio::test]
async fn fuzzy_query_resolves_and_traces() {
    let (app, _store) = common::test_app();
    let mut body = calc_body(COMMON_ASSAULT_ID);
    body.as_object_mut().unwrap().remove("offence_id");
    body["offence_query"] = json!("common assault");
    let (status, resp) = common::post_json(&app, "/calculate_sentence", &body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["offence_id"], json!(COMMON_ASSAULT_ID));
    let trace = resp["trace"].as_array().unwrap();
    assert_eq!(
        trace[0],
        json!(format!(
            "Resolved offence query 'common assault' to 'Common assault' ({}).",
            COMMON_ASSAULT_ID
        ))
    );
}

#[tokio::test]
async fn ambiguous_query_adds_disambiguation_notice() {
    let (app, _store) = common::test_app();
    let mut body = calc_body(COMMON_ASSAULT_ID);
    body.as_object_mut().unwrap().remove("offence_id");
    // "law" appears in several fixture provisions
    body["offence_query"] = json!("common law");
    let (status, resp) = common::post_json(&app, "/calculate_sentence", &body).await;

    assert_eq!(status, StatusCode::OK);
    let trace = resp["trace"].as_array().unwrap();
    assert!(trace[1]
        .as_str()
        .unwrap()
        .contains("candidate offences matched"));
}

#[tokio::test]
async fn unmatched_query_is_404() {
    let (app, _store) = common::test_app();
    let mut body = calc_body(COMMON_ASSAULT_ID);
    body.as_object_mut().unwrap().remove("offence_id");
    body["offence_query"] = json!("flying a kite at night");
    let (status, resp) = common::post_json(&app, "/calculate_sentence", &body).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        resp["detail"],
        json!("No offence matched query 'flying a kite at night'")
    );
}

#[tokio::test]
async fn offence_id_wins_over_query_when_both_given() {
    let (app, _store) = common::test_app();
    let mut body = calc_body(COMMON_ASSAULT_ID);
    body["offence_query"] = json!("manslaughter");
    let (status, resp) = common::post_json(&app, "/calculate_sentence", &body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["offence_name"], json!("Common assault"));
    // no fuzzy-resolution trace on the id path
    assert!(resp["trace"]
        .as_array()
        .unwrap()
        .iter()
        .all(|t| !t.as_str().unwrap().starts_with("Resolved offence query")));
}
