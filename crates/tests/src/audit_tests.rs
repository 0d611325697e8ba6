//! Best-effort audit semantics: recorded on success, swallowed on failure.

use std::time::Duration;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::{self, calc_body, FakeEmbedder, FakeStore, COMMON_ASSAULT_ID};

/// The audit write is fire-and-forget; give the spawned task a moment.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}

#[tokio::test]
async fn audit_records_request_and_result() {
    let (app, store) = common::test_app();
    let body = calc_body(COMMON_ASSAULT_ID);
    let (status, resp) = common::post_json(&app, "/calculate_sentence", &body).await;
    assert_eq!(status, StatusCode::OK);

    settle().await;
    let audits = store.audits.lock().unwrap();
    assert_eq!(audits.len(), 1);
    let (offence_id, request, result) = &audits[0];
    assert_eq!(offence_id, COMMON_ASSAULT_ID);
    assert_eq!(request, &body);
    assert_eq!(result["post_plea_term_months"], resp["post_plea_term_months"]);
}

#[tokio::test]
async fn audit_failure_does_not_affect_the_response() {
    let mut store = FakeStore::seeded();
    store.fail_audit = true;
    let (app, _store) = common::test_app_with(
        store,
        FakeEmbedder {
            configured: true,
            fail: false,
        },
        common::test_settings(),
    );

    let (status, resp) =
        common::post_json(&app, "/calculate_sentence", &calc_body(COMMON_ASSAULT_ID)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["post_plea_term_months"], json!(8.0));
}

#[tokio::test]
async fn failed_calculations_write_no_audit() {
    let (app, store) = common::test_app();
    let (status, _resp) = common::post_json(&app, "/calculate_sentence", &json!({})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    settle().await;
    assert!(store.audits.lock().unwrap().is_empty());
}
