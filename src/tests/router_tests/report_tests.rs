use http::Method;
use serde_json::json;

use crate::tests::mocks::{FakeImages, FakeModel};
use crate::tests::utils::TestApp;

fn disaster(app: &TestApp) -> String {
    let (_, body) = app.call(
        Method::POST,
        "/disasters",
        None,
        Some(json!({"title": "X", "description": "Flood near Tokyo"})),
    );
    body["data"]["id"].as_str().unwrap().to_string()
}

fn report(app: &TestApp, disaster_id: &str) -> String {
    let (status, body) = app.call(
        Method::POST,
        &format!("/reports/disasters/{disaster_id}/reports"),
        Some("citizen1"),
        Some(json!({"content": "Need water", "image_url": "https://example.com/a.jpg"})),
    );
    assert_eq!(status, 201);
    body["data"]["id"].as_str().unwrap().to_string()
}

#[test]
fn report_defaults_to_caller_and_pending() {
    let app = TestApp::new("rt_report_create");
    let id = disaster(&app);
    report(&app, &id);

    let (_, list) = app.get(&format!("/api/reports/disasters/{id}/reports"));
    assert_eq!(list["count"], 1);
    assert_eq!(list["data"][0]["user_id"], "citizen1");
    assert_eq!(list["data"][0]["verification_status"], "pending");

    let (status, _) = app.call(
        Method::POST,
        &format!("/reports/disasters/{id}/reports"),
        None,
        Some(json!({"user_id": "citizen1"})),
    );
    assert_eq!(status, 400);
}

#[test]
fn status_change_is_admin_only() {
    let app = TestApp::new("rt_report_status");
    let id = disaster(&app);
    let report_id = report(&app, &id);
    let uri = format!("/reports/{report_id}");

    let (status, _) = app.call(Method::PUT, &uri, Some("citizen1"), Some(json!({"verification_status": "verified"})));
    assert_eq!(status, 403);

    let (status, _) = app.call(Method::PUT, &uri, Some("reliefAdmin"), Some(json!({})));
    assert_eq!(status, 400);

    let (status, _) = app.call(Method::PUT, &uri, Some("reliefAdmin"), Some(json!({"verification_status": "maybe"})));
    assert_eq!(status, 400);

    let (status, body) = app.call(Method::PUT, &uri, Some("reliefAdmin"), Some(json!({"verification_status": "verified"})));
    assert_eq!(status, 200);
    assert_eq!(body["data"]["verification_status"], "verified");

    let (status, _) = app.call(Method::PUT, "/reports/nope", Some("reliefAdmin"), Some(json!({"verification_status": "verified"})));
    assert_eq!(status, 404);
}

#[test]
fn verification_writes_verdict_to_report() {
    let app = TestApp::builder("rt_verify")
        .model(FakeModel::answering("Confidence: 40. Possibly edited."))
        .build();
    let id = disaster(&app);
    let report_id = report(&app, &id);

    let (status, body) = app.call(
        Method::POST,
        &format!("/api/verification/disasters/{id}/verify-image"),
        None,
        Some(json!({"image_url": "https://example.com/a.jpg", "report_id": report_id})),
    );
    assert_eq!(status, 200);
    assert_eq!(body["data"]["verification_status"], "suspicious");
    assert_eq!(body["data"]["confidence_score"], 40);
    assert_eq!(body["report_updated"], true);

    let (_, list) = app.get(&format!("/reports/disasters/{id}/reports"));
    assert_eq!(list["data"][0]["verification_status"], "suspicious");
}

#[test]
fn failed_verification_leaves_report_alone() {
    let app = TestApp::builder("rt_verify_fail")
        .images(FakeImages::failing())
        .build();
    let id = disaster(&app);
    let report_id = report(&app, &id);

    let (status, body) = app.call(
        Method::POST,
        &format!("/verification/disasters/{id}/verify-image"),
        None,
        Some(json!({"image_url": "https://example.com/gone.jpg", "report_id": report_id})),
    );
    assert_eq!(status, 200);
    assert_eq!(body["data"]["verification_status"], "error");
    assert_eq!(body["degraded"], true);
    assert_eq!(body["report_updated"], false);

    let (_, list) = app.get(&format!("/reports/disasters/{id}/reports"));
    assert_eq!(list["data"][0]["verification_status"], "pending");
}

#[test]
fn verification_input_checks() {
    let app = TestApp::new("rt_verify_input");
    let id = disaster(&app);

    let (status, _) = app.call(
        Method::POST,
        &format!("/verification/disasters/{id}/verify-image"),
        None,
        Some(json!({})),
    );
    assert_eq!(status, 400);

    let (status, _) = app.call(
        Method::POST,
        "/verification/disasters/missing/verify-image",
        None,
        Some(json!({"image_url": "https://example.com/a.jpg"})),
    );
    assert_eq!(status, 404);
    assert_eq!(app.image_calls.get(), 0);
}
