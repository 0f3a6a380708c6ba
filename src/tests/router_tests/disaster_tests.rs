use http::Method;
use serde_json::json;

use crate::tests::utils::TestApp;

#[test]
fn create_derives_location_end_to_end() {
    let app = TestApp::new("rt_create");

    let (status, body) = app.call(
        Method::POST,
        "/api/disasters",
        None,
        Some(json!({"title": "X", "description": "Flood near Tokyo"})),
    );

    assert_eq!(status, 201);
    assert_eq!(body["success"], true);
    let data = &body["data"];
    assert_eq!(data["location_name"], "Tokyo");
    assert_eq!(data["location"]["lat"], 35.68);
    assert_eq!(data["location"]["lng"], 139.69);
    assert_eq!(data["owner_id"], "netrunnerX");

    let trail = data["audit_trail"].as_array().unwrap();
    assert_eq!(trail.len(), 1);
    assert_eq!(trail[0]["action"], "create");
}

#[test]
fn create_without_description_is_400() {
    let app = TestApp::new("rt_create_400");
    let (status, body) = app.call(Method::POST, "/disasters", None, Some(json!({"title": "X"})));
    assert_eq!(status, 400);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Title and description are required");
}

#[test]
fn malformed_json_is_400() {
    let app = TestApp::new("rt_bad_json");
    let req = http::Request::builder()
        .method(Method::POST)
        .uri("/disasters")
        .body(astra::Body::from("{not json"))
        .unwrap();
    let resp = crate::router::handle(req, &app.state);
    assert_eq!(resp.status(), 400);
}

#[test]
fn get_unknown_is_404() {
    let app = TestApp::new("rt_get_404");
    let (status, body) = app.get("/api/disasters/does-not-exist");
    assert_eq!(status, 404);
    assert_eq!(body["error"], "Disaster not found");
}

#[test]
fn list_filters_by_tag_and_radius() {
    let app = TestApp::new("rt_list");
    app.call(
        Method::POST,
        "/disasters",
        None,
        Some(json!({"title": "Tokyo flood", "description": "Flood near Tokyo", "tags": ["flood"]})),
    );
    app.call(
        Method::POST,
        "/disasters",
        None,
        Some(json!({"title": "Quake", "description": "Shaking", "location_name": "Nowhere", "tags": ["earthquake"]})),
    );

    let (_, all) = app.get("/disasters");
    assert_eq!(all["count"], 2);

    let (_, tagged) = app.get("/disasters?tag=flood");
    assert_eq!(tagged["count"], 1);
    assert_eq!(tagged["data"][0]["title"], "Tokyo flood");

    let (_, near) = app.get("/disasters?lat=35.69&lng=139.70&radius=5000");
    assert_eq!(near["count"], 1);

    let (_, far) = app.get("/disasters?lat=0&lng=0");
    assert_eq!(far["count"], 0);

    let (status, _) = app.get("/disasters?lat=35.69");
    assert_eq!(status, 400);
}

#[test]
fn title_update_audits_only_the_title() {
    let app = TestApp::new("rt_update");
    let (_, created) = app.call(
        Method::POST,
        "/disasters",
        Some("citizen1"),
        Some(json!({"title": "Old", "description": "Flood near Tokyo"})),
    );
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = app.call(
        Method::PUT,
        &format!("/api/disasters/{id}"),
        Some("citizen1"),
        Some(json!({"title": "New"})),
    );
    assert_eq!(status, 200);

    let trail = body["data"]["audit_trail"].as_array().unwrap();
    assert_eq!(trail.len(), 2);
    assert_eq!(trail[1]["action"], "update");
    assert_eq!(trail[1]["user_id"], "citizen1");
    assert_eq!(trail[1]["changes"], json!({"title": {"old": "Old", "new": "New"}}));
}

#[test]
fn non_owner_update_is_403_and_leaves_record_unchanged() {
    let app = TestApp::new("rt_update_403");
    let (_, created) = app.call(
        Method::POST,
        "/disasters",
        Some("reliefAdmin"),
        Some(json!({"title": "Original", "description": "Flood near Tokyo"})),
    );
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = app.call(
        Method::PUT,
        &format!("/disasters/{id}"),
        Some("citizen1"),
        Some(json!({"title": "Hijacked"})),
    );
    assert_eq!(status, 403);
    assert_eq!(body["success"], false);

    let (_, after) = app.get(&format!("/disasters/{id}"));
    assert_eq!(after["data"]["title"], "Original");
    assert_eq!(after["data"]["audit_trail"].as_array().unwrap().len(), 1);
}

#[test]
fn delete_removes_and_cascades() {
    let app = TestApp::new("rt_delete");
    let (_, created) = app.call(
        Method::POST,
        "/disasters",
        None,
        Some(json!({"title": "X", "description": "Flood near Tokyo"})),
    );
    let id = created["data"]["id"].as_str().unwrap().to_string();
    app.call(
        Method::POST,
        &format!("/reports/disasters/{id}/reports"),
        None,
        Some(json!({"content": "Water rising"})),
    );

    let (status, body) = app.call(Method::DELETE, &format!("/disasters/{id}"), None, None);
    assert_eq!(status, 200);
    assert_eq!(body["message"], "Disaster deleted successfully");

    assert_eq!(app.get(&format!("/disasters/{id}")).0, 404);
    let (_, reports) = app.get(&format!("/reports/disasters/{id}/reports"));
    assert_eq!(reports["count"], 0);

    let (status, _) = app.call(Method::DELETE, &format!("/disasters/{id}"), None, None);
    assert_eq!(status, 404);
}

#[test]
fn unknown_route_and_preflight() {
    let app = TestApp::new("rt_misc");
    assert_eq!(app.get("/api/nothing-here").0, 404);

    let (status, body) = app.call(Method::OPTIONS, "/api/disasters", None, None);
    assert_eq!(status, 204);
    assert!(body.is_null());
}
