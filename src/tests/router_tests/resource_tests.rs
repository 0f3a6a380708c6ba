use http::Method;
use serde_json::{json, Value};

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

fn add(app: &TestApp, id: &str, body: Value) -> (u16, Value) {
    app.call(
        Method::POST,
        &format!("/api/resources/disasters/{id}/resources"),
        None,
        Some(body),
    )
}

#[test]
fn invalid_coordinates_are_rejected_and_nothing_persists() {
    let app = TestApp::new("rt_res_invalid");
    let id = disaster(&app);

    let (status, body) = add(&app, &id, json!({"name": "Shelter", "type": "shelter", "lat": 91, "lng": 10}));
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Invalid coordinates provided");

    let (status, _) = add(&app, &id, json!({"name": "Shelter", "type": "shelter", "lat": "north", "lng": 10}));
    assert_eq!(status, 400);

    let (_, list) = app.get(&format!("/resources/disasters/{id}/resources"));
    assert_eq!(list["count"], 0);
}

#[test]
fn create_list_nearby_and_delete() {
    let app = TestApp::new("rt_res_flow");
    let id = disaster(&app);

    let (status, body) = add(&app, &id, json!({"name": "Shelter A", "type": "shelter", "lat": 35.69, "lng": 139.70}));
    assert_eq!(status, 201);
    assert_eq!(body["message"], "Resource \"Shelter A\" mapped successfully");
    let shelter_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = add(&app, &id, json!({"name": "Clinic", "type": "medical", "location_name": "Tokyo"}));
    assert_eq!(status, 201);
    assert_eq!(body["data"]["type"], "medical");
    assert_eq!(body["data"]["location"]["lat"], 35.68);

    let (_, all) = app.get(&format!("/resources/disasters/{id}/resources"));
    assert_eq!(all["count"], 2);

    let (_, medical) = app.get(&format!("/resources/disasters/{id}/resources?type=medical"));
    assert_eq!(medical["count"], 1);

    let (_, nearby) = app.get(&format!(
        "/resources/disasters/{id}/resources?lat=35.69&lng=139.70&radius=500"
    ));
    assert_eq!(nearby["count"], 1);
    assert_eq!(nearby["data"][0]["name"], "Shelter A");
    assert_eq!(nearby["data"][0]["distance_km"], 0.0);

    let (status, _) = app.call(
        Method::DELETE,
        &format!("/resources/disasters/{id}/resources/{shelter_id}"),
        None,
        None,
    );
    assert_eq!(status, 200);

    let (status, body) = app.call(
        Method::DELETE,
        &format!("/resources/disasters/{id}/resources/{shelter_id}"),
        None,
        None,
    );
    assert_eq!(status, 404);
    assert_eq!(body["error"], "Resource not found");
}

#[test]
fn missing_fields_and_unknown_disaster() {
    let app = TestApp::new("rt_res_validation");
    let id = disaster(&app);

    let (status, body) = add(&app, &id, json!({"name": "Shelter"}));
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Name and type are required");

    let (status, _) = add(&app, "missing", json!({"name": "Shelter", "type": "food", "lat": 1, "lng": 1}));
    assert_eq!(status, 404);
}
