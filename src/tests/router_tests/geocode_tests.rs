use http::Method;
use serde_json::json;

use crate::tests::mocks::FakeModel;
use crate::tests::utils::TestApp;

#[test]
fn description_is_extracted_then_geocoded() {
    let app = TestApp::new("rt_geocode");
    let (status, body) = app.call(
        Method::POST,
        "/api/geocode",
        None,
        Some(json!({"description": "Flood near Tokyo"})),
    );
    assert_eq!(status, 200);
    assert_eq!(body["data"]["location_name"], "Tokyo");
    assert_eq!(body["data"]["coordinates"], json!({"lat": 35.68, "lng": 139.69}));
    assert_eq!(body["data"]["formatted_address"], "Tokyo, Earth");
    assert!(body["data"]["geocoded_at"].is_string());
}

#[test]
fn repeat_lookup_hits_the_cache() {
    let app = TestApp::new("rt_geocode_cache");
    for _ in 0..2 {
        app.call(Method::POST, "/geocode", None, Some(json!({"location_name": "Tokyo"})));
    }
    assert_eq!(app.geocoder_calls.get(), 1);
}

#[test]
fn unresolvable_name_has_null_coordinates() {
    let app = TestApp::new("rt_geocode_miss");
    let (_, body) = app.call(Method::POST, "/geocode", None, Some(json!({"location_name": "Atlantis"})));
    assert_eq!(body["data"]["location_name"], "Atlantis");
    assert!(body["data"]["coordinates"].is_null());
}

#[test]
fn nothing_extracted_reports_a_message() {
    let app = TestApp::builder("rt_geocode_none")
        .model(FakeModel::answering("UNKNOWN"))
        .build();
    let (status, body) = app.call(Method::POST, "/geocode", None, Some(json!({"description": "It is raining"})));
    assert_eq!(status, 200);
    assert!(body["data"]["location_name"].is_null());
    assert_eq!(body["data"]["message"], "No location found in description");
    assert_eq!(app.geocoder_calls.get(), 0);
}

#[test]
fn empty_body_is_400() {
    let app = TestApp::new("rt_geocode_400");
    let (status, _) = app.call(Method::POST, "/geocode", None, None);
    assert_eq!(status, 400);
}
