use http::Method;
use serde_json::json;

use crate::tests::mocks::FakePages;
use crate::tests::utils::TestApp;

const RED_CROSS_PAGE: &str = r#"
    <div class="news-item">
      <h3 class="news-title"><a href="/news/quake">Earthquake relief under way</a></h3>
      <span class="news-date">June 22, 2024</span>
      <p class="news-summary">Teams deployed after the quake.</p>
    </div>
"#;

fn disaster(app: &TestApp, title: &str, description: &str) -> String {
    let (_, body) = app.call(
        Method::POST,
        "/disasters",
        None,
        Some(json!({"title": title, "description": description})),
    );
    body["data"]["id"].as_str().unwrap().to_string()
}

#[test]
fn sources_down_serves_mock_and_caches() {
    let app = TestApp::new("rt_updates_mock");
    let id = disaster(&app, "Power cut", "Outage near Tokyo");
    let uri = format!("/api/disasters/{id}/official-updates");

    let (status, body) = app.get(&uri);
    assert_eq!(status, 200);
    assert_eq!(body["cached"], false);
    assert_eq!(body["cache_key"], format!("official_updates_{id}_10_all"));
    assert_eq!(body["data"]["degraded"], true);
    assert_eq!(body["data"]["total_updates"], 5);
    assert_eq!(body["data"]["disaster"]["id"], id.as_str());
    assert_eq!(body["data"]["sources"], json!(["FEMA", "Red Cross", "NOAA"]));

    let fetches = app.page_calls.get();
    let (_, again) = app.get(&uri);
    assert_eq!(again["cached"], true);
    assert_eq!(again["data"]["total_updates"], 5);
    assert_eq!(app.page_calls.get(), fetches);
}

#[test]
fn type_is_inferred_from_the_disaster() {
    let app = TestApp::builder("rt_updates_infer")
        .pages(FakePages::failing().with(
            "https://www.redcross.org/about-us/news-and-events/news.html",
            RED_CROSS_PAGE,
        ))
        .build();
    let id = disaster(&app, "Earthquake in Tokyo", "Buildings damaged near Tokyo");

    let (_, body) = app.get(&format!("/disasters/{id}/official-updates"));
    assert_eq!(body["data"]["degraded"], false);
    let updates = body["data"]["official_updates"].as_array().unwrap();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0]["title"], "Earthquake relief under way");
    assert_eq!(updates[0]["link"], "https://www.redcross.org/news/quake");
}

#[test]
fn explicit_type_and_limit_shape_the_key() {
    let app = TestApp::new("rt_updates_type");
    let id = disaster(&app, "X", "Flood near Tokyo");

    let (_, body) = app.get(&format!("/disasters/{id}/official-updates?limit=2&disasterType=hurricane"));
    assert_eq!(body["cache_key"], format!("official_updates_{id}_2_hurricane"));
    let updates = body["data"]["official_updates"].as_array().unwrap();
    assert_eq!(updates.len(), 1);
    assert!(updates[0]["title"].as_str().unwrap().contains("Hurricane"));
}

#[test]
fn unknown_disaster_is_404() {
    let app = TestApp::new("rt_updates_404");
    assert_eq!(app.get("/disasters/missing/official-updates").0, 404);
}

#[test]
fn oversized_limit_is_clamped() {
    let app = TestApp::new("rt_updates_huge_limit");
    let id = disaster(&app, "Quake", "Earthquake near Tokyo");

    let (status, body) = app.get(&format!(
        "/disasters/{id}/official-updates?limit=18446744073709551615"
    ));
    assert_eq!(status, 200);
    assert_eq!(body["cache_key"], format!("official_updates_{id}_100_all"));
}
