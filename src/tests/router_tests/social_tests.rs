use crate::tests::utils::TestApp;

#[test]
fn feed_is_filtered_and_cached() {
    let app = TestApp::new("rt_social");

    let (status, body) = app.get("/api/social-media/disasters/d1/social-media?keywords=water&priority=high");
    assert_eq!(status, 200);
    assert_eq!(body["cached"], false);
    let posts = body["data"].as_array().unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["id"], "1");
    assert!(posts[0]["engagement"].as_u64().unwrap() >= 10);

    let (_, again) = app.get("/social-media/disasters/d1/social-media?keywords=water&priority=high");
    assert_eq!(again["cached"], true);
    assert_eq!(again["data"][0]["engagement"], posts[0]["engagement"]);
}

#[test]
fn mock_endpoint_supports_urgent_only() {
    let app = TestApp::new("rt_social_mock");
    let (_, body) = app.get("/social-media/mock-social-media?urgent_only=true");
    assert_eq!(body["source"], "mock_api");
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (_, body) = app.get("/social-media/mock-social-media?keywords=trapped%20in");
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[test]
fn bad_limit_is_400() {
    let app = TestApp::new("rt_social_limit");
    assert_eq!(app.get("/social-media/disasters/d1/social-media?limit=lots").0, 400);
}
