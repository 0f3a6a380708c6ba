use http::Method;
use serde_json::json;
use std::io::Read;

use crate::notify::DEFAULT_MAX_SUBSCRIBERS;
use crate::tests::utils::TestApp;

#[test]
fn create_over_http_reaches_subscribers() {
    let app = TestApp::new("rt_events");
    let mut sub = app.state.notifier.subscribe().unwrap();

    app.call(
        Method::POST,
        "/disasters",
        None,
        Some(json!({"title": "X", "description": "Flood near Tokyo"})),
    );

    let frame = sub.next().unwrap().unwrap();
    assert!(frame.starts_with("event: disaster_updated\n"));
    assert!(frame.contains("\"location_name\":\"Tokyo\""));
}

fn open_stream(app: &TestApp) -> astra::Response {
    let req = http::Request::builder()
        .method(Method::GET)
        .uri("/api/events")
        .body(astra::Body::empty())
        .unwrap();
    crate::router::handle(req, &app.state)
}

#[test]
fn events_endpoint_streams_frames() {
    let app = TestApp::new("rt_events_sse");
    let resp = open_stream(&app);
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["Content-Type"], "text/event-stream");
    assert_eq!(app.state.notifier.subscriber_count(), 1);

    let mut body = resp.into_body();
    let mut reader = body.reader();
    let mut hello = [0u8; 13];
    reader.read_exact(&mut hello).unwrap();
    assert_eq!(&hello, b": connected\n\n");

    app.call(
        Method::POST,
        "/disasters",
        None,
        Some(json!({"title": "X", "description": "Flood near Tokyo"})),
    );
    let prefix = b"event: disaster_updated\n";
    let mut frame = vec![0u8; prefix.len()];
    reader.read_exact(&mut frame).unwrap();
    assert_eq!(frame, prefix);
}

#[test]
fn stream_clients_are_capped() {
    let app = TestApp::new("rt_events_cap");
    let open: Vec<_> = (0..DEFAULT_MAX_SUBSCRIBERS).map(|_| open_stream(&app)).collect();
    assert!(open.iter().all(|r| r.status() == 200));

    let (status, body) = app.get("/events");
    assert_eq!(status, 429);
    assert_eq!(body["success"], false);

    drop(open);
    assert_eq!(open_stream(&app).status(), 200);
}
