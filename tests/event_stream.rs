//! Ingress → event log → live stream, over real sockets.

use std::time::Duration;

use inspector_sdk::InspectorClient;
use serde_json::{json, Value};

mod common;

const STEP: Duration = Duration::from_secs(5);

#[tokio::test]
async fn test_subscriber_receives_posted_webhook() {
    let inspector = common::start_inspector().await;
    let client = reqwest::Client::builder().no_proxy().build().unwrap();

    let mut stream = client.get(inspector.api("/events")).send().await.unwrap();
    assert_eq!(stream.status(), 200);
    assert!(stream.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/event-stream"));

    let res = client
        .post(inspector.api("/webhook/receive"))
        .header("content-type", "application/json")
        .header("user-agent", "integration-test/1.0")
        .header("x-secret", "do-not-keep")
        .body(r#"{"foo":1}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.json::<Value>().await.unwrap(), json!({"ok": true, "id": 1}));

    // Skip keep-alive comments until the first data frame arrives.
    let mut raw = String::new();
    while !raw.contains("data:") || !raw.ends_with("\n\n") {
        let chunk = tokio::time::timeout(STEP, stream.chunk())
            .await
            .expect("event frame in time")
            .unwrap()
            .expect("stream still open");
        raw.push_str(&String::from_utf8_lossy(&chunk));
    }

    let frame = raw
        .split("\n\n")
        .find(|f| f.starts_with("data: "))
        .expect("a data frame");
    let event: Value = serde_json::from_str(frame.trim_start_matches("data: ")).unwrap();
    assert_eq!(event["id"], 1);
    assert_eq!(event["body"], json!({"foo": 1}));
    assert_eq!(
        event["headers"],
        json!({"content-type": "application/json", "user-agent": "integration-test/1.0"})
    );
    assert!(event["receivedAt"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn test_late_subscriber_gets_backlog_then_live() {
    let inspector = common::start_inspector().await;
    let sdk = InspectorClient::new(&inspector.url());

    for i in 0..3 {
        assert_eq!(sdk.send_webhook(&json!({ "n": i })).await.unwrap(), i + 1);
    }

    let mut events = sdk.events().await.unwrap();
    let live_id = sdk.send_webhook(&json!({ "n": "live" })).await.unwrap();
    assert_eq!(live_id, 4);

    let mut ids = Vec::new();
    while ids.len() < 4 {
        let event = tokio::time::timeout(STEP, events.next_event())
            .await
            .expect("event in time")
            .unwrap()
            .expect("stream open");
        ids.push(event.id);
    }
    assert_eq!(ids, vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn test_every_subscriber_sees_every_event_in_order() {
    let inspector = common::start_inspector().await;
    let sdk = InspectorClient::new(&inspector.url());

    let mut a = sdk.events().await.unwrap();
    let mut b = sdk.events().await.unwrap();

    let mut sent = Vec::new();
    for i in 0..10 {
        sent.push(sdk.send_webhook(&json!(i)).await.unwrap());
    }
    assert_eq!(sent, (1..=10).collect::<Vec<u64>>());

    for stream in [&mut a, &mut b] {
        let mut seen = Vec::new();
        while seen.len() < 10 {
            let event = tokio::time::timeout(STEP, stream.next_event())
                .await
                .expect("event in time")
                .unwrap()
                .expect("stream open");
            seen.push(event.id);
        }
        assert_eq!(seen, sent);
    }
}

#[tokio::test]
async fn test_non_json_body_is_still_recorded() {
    let inspector = common::start_inspector().await;
    let client = reqwest::Client::builder().no_proxy().build().unwrap();

    let res = client
        .post(inspector.api("/webhook/receive"))
        .header("content-type", "application/x-www-form-urlencoded")
        .body("a=1&b=2")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let sdk = InspectorClient::new(&inspector.url());
    let mut events = sdk.events().await.unwrap();
    let event = tokio::time::timeout(STEP, events.next_event())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert_eq!(event.body, json!("a=1&b=2"));
    assert_eq!(event.headers["content-type"], "application/x-www-form-urlencoded");
}

#[tokio::test]
async fn test_shutdown_closes_open_streams() {
    let inspector = common::start_inspector().await;
    let sdk = InspectorClient::new(&inspector.url());
    let mut events = sdk.events().await.unwrap();

    inspector.shutdown.trigger();

    let next = tokio::time::timeout(STEP, events.next_event())
        .await
        .expect("stream should end promptly on shutdown");
    assert!(!matches!(next, Ok(Some(_))));
}

#[tokio::test]
async fn test_health_reports_counts() {
    let inspector = common::start_inspector().await;
    let sdk = InspectorClient::new(&inspector.url());
    sdk.send_webhook(&json!({})).await.unwrap();
    let _events = sdk.events().await.unwrap();

    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    let health: Value = client
        .get(inspector.api("/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["ok"], true);
    assert_eq!(health["events"], 1);
    assert_eq!(health["subscribers"], 1);
}
