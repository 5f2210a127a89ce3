#![cfg(feature = "reqwest-transport")]

use std::sync::Arc;

use mockito::Matcher;
use unital::prelude::*;
use unital::{FileTokenStorage, RecordingFailureSink, TokenStorage, TurnId};

fn config_for(server: &mockito::ServerGuard, token_file: &std::path::Path) -> ClientConfig {
    ClientConfig::default()
        .with_api_base_url(format!("{}/api", server.url()))
        .with_token_file(token_file)
}

#[tokio::test(flavor = "multi_thread")]
async fn signed_in_token_survives_a_restart() {
    let mut server = mockito::Server::new_async().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let token_file = dir.path().join("storage.json");
    let config = config_for(&server, &token_file);

    let first = ClientRuntime::from_config(&config).expect("runtime should build");
    first.sign_in("tok-restart").expect("sign in");

    let stored = FileTokenStorage::new(&token_file)
        .get_item("token")
        .expect("storage readable");
    assert_eq!(stored.as_deref(), Some("tok-restart"));

    let mock = server
        .mock("GET", "/api/meetings")
        .match_header("authorization", "Bearer tok-restart")
        .with_status(200)
        .with_body(
            r#"[{"id":5,"title":"Annual meeting","scheduled_date":"2024-09-01T17:30:00Z","status":"scheduled"}]"#,
        )
        .create_async()
        .await;

    let second = ClientRuntime::from_config(&config).expect("runtime should rebuild");
    let rows = second.load_meetings().await;

    mock.assert_async().await;
    assert_eq!(rows.len(), 1);
    assert_eq!(
        rows[0].cells(),
        vec!["5", "Annual meeting", "2024-09-01", "17:30:00Z", "scheduled"]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn sign_out_removes_the_credential_from_calls_and_storage() {
    let mut server = mockito::Server::new_async().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let token_file = dir.path().join("storage.json");
    let runtime =
        ClientRuntime::from_config(&config_for(&server, &token_file)).expect("runtime");

    runtime.sign_in("tok-1").expect("sign in");
    assert!(runtime.sign_out().expect("sign out"));

    let mock = server
        .mock("GET", "/api/notifications")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_body(r#"[{"notification_type":"info","title":"Hi","message":"there"}]"#)
        .create_async()
        .await;

    let lines = runtime.load_notifications().await;

    mock.assert_async().await;
    assert_eq!(lines[0].as_str(), "[info] Hi - there");
    assert_eq!(
        FileTokenStorage::new(&token_file)
            .get_item("token")
            .expect("storage readable"),
        None
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn chat_driver_talks_to_the_configured_server() {
    let mut server = mockito::Server::new_async().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let mock = server
        .mock("POST", "/api/chat")
        .match_header("authorization", "Bearer tok-chat")
        .match_body(Matcher::Json(serde_json::json!({ "text": "book a room" })))
        .with_status(200)
        .with_body(r#"{"response_text":"Sure, for when?","intent":"book_room"}"#)
        .create_async()
        .await;

    let runtime = ClientRuntime::from_config(&config_for(&server, &dir.path().join("s.json")))
        .expect("runtime");
    runtime.sign_in("tok-chat").expect("sign in");

    let view = Arc::new(HeadlessViewPort::with_input("  book a room "));
    let driver = runtime.chat_driver(view.clone());
    let response = driver
        .handle_event(InputEvent::FormSubmit)
        .await
        .expect("event");

    mock.assert_async().await;
    assert!(response.prevent_default);
    assert_eq!(
        response.outcome,
        Some(SubmitOutcome::Replied {
            turn: TurnId::new(1),
            text: "Sure, for when?".to_string(),
        })
    );
    assert_eq!(view.entries().len(), 2);
    assert_eq!(driver.state(), DriverState::Idle);
}

#[tokio::test(flavor = "multi_thread")]
async fn server_errors_reach_the_failure_sink_once() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/chat")
        .with_status(500)
        .create_async()
        .await;

    let sink = Arc::new(RecordingFailureSink::new());
    let config = ClientConfig::default().with_api_base_url(format!("{}/api", server.url()));
    let runtime = ClientRuntime::builder(config)
        .failure_sink(sink.clone())
        .build()
        .expect("runtime");

    let driver = runtime.chat_driver(Arc::new(HeadlessViewPort::new()));
    let outcome = driver.submit("hello").await.expect("submit");

    assert!(matches!(outcome, SubmitOutcome::Failed { .. }));
    assert_eq!(driver.entries().len(), 1);
    let notices = sink.drain();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].endpoint, "/chat");
    assert_eq!(notices[0].error.status, Some(500));
}
