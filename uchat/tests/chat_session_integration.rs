use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::json;
use tokio::sync::Semaphore;
use uchat::prelude::*;
use uchat::{RenderedNode, TurnId};
use ugateway::{
    ApiGateway, BoxFuture, GatewayError, GatewayErrorKind, HttpRequest, HttpResponse,
    HttpTransport, RecordingFailureSink, RequestDescriptor, RequestGateway, ResponseOutcome,
};

#[derive(Debug)]
struct ScriptedTransport {
    view: Arc<HeadlessViewPort>,
    responses: Mutex<VecDeque<Result<HttpResponse, GatewayError>>>,
    seen_at_send: Mutex<Vec<Vec<RenderedNode>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    fn new(view: Arc<HeadlessViewPort>, responses: Vec<Result<HttpResponse, GatewayError>>) -> Self {
        Self {
            view,
            responses: Mutex::new(responses.into()),
            seen_at_send: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn request_count(&self) -> usize {
        self.requests.lock().expect("requests lock").len()
    }
}

impl HttpTransport for ScriptedTransport {
    fn send<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, GatewayError>> {
        Box::pin(async move {
            self.seen_at_send
                .lock()
                .expect("snapshot lock")
                .push(self.view.nodes());
            self.requests.lock().expect("requests lock").push(request);
            self.responses
                .lock()
                .expect("responses lock")
                .pop_front()
                .unwrap_or_else(|| Ok(HttpResponse::new(200, "{}")))
        })
    }
}

struct Fixture {
    driver: ChatSessionDriver,
    view: Arc<HeadlessViewPort>,
    transport: Arc<ScriptedTransport>,
    sink: Arc<RecordingFailureSink>,
}

fn fixture(input: &str, responses: Vec<Result<HttpResponse, GatewayError>>) -> Fixture {
    let view = Arc::new(HeadlessViewPort::with_input(input));
    let transport = Arc::new(ScriptedTransport::new(view.clone(), responses));
    let sink = Arc::new(RecordingFailureSink::new());
    let gateway = RequestGateway::builder("http://localhost:8000/api", transport.clone())
        .failure_sink(sink.clone())
        .build();
    let driver = ChatSessionDriver::new(Arc::new(gateway), view.clone());

    Fixture {
        driver,
        view,
        transport,
        sink,
    }
}

#[tokio::test]
async fn book_a_room_round_trip() {
    let fx = fixture(
        "book a room",
        vec![Ok(HttpResponse::new(
            200,
            r#"{"response_text":"Sure, for when?","intent":"book_room"}"#,
        ))],
    );

    let response = fx
        .driver
        .handle_event(InputEvent::key("Enter"))
        .await
        .expect("event");

    assert!(response.prevent_default);
    assert_eq!(
        response.outcome,
        Some(SubmitOutcome::Replied {
            turn: TurnId::new(1),
            text: "Sure, for when?".to_string(),
        })
    );

    let rendered = fx
        .view
        .entries()
        .into_iter()
        .map(|entry| (entry.author, entry.text))
        .collect::<Vec<_>>();
    assert_eq!(
        rendered,
        vec![
            (Author::User, "book a room".to_string()),
            (Author::Bot, "Sure, for when?".to_string()),
        ]
    );
    assert_eq!(fx.view.entries(), fx.driver.entries());
    assert!(fx.view.pending_turns().is_empty());
    assert_eq!(fx.driver.state(), DriverState::Idle);
    assert!(fx.sink.is_empty());
}

#[tokio::test]
async fn user_turn_and_indicator_render_before_the_network_call() {
    let fx = fixture(
        "  what's on today?  ",
        vec![Ok(HttpResponse::new(200, r#"{"intent":"list_meetings"}"#))],
    );

    fx.driver
        .handle_event(InputEvent::FormSubmit)
        .await
        .expect("event");

    let snapshots = fx.transport.seen_at_send.lock().expect("snapshot lock").clone();
    assert_eq!(
        snapshots,
        vec![vec![
            RenderedNode::Entry(TranscriptEntry::user(TurnId::new(1), "what's on today?")),
            RenderedNode::Pending {
                turn: TurnId::new(1),
                label: "Bot is typing...".to_string(),
            },
        ]]
    );

    let request = fx.transport.requests.lock().expect("requests lock")[0].clone();
    assert_eq!(request.url, "http://localhost:8000/api/chat");
    let body: serde_json::Value =
        serde_json::from_slice(request.body.as_deref().expect("body")).expect("json body");
    assert_eq!(body, json!({ "text": "what's on today?" }));

    assert_eq!(fx.view.input(), "");
    assert_eq!(fx.view.scroll_count(), 2);
}

#[tokio::test]
async fn failure_removes_indicator_reports_once_and_returns_to_idle() {
    let fx = fixture(
        "hello",
        vec![
            Ok(HttpResponse::new(500, r#"{"detail":"boom"}"#)),
            Ok(HttpResponse::new(200, r#"{"response_text":"Hi there"}"#)),
        ],
    );

    let first = fx.driver.submit("hello").await.expect("submit");
    match first {
        SubmitOutcome::Failed { turn, error } => {
            assert_eq!(turn, TurnId::new(1));
            assert_eq!(error.kind, GatewayErrorKind::NonSuccessStatus);
        }
        other => panic!("expected failure, got {other:?}"),
    }

    assert!(fx.view.pending_turns().is_empty());
    assert_eq!(fx.driver.state(), DriverState::Idle);
    assert_eq!(fx.sink.len(), 1);
    assert_eq!(fx.sink.notices()[0].user_message(), "Error fetching data from API");

    let second = fx.driver.submit("hello again").await.expect("submit");
    assert!(matches!(second, SubmitOutcome::Replied { .. }));

    let texts = fx
        .driver
        .entries()
        .into_iter()
        .map(|entry| entry.text)
        .collect::<Vec<_>>();
    assert_eq!(texts, vec!["hello", "hello again", "Hi there"]);
    assert_eq!(fx.sink.len(), 1);
}

#[tokio::test]
async fn blank_submissions_never_reach_the_network() {
    let fx = fixture("   ", Vec::new());

    let response = fx
        .driver
        .handle_event(InputEvent::FormSubmit)
        .await
        .expect("event");

    assert!(response.prevent_default);
    assert_eq!(response.outcome, Some(SubmitOutcome::Ignored));
    assert_eq!(fx.transport.request_count(), 0);
    assert!(fx.driver.transcript().is_empty());
    assert!(fx.view.nodes().is_empty());
    assert_eq!(fx.view.input(), "   ");
}

#[tokio::test]
async fn intent_is_shown_when_response_text_is_missing() {
    let fx = fixture(
        "",
        vec![Ok(HttpResponse::new(
            200,
            r#"{"intent":"report_issue","sentiment":"negative"}"#,
        ))],
    );

    let outcome = fx.driver.submit("the printer is broken").await.expect("submit");

    assert_eq!(
        outcome,
        SubmitOutcome::Replied {
            turn: TurnId::new(1),
            text: "report_issue".to_string(),
        }
    );
}

#[tokio::test]
async fn undecodable_reply_is_a_reported_failure() {
    let fx = fixture("", vec![Ok(HttpResponse::new(200, "not json"))]);

    let outcome = fx.driver.submit("hi").await.expect("submit");

    assert!(matches!(
        outcome,
        SubmitOutcome::Failed { ref error, .. } if error.kind == GatewayErrorKind::DecodeFailure
    ));
    assert_eq!(fx.driver.entries().len(), 1);
    assert_eq!(fx.sink.len(), 1);
}

/// Holds every call until the test releases it.
struct GatedGateway {
    started: Semaphore,
    release: Semaphore,
}

impl GatedGateway {
    fn new() -> Self {
        Self {
            started: Semaphore::new(0),
            release: Semaphore::new(0),
        }
    }
}

impl ApiGateway for GatedGateway {
    fn call<'a>(&'a self, descriptor: RequestDescriptor) -> BoxFuture<'a, ResponseOutcome> {
        Box::pin(async move {
            let text = descriptor
                .body()
                .and_then(|body| body["text"].as_str())
                .unwrap_or_default()
                .to_string();
            self.started.add_permits(1);
            self.release
                .acquire()
                .await
                .expect("release semaphore open")
                .forget();
            ResponseOutcome::Success(json!({ "response_text": format!("re: {text}") }))
        })
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn submit_while_awaiting_reply_is_rejected_by_default() {
    let gateway = Arc::new(GatedGateway::new());
    let view = Arc::new(HeadlessViewPort::new());
    let driver = Arc::new(ChatSessionDriver::new(gateway.clone(), view.clone()));

    let first = tokio::spawn({
        let driver = driver.clone();
        async move { driver.submit("first").await }
    });

    gateway
        .started
        .acquire()
        .await
        .expect("started semaphore open")
        .forget();
    assert_eq!(driver.state(), DriverState::AwaitingReply);

    let second = driver.submit("second").await.expect("submit");
    assert_eq!(second, SubmitOutcome::Busy);
    assert_eq!(driver.transcript().turns().len(), 1);
    assert_eq!(view.pending_turns(), vec![TurnId::new(1)]);

    gateway.release.add_permits(1);
    let first = first.await.expect("task joins").expect("submit");

    assert_eq!(
        first,
        SubmitOutcome::Replied {
            turn: TurnId::new(1),
            text: "re: first".to_string(),
        }
    );
    assert_eq!(driver.state(), DriverState::Idle);
    assert_eq!(driver.entries().len(), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn overlapping_turns_each_resolve_their_own_reply() {
    let gateway = Arc::new(GatedGateway::new());
    let view = Arc::new(HeadlessViewPort::new());
    let driver = Arc::new(
        ChatSessionDriver::builder(gateway.clone(), view.clone())
            .policy(ChatPolicy::overlapping())
            .build(),
    );

    let first = tokio::spawn({
        let driver = driver.clone();
        async move { driver.submit("first").await }
    });
    gateway
        .started
        .acquire()
        .await
        .expect("started semaphore open")
        .forget();

    let second = tokio::spawn({
        let driver = driver.clone();
        async move { driver.submit("second").await }
    });
    gateway
        .started
        .acquire()
        .await
        .expect("started semaphore open")
        .forget();

    assert_eq!(driver.pending_count(), 2);
    assert_eq!(view.pending_turns(), vec![TurnId::new(1), TurnId::new(2)]);

    gateway.release.add_permits(2);
    let first = first.await.expect("task joins").expect("submit");
    let second = second.await.expect("task joins").expect("submit");

    assert_eq!(first.turn(), Some(TurnId::new(1)));
    assert_eq!(second.turn(), Some(TurnId::new(2)));

    let transcript = driver.transcript();
    for turn in transcript.turns() {
        let expected = format!("re: {}", turn.user_text);
        assert_eq!(turn.reply, uchat::TurnReply::Answered(expected));
    }
    assert_eq!(transcript.entries().len(), 4);
    assert!(view.pending_turns().is_empty());
    assert_eq!(driver.state(), DriverState::Idle);
}

/// Never answers the first call; later calls reply immediately.
#[derive(Default)]
struct StalledFirstCall {
    calls: AtomicUsize,
}

impl ApiGateway for StalledFirstCall {
    fn call<'a>(&'a self, _descriptor: RequestDescriptor) -> BoxFuture<'a, ResponseOutcome> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            return Box::pin(std::future::pending::<ResponseOutcome>());
        }
        Box::pin(async { ResponseOutcome::Success(json!({ "response_text": "back again" })) })
    }
}

#[tokio::test]
async fn dropped_submit_releases_its_turn() {
    let view = Arc::new(HeadlessViewPort::new());
    let driver = ChatSessionDriver::new(Arc::new(StalledFirstCall::default()), view.clone());

    tokio::select! {
        biased;
        _ = driver.submit("hello") => panic!("the first call never completes"),
        _ = async {} => {}
    }

    assert_eq!(driver.state(), DriverState::Idle);
    assert!(view.pending_turns().is_empty());
    assert_eq!(
        driver.transcript().turn(TurnId::new(1)).map(|turn| turn.reply.clone()),
        Some(uchat::TurnReply::Failed)
    );
    assert_eq!(driver.entries(), vec![TranscriptEntry::user(TurnId::new(1), "hello")]);

    let next = driver.submit("again").await.expect("submit");
    assert_eq!(
        next,
        SubmitOutcome::Replied {
            turn: TurnId::new(2),
            text: "back again".to_string(),
        }
    );
    assert_eq!(driver.state(), DriverState::Idle);
    assert_eq!(driver.entries().len(), 3);
}
