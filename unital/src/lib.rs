//! Unified facade over the unital client crates.
//!
//! This crate is the single dependency for most hosts. It re-exports the
//! gateway, chat, view, and observability crates and wires them together from
//! a [`ClientConfig`].
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use unital::{ClientConfig, ClientRuntime, HeadlessViewPort, InputEvent};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! unital::telemetry::init_tracing(unital::telemetry::DEFAULT_LOG_FILTER);
//!
//! let config = ClientConfig::load(None)?;
//! let runtime = ClientRuntime::from_config(&config)?;
//! runtime.sign_in("token-from-login")?;
//!
//! let view = Arc::new(HeadlessViewPort::with_input("book a room"));
//! let chat = runtime.chat_driver(view);
//! chat.handle_event(InputEvent::key("Enter")).await?;
//!
//! for row in runtime.load_meetings().await {
//!     println!("{} {} {}", row.title, row.date, row.time);
//! }
//! # Ok(())
//! # }
//! ```

mod config;
mod runtime;

pub mod prelude;
pub mod telemetry;

pub use uchat;
pub use ucommon;
pub use ugateway;
pub use uobserve;
pub use uviews;

pub use config::{
    ClientConfig, ConfigError, ConfigErrorKind, DEFAULT_API_BASE_URL, ENV_PREFIX,
    PROJECT_CONFIG_FILE,
};
pub use runtime::{ClientRuntime, ClientRuntimeBuilder};

pub use uchat::{
    Author, ChatError, ChatErrorKind, ChatPolicy, ChatReply, ChatRequest, ChatSessionDriver,
    ChatViewPort, DriverState, EventResponse, HeadlessViewPort, InputEvent, PendingIndicator,
    ReentryPolicy, RenderedNode, SubmitOutcome, Transcript, TranscriptEntry, TurnId, TurnReply,
};
pub use ucommon::{BoxFuture, CallId, SessionId};
pub use ugateway::{
    ApiGateway, CredentialError, CredentialErrorKind, FailureNotice, FailureSink,
    FileTokenStorage, GatewayError, GatewayErrorKind, GatewayHooks, HttpTransport,
    InMemoryTokenStorage, Method, RecordingFailureSink, RequestDescriptor, RequestGateway,
    ResponseOutcome, SessionContext, SilentFailureSink, TokenStorage,
};
#[cfg(feature = "reqwest-transport")]
pub use ugateway::ReqwestTransport;
pub use uobserve::{
    MetricsGatewayHooks, SafeFailureSink, SafeGatewayHooks, TracingFailureSink,
    TracingGatewayHooks,
};
pub use uviews::{
    ListView, Meeting, MeetingRow, Notification, NotificationLine, RecordId, TableRow, Task,
    TaskRow, Team, TeamRow,
};
