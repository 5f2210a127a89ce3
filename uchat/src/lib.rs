//! Chat session driver over the request gateway.
//!
//! A submit appends the user's turn before the network round trip, shows a
//! pending indicator while `POST /chat` is in flight, and reconciles the reply
//! into the transcript. The host renders through a [`ChatViewPort`].
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use serde_json::json;
//! use uchat::{ChatSessionDriver, HeadlessViewPort, InputEvent, SubmitOutcome};
//! use ugateway::{ApiGateway, BoxFuture, RequestDescriptor, ResponseOutcome};
//!
//! struct Echo;
//!
//! impl ApiGateway for Echo {
//!     fn call<'a>(&'a self, descriptor: RequestDescriptor) -> BoxFuture<'a, ResponseOutcome> {
//!         let text = descriptor.body().and_then(|body| body["text"].as_str()).unwrap_or_default();
//!         let reply = json!({ "response_text": format!("you said {text}") });
//!         Box::pin(async move { ResponseOutcome::Success(reply) })
//!     }
//! }
//!
//! # #[tokio::main]
//! # async fn main() {
//! let view = Arc::new(HeadlessViewPort::with_input(" hello "));
//! let driver = ChatSessionDriver::new(Arc::new(Echo), view.clone());
//!
//! let response = driver.handle_event(InputEvent::key("Enter")).await.unwrap();
//! assert!(matches!(
//!     response.outcome,
//!     Some(SubmitOutcome::Replied { ref text, .. }) if text == "you said hello"
//! ));
//! assert_eq!(view.input(), "");
//! # }
//! ```

mod driver;
mod error;
mod types;
mod view;

pub mod prelude {
    pub use crate::{
        Author, ChatError, ChatErrorKind, ChatPolicy, ChatSessionDriver, ChatViewPort,
        DriverState, HeadlessViewPort, InputEvent, ReentryPolicy, SubmitOutcome, TranscriptEntry,
    };
}

pub use driver::{
    CHAT_ENDPOINT, ChatPolicy, ChatSessionDriver, ChatSessionDriverBuilder, ReentryPolicy,
};
pub use error::{ChatError, ChatErrorKind};
pub use types::{
    Author, ChatReply, ChatRequest, ChatTurn, DriverState, EventResponse, InputEvent,
    PENDING_LABEL, PendingIndicator, SubmitOutcome, Transcript, TranscriptEntry, TurnId,
    TurnReply,
};
pub use view::{ChatViewPort, HeadlessViewPort, RenderedNode};
