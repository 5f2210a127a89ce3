//! Chat session driver: optimistic submit, pending indicator, reply reconciliation.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use ucommon::{SessionId, non_empty_trimmed};
use ugateway::{ApiGateway, RequestDescriptor, ResponseOutcome};

use crate::{
    ChatError, ChatReply, ChatRequest, ChatTurn, ChatViewPort, DriverState, EventResponse,
    InputEvent, PendingIndicator, SubmitOutcome, Transcript, TranscriptEntry, TurnId, TurnReply,
};

pub const CHAT_ENDPOINT: &str = "/chat";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReentryPolicy {
    /// A submit while a turn is pending returns [`SubmitOutcome::Busy`].
    #[default]
    Reject,
    /// Every submit opens its own turn; replies resolve their turn by id.
    Overlap,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChatPolicy {
    pub reentry: ReentryPolicy,
}

impl ChatPolicy {
    pub fn overlapping() -> Self {
        Self {
            reentry: ReentryPolicy::Overlap,
        }
    }
}

#[derive(Debug, Default)]
struct DriverInner {
    transcript: Transcript,
    pending: Vec<TurnId>,
    last_turn: u64,
}

impl DriverInner {
    fn next_turn(&mut self) -> TurnId {
        self.last_turn += 1;
        TurnId::new(self.last_turn)
    }
}

pub struct ChatSessionDriver {
    session_id: SessionId,
    gateway: Arc<dyn ApiGateway>,
    view: Arc<dyn ChatViewPort>,
    policy: ChatPolicy,
    inner: Mutex<DriverInner>,
}

impl ChatSessionDriver {
    pub fn new(gateway: Arc<dyn ApiGateway>, view: Arc<dyn ChatViewPort>) -> Self {
        Self::builder(gateway, view).build()
    }

    pub fn builder(
        gateway: Arc<dyn ApiGateway>,
        view: Arc<dyn ChatViewPort>,
    ) -> ChatSessionDriverBuilder {
        ChatSessionDriverBuilder::new(gateway, view)
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn policy(&self) -> ChatPolicy {
        self.policy
    }

    pub fn state(&self) -> DriverState {
        if self.lock().pending.is_empty() {
            DriverState::Idle
        } else {
            DriverState::AwaitingReply
        }
    }

    pub fn transcript(&self) -> Transcript {
        self.lock().transcript.clone()
    }

    pub fn entries(&self) -> Vec<TranscriptEntry> {
        self.lock().transcript.entries().to_vec()
    }

    pub fn pending_count(&self) -> usize {
        self.lock().pending.len()
    }

    /// Dispatches a host input event. Submit and Enter read the current input value.
    pub async fn handle_event(&self, event: InputEvent) -> Result<EventResponse, ChatError> {
        if !event.prevents_default() {
            return Ok(EventResponse {
                prevent_default: false,
                outcome: None,
            });
        }

        let raw = self.view.input_value();
        let outcome = self.submit(&raw).await?;
        Ok(EventResponse {
            prevent_default: true,
            outcome: Some(outcome),
        })
    }

    /// Runs one chat turn. Gateway failures are returned as [`SubmitOutcome::Failed`];
    /// the error path is reserved for transcript inconsistencies.
    pub async fn submit(&self, raw_text: &str) -> Result<SubmitOutcome, ChatError> {
        let Some(text) = non_empty_trimmed(raw_text) else {
            return Ok(SubmitOutcome::Ignored);
        };

        let descriptor = RequestDescriptor::post(CHAT_ENDPOINT).with_json(&ChatRequest {
            text: text.to_string(),
        })?;

        let (turn, user_entry) = {
            let mut inner = self.lock();
            if self.policy.reentry == ReentryPolicy::Reject && !inner.pending.is_empty() {
                return Ok(SubmitOutcome::Busy);
            }

            let turn = inner.next_turn();
            let entry = inner.transcript.begin_turn(turn, text);
            inner.pending.push(turn);
            (turn, entry)
        };

        let indicator = PendingIndicator { turn };
        let in_flight = InFlightTurn::new(self, indicator);
        self.view.append_entry(&user_entry);
        self.view.clear_input();
        self.view.scroll_to_latest();
        self.view.show_pending(indicator);

        let outcome = self.gateway.call(descriptor).await;

        self.view.remove_pending(indicator);

        let (reply, result) = match outcome {
            ResponseOutcome::Success(payload) => {
                match ChatReply::from_payload(&payload).display_text() {
                    Some(text) => (
                        TurnReply::Answered(text.to_string()),
                        SubmitOutcome::Replied {
                            turn,
                            text: text.to_string(),
                        },
                    ),
                    None => (TurnReply::NoContent, SubmitOutcome::NoContent { turn }),
                }
            }
            ResponseOutcome::Failure(error) => {
                (TurnReply::Failed, SubmitOutcome::Failed { turn, error })
            }
        };

        let bot_entry = {
            let mut inner = self.lock();
            inner.pending.retain(|pending| *pending != turn);
            in_flight.disarm();
            inner.transcript.resolve(turn, reply)?
        };

        if let Some(entry) = &bot_entry {
            self.view.append_entry(entry);
        }
        if !matches!(result, SubmitOutcome::Failed { .. }) {
            self.view.scroll_to_latest();
        }

        Ok(result)
    }

    fn lock(&self) -> MutexGuard<'_, DriverInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Releases a turn whose `submit` future is dropped before the reply is reconciled.
///
/// The indicator is removed, the turn leaves the pending set and a still-pending
/// transcript turn is resolved as [`TurnReply::Failed`].
struct InFlightTurn<'a> {
    driver: &'a ChatSessionDriver,
    indicator: PendingIndicator,
    armed: bool,
}

impl<'a> InFlightTurn<'a> {
    fn new(driver: &'a ChatSessionDriver, indicator: PendingIndicator) -> Self {
        Self {
            driver,
            indicator,
            armed: true,
        }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlightTurn<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        let turn = self.indicator.turn;
        self.driver.view.remove_pending(self.indicator);

        let mut inner = self.driver.lock();
        inner.pending.retain(|pending| *pending != turn);
        if inner.transcript.turn(turn).is_some_and(ChatTurn::is_pending) {
            let _ = inner.transcript.resolve(turn, TurnReply::Failed);
        }
    }
}

impl std::fmt::Debug for ChatSessionDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSessionDriver")
            .field("session_id", &self.session_id)
            .field("policy", &self.policy)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

pub struct ChatSessionDriverBuilder {
    session_id: SessionId,
    gateway: Arc<dyn ApiGateway>,
    view: Arc<dyn ChatViewPort>,
    policy: ChatPolicy,
}

impl ChatSessionDriverBuilder {
    pub fn new(gateway: Arc<dyn ApiGateway>, view: Arc<dyn ChatViewPort>) -> Self {
        Self {
            session_id: SessionId::new("chat"),
            gateway,
            view,
            policy: ChatPolicy::default(),
        }
    }

    pub fn session_id(mut self, session_id: impl Into<SessionId>) -> Self {
        self.session_id = session_id.into();
        self
    }

    pub fn policy(mut self, policy: ChatPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn build(self) -> ChatSessionDriver {
        ChatSessionDriver {
            session_id: self.session_id,
            gateway: self.gateway,
            view: self.view,
            policy: self.policy,
            inner: Mutex::new(DriverInner::default()),
        }
    }
}
