//! Transcript, turn, wire, and input event types.

use std::fmt::{Display, Formatter};

use serde::Serialize;
use serde_json::Value;
use ugateway::GatewayError;

use crate::ChatError;

pub const PENDING_LABEL: &str = "Bot is typing...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TurnId(u64);

impl TurnId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl Display for TurnId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "turn-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Author {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub turn: TurnId,
    pub author: Author,
    pub text: String,
}

impl TranscriptEntry {
    pub fn user(turn: TurnId, text: impl Into<String>) -> Self {
        Self {
            turn,
            author: Author::User,
            text: text.into(),
        }
    }

    pub fn bot(turn: TurnId, text: impl Into<String>) -> Self {
        Self {
            turn,
            author: Author::Bot,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnReply {
    Pending,
    Answered(String),
    /// The server answered without any displayable text.
    NoContent,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub id: TurnId,
    pub user_text: String,
    pub reply: TurnReply,
}

impl ChatTurn {
    pub fn is_pending(&self) -> bool {
        self.reply == TurnReply::Pending
    }
}

/// Transient marker shown while a turn awaits its reply. Never part of the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingIndicator {
    pub turn: TurnId,
}

impl PendingIndicator {
    pub fn label(&self) -> &'static str {
        PENDING_LABEL
    }
}

/// Append-only record of a chat session.
///
/// `entries` is in display order; `turns` tracks each submission's reply state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    turns: Vec<ChatTurn>,
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn turn(&self, id: TurnId) -> Option<&ChatTurn> {
        self.turns.iter().find(|turn| turn.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn begin_turn(&mut self, id: TurnId, user_text: &str) -> TranscriptEntry {
        self.turns.push(ChatTurn {
            id,
            user_text: user_text.to_string(),
            reply: TurnReply::Pending,
        });

        let entry = TranscriptEntry::user(id, user_text);
        self.entries.push(entry.clone());
        entry
    }

    /// Moves a pending turn to its final reply; returns the bot entry to render, if any.
    pub(crate) fn resolve(
        &mut self,
        id: TurnId,
        reply: TurnReply,
    ) -> Result<Option<TranscriptEntry>, ChatError> {
        let turn = self
            .turns
            .iter_mut()
            .find(|turn| turn.id == id)
            .ok_or_else(|| ChatError::state(format!("unknown {id}")))?;

        if !turn.is_pending() {
            return Err(ChatError::state(format!("{id} was already resolved")));
        }

        let entry = match &reply {
            TurnReply::Answered(text) => Some(TranscriptEntry::bot(id, text.clone())),
            _ => None,
        };
        turn.reply = reply;

        if let Some(entry) = &entry {
            self.entries.push(entry.clone());
        }

        Ok(entry)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub text: String,
}

/// Reply body of `POST /chat`. Every field is optional.
///
/// Built only through [`ChatReply::from_payload`], so a field of the wrong type
/// reads as absent instead of failing the whole reply.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChatReply {
    pub response_text: Option<String>,
    pub intent: Option<String>,
    pub sentiment: Option<String>,
    pub entities: Option<Value>,
}

impl ChatReply {
    /// Reads known fields leniently; fields of an unexpected type are treated as absent.
    pub fn from_payload(payload: &Value) -> Self {
        let text = |field: &str| payload.get(field).and_then(Value::as_str).map(str::to_string);

        Self {
            response_text: text("response_text"),
            intent: text("intent"),
            sentiment: text("sentiment"),
            entities: payload.get("entities").cloned(),
        }
    }

    /// `response_text`, falling back to `intent`. Empty strings count as missing.
    pub fn display_text(&self) -> Option<&str> {
        self.response_text
            .as_deref()
            .filter(|text| !text.is_empty())
            .or_else(|| self.intent.as_deref().filter(|text| !text.is_empty()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    AwaitingReply,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Blank input; nothing changed.
    Ignored,
    /// A turn is still pending and the policy rejects overlap.
    Busy,
    Replied { turn: TurnId, text: String },
    NoContent { turn: TurnId },
    Failed { turn: TurnId, error: GatewayError },
}

impl SubmitOutcome {
    pub fn turn(&self) -> Option<TurnId> {
        match self {
            Self::Replied { turn, .. } | Self::NoContent { turn } | Self::Failed { turn, .. } => {
                Some(*turn)
            }
            Self::Ignored | Self::Busy => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    FormSubmit,
    KeyDown { key: String },
}

impl InputEvent {
    pub fn key(key: impl Into<String>) -> Self {
        Self::KeyDown { key: key.into() }
    }

    /// Whether the host must suppress the default action (page reload, newline).
    pub fn prevents_default(&self) -> bool {
        match self {
            Self::FormSubmit => true,
            Self::KeyDown { key } => key == "Enter",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventResponse {
    pub prevent_default: bool,
    pub outcome: Option<SubmitOutcome>,
}
