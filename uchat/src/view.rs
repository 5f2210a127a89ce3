//! Rendering surface the driver writes to.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::{PendingIndicator, TranscriptEntry, TurnId};

/// Host-provided view of one chat panel.
///
/// Implementations use interior mutability; the driver only ever holds `&self`.
pub trait ChatViewPort: Send + Sync {
    fn input_value(&self) -> String;

    fn clear_input(&self);

    fn append_entry(&self, entry: &TranscriptEntry);

    fn show_pending(&self, indicator: PendingIndicator);

    fn remove_pending(&self, indicator: PendingIndicator);

    fn scroll_to_latest(&self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedNode {
    Entry(TranscriptEntry),
    Pending { turn: TurnId, label: String },
}

#[derive(Debug, Default)]
struct HeadlessState {
    input: String,
    nodes: Vec<RenderedNode>,
    scrolls: usize,
}

/// In-memory view that records every node it renders.
#[derive(Debug, Default)]
pub struct HeadlessViewPort {
    state: Mutex<HeadlessState>,
}

impl HeadlessViewPort {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(input: impl Into<String>) -> Self {
        let view = Self::new();
        view.set_input(input);
        view
    }

    pub fn set_input(&self, input: impl Into<String>) {
        self.lock().input = input.into();
    }

    pub fn input(&self) -> String {
        self.lock().input.clone()
    }

    pub fn nodes(&self) -> Vec<RenderedNode> {
        self.lock().nodes.clone()
    }

    pub fn entries(&self) -> Vec<TranscriptEntry> {
        self.lock()
            .nodes
            .iter()
            .filter_map(|node| match node {
                RenderedNode::Entry(entry) => Some(entry.clone()),
                RenderedNode::Pending { .. } => None,
            })
            .collect()
    }

    pub fn pending_turns(&self) -> Vec<TurnId> {
        self.lock()
            .nodes
            .iter()
            .filter_map(|node| match node {
                RenderedNode::Pending { turn, .. } => Some(*turn),
                RenderedNode::Entry(_) => None,
            })
            .collect()
    }

    pub fn scroll_count(&self) -> usize {
        self.lock().scrolls
    }

    fn lock(&self) -> MutexGuard<'_, HeadlessState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ChatViewPort for HeadlessViewPort {
    fn input_value(&self) -> String {
        self.input()
    }

    fn clear_input(&self) {
        self.lock().input.clear();
    }

    fn append_entry(&self, entry: &TranscriptEntry) {
        self.lock().nodes.push(RenderedNode::Entry(entry.clone()));
    }

    fn show_pending(&self, indicator: PendingIndicator) {
        self.lock().nodes.push(RenderedNode::Pending {
            turn: indicator.turn,
            label: indicator.label().to_string(),
        });
    }

    fn remove_pending(&self, indicator: PendingIndicator) {
        self.lock().nodes.retain(|node| {
            !matches!(node, RenderedNode::Pending { turn, .. } if *turn == indicator.turn)
        });
    }

    fn scroll_to_latest(&self) {
        self.lock().scrolls += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_pending_only_drops_the_matching_indicator() {
        let view = HeadlessViewPort::new();
        view.show_pending(PendingIndicator { turn: TurnId::new(1) });
        view.append_entry(&TranscriptEntry::user(TurnId::new(2), "second"));
        view.show_pending(PendingIndicator { turn: TurnId::new(2) });

        view.remove_pending(PendingIndicator { turn: TurnId::new(1) });

        assert_eq!(view.pending_turns(), vec![TurnId::new(2)]);
        assert_eq!(view.entries().len(), 1);
    }

    #[test]
    fn pending_nodes_carry_typing_label() {
        let view = HeadlessViewPort::new();
        view.show_pending(PendingIndicator { turn: TurnId::new(7) });

        assert_eq!(
            view.nodes(),
            vec![RenderedNode::Pending {
                turn: TurnId::new(7),
                label: "Bot is typing...".to_string(),
            }]
        );
    }

    #[test]
    fn clear_input_empties_the_field() {
        let view = HeadlessViewPort::with_input("  hello ");
        assert_eq!(view.input_value(), "  hello ");
        view.clear_input();
        assert_eq!(view.input_value(), "");
    }
}
