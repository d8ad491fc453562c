//! State machine for message lifecycle
//!
//! Message states: Created → Edited (repeatable) → Deleted (terminal)

pub use threadline_common::StateError;

/// Message states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageState {
    Created,
    Edited,
    Deleted,
}

impl MessageState {
    /// Get all valid next states from current state
    pub fn valid_transitions(&self) -> &'static [MessageState] {
        match self {
            Self::Created => &[Self::Edited, Self::Deleted],
            Self::Edited => &[Self::Edited, Self::Deleted],
            Self::Deleted => &[],
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Deleted)
    }
}

impl std::fmt::Display for MessageState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::Edited => write!(f, "edited"),
            Self::Deleted => write!(f, "deleted"),
        }
    }
}

/// Events that trigger message state transitions
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MessageEvent {
    /// Author changes the content
    Edit,
    /// Author removes the message
    Delete,
}

impl std::fmt::Display for MessageEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Edit => write!(f, "edit"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Message state machine
pub struct MessageStateMachine;

impl MessageStateMachine {
    /// Attempt a state transition
    pub fn transition(
        current: MessageState,
        event: MessageEvent,
    ) -> Result<MessageState, StateError> {
        if current.is_terminal() {
            return Err(StateError::TerminalState(current.to_string()));
        }

        let next = match event {
            MessageEvent::Edit => MessageState::Edited,
            MessageEvent::Delete => MessageState::Deleted,
        };

        if !current.valid_transitions().contains(&next) {
            return Err(StateError::InvalidTransition {
                from: current.to_string(),
                to: next.to_string(),
                event: event.to_string(),
            });
        }

        Ok(next)
    }
}
