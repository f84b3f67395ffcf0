//! Effects produced by state transitions

use super::state::Reply;
use crate::message::{MessageKind, Sender};

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Append a message to the history
    AppendMessage {
        sender: Sender,
        text: String,
        kind: MessageKind,
    },

    /// Start the thinking delay for the reply held in `Replying`
    ScheduleReply,

    /// Show or hide the pending indicator
    NotifyPending { active: bool },
}

impl Effect {
    pub fn user_message(text: impl Into<String>) -> Self {
        Effect::AppendMessage {
            sender: Sender::User,
            text: text.into(),
            kind: MessageKind::Normal,
        }
    }

    pub fn bot_message(reply: Reply) -> Self {
        Effect::AppendMessage {
            sender: Sender::Bot,
            text: reply.text,
            kind: reply.kind,
        }
    }
}
