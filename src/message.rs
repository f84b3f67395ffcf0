//! Chat message types shared by the session and the presentation layer

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Bot,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Bot => write!(f, "bot"),
        }
    }
}

/// How a message is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    #[default]
    Normal,
    /// Rendered with yes/no affordances
    ConfirmationPrompt,
}

/// A single entry in the chat history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Monotonic within a session, never reused
    pub id: u64,
    /// Display text, newlines preserved
    pub text: String,
    pub sender: Sender,
    #[serde(default)]
    pub kind: MessageKind,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn new(id: u64, sender: Sender, text: impl Into<String>, kind: MessageKind) -> Self {
        Self {
            id,
            text: text.into(),
            sender,
            kind,
            created_at: Utc::now(),
        }
    }

    pub fn is_confirmation_prompt(&self) -> bool {
        self.kind == MessageKind::ConfirmationPrompt
    }
}
