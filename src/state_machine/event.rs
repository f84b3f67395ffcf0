//! Events that can occur in a conversation

use serde::{Deserialize, Serialize};

/// Answer to a confirmation prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confirmation {
    Yes,
    No,
}

impl Confirmation {
    /// Text recorded as the user's message
    pub fn user_text(self) -> &'static str {
        match self {
            Confirmation::Yes => "Yes, that's correct",
            Confirmation::No => "No, that's not what I meant",
        }
    }
}

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    // User events
    QuickAction { trigger: String },
    FreeText { text: String },
    Confirm { answer: Confirmation },

    // Timer events
    /// The thinking delay for the in-flight reply elapsed
    ReplyDue,
}

impl Event {
    pub fn quick_action(trigger: impl Into<String>) -> Self {
        Event::QuickAction {
            trigger: trigger.into(),
        }
    }

    pub fn free_text(text: impl Into<String>) -> Self {
        Event::FreeText { text: text.into() }
    }

    pub fn confirm(answer: Confirmation) -> Self {
        Event::Confirm { answer }
    }
}
