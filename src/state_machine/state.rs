//! Conversation state types

use crate::catalog::ResponseCatalog;
use crate::message::MessageKind;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Where the dialogue stands between user turns
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DialogState {
    #[default]
    Idle,
    /// An unmatched query was answered with a confirmation prompt
    AwaitingConfirmation {
        /// Exact-entry key resolved on "yes"
        assumed_key: String,
    },
}

/// A bot reply decided by a transition but not yet shown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub text: String,
    pub kind: MessageKind,
}

impl Reply {
    pub fn normal(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: MessageKind::Normal,
        }
    }

    pub fn confirmation_prompt(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: MessageKind::ConfirmationPrompt,
        }
    }
}

/// Conversation state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConvState {
    /// Accepting user input
    Ready { dialog: DialogState },

    /// User message shown, bot reply waiting for its delay to elapse
    Replying {
        reply: Reply,
        /// Dialogue state once the reply is shown
        then: DialogState,
    },
}

impl Default for ConvState {
    fn default() -> Self {
        ConvState::idle()
    }
}

impl ConvState {
    pub fn idle() -> Self {
        ConvState::Ready {
            dialog: DialogState::Idle,
        }
    }

    /// Dialogue state, looking past any in-flight reply
    pub fn dialog(&self) -> &DialogState {
        match self {
            ConvState::Ready { dialog } => dialog,
            ConvState::Replying { then, .. } => then,
        }
    }

    pub fn is_replying(&self) -> bool {
        matches!(self, ConvState::Replying { .. })
    }
}

/// Context for a conversation (immutable configuration)
#[derive(Debug, Clone)]
pub struct ConvContext {
    pub session_id: String,
    pub catalog: Arc<ResponseCatalog>,
}

impl ConvContext {
    pub fn new(session_id: impl Into<String>, catalog: Arc<ResponseCatalog>) -> Self {
        Self {
            session_id: session_id.into(),
            catalog,
        }
    }

    /// Context with a fresh random session id
    pub fn with_random_id(catalog: Arc<ResponseCatalog>) -> Self {
        Self::new(uuid::Uuid::new_v4().to_string(), catalog)
    }
}
