//! Pure state transition function

use super::event::Confirmation;
use super::state::{DialogState, Reply};
use super::{ConvContext, ConvState, Effect, Event};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ConvState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ConvState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Message is empty")]
    EmptyInput,
    #[error("Still replying to the previous message")]
    ReplyPending,
    #[error("There is no question to confirm")]
    NoPendingConfirmation,
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Pure transition function
///
/// Given the same inputs it always produces the same outputs. Errors never
/// imply a state change.
pub fn transition(
    state: &ConvState,
    context: &ConvContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    let catalog = &context.catalog;

    match (state, event) {
        // ============================================================
        // Busy: one reply in flight at a time
        // ============================================================
        (
            ConvState::Replying { .. },
            Event::QuickAction { .. } | Event::FreeText { .. } | Event::Confirm { .. },
        ) => Err(TransitionError::ReplyPending),

        // ============================================================
        // Quick actions (exact lookup)
        // ============================================================

        // Abandons any pending confirmation
        (ConvState::Ready { .. }, Event::QuickAction { trigger }) => {
            if is_blank(&trigger) {
                return Err(TransitionError::EmptyInput);
            }
            let text = catalog
                .lookup_exact(&trigger)
                .unwrap_or_else(|| catalog.pending_info_text());
            Ok(begin_reply(trigger, Reply::normal(text), DialogState::Idle))
        }

        // ============================================================
        // Free text (substring lookup)
        // ============================================================

        // Abandons any pending confirmation
        (ConvState::Ready { .. }, Event::FreeText { text }) => {
            if is_blank(&text) {
                return Err(TransitionError::EmptyInput);
            }
            let result = match catalog.lookup_by_substring(&text) {
                Some(matched) => begin_reply(text, Reply::normal(matched), DialogState::Idle),
                None if catalog.fallback_is_confirmation_prompt() => begin_reply(
                    text,
                    Reply::confirmation_prompt(catalog.fallback_text()),
                    DialogState::AwaitingConfirmation {
                        assumed_key: catalog.assumed_intent().to_string(),
                    },
                ),
                None => begin_reply(
                    text,
                    Reply::normal(catalog.fallback_text()),
                    DialogState::Idle,
                ),
            };
            Ok(result)
        }

        // ============================================================
        // Confirmation sub-dialog
        // ============================================================
        (
            ConvState::Ready {
                dialog: DialogState::AwaitingConfirmation { assumed_key },
            },
            Event::Confirm { answer },
        ) => {
            let reply = match answer {
                Confirmation::Yes => catalog
                    .lookup_exact(assumed_key)
                    .unwrap_or_else(|| catalog.pending_info_text()),
                Confirmation::No => catalog.rephrase_text(),
            };
            Ok(begin_reply(
                answer.user_text(),
                Reply::normal(reply),
                DialogState::Idle,
            ))
        }

        (
            ConvState::Ready {
                dialog: DialogState::Idle,
            },
            Event::Confirm { .. },
        ) => Err(TransitionError::NoPendingConfirmation),

        // ============================================================
        // Deferred reply
        // ============================================================
        (ConvState::Replying { reply, then }, Event::ReplyDue) => Ok(TransitionResult::new(
            ConvState::Ready {
                dialog: then.clone(),
            },
        )
        .with_effect(Effect::bot_message(reply.clone()))
        .with_effect(Effect::NotifyPending { active: false })),

        (ConvState::Ready { .. }, Event::ReplyDue) => Err(
            TransitionError::InvalidTransition(format!("No reply in flight in {state:?}")),
        ),
    }
}

/// First phase of every user turn: show the user message, then wait
fn begin_reply(user_text: impl Into<String>, reply: Reply, then: DialogState) -> TransitionResult {
    TransitionResult::new(ConvState::Replying { reply, then })
        .with_effect(Effect::user_message(user_text))
        .with_effect(Effect::NotifyPending { active: true })
        .with_effect(Effect::ScheduleReply)
}

fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}
