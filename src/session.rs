//! Conversation session: history plus the state machine
//!
//! A session applies transitions and executes their effects against its own
//! history. User turns are two-phase: `dispatch` shows the user message and
//! hands back a [`ReplyTicket`], `deliver_reply` shows the bot message once
//! the caller decides the thinking delay is over.

use crate::message::{Message, MessageKind, Sender};
use crate::state_machine::{
    transition, Confirmation, ConvContext, ConvState, DialogState, Effect, Event, TransitionError,
    TransitionResult,
};
use thiserror::Error;

/// Identifies one deferred bot reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReplyTicket(u64);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Invalid input: message is empty")]
    InvalidInput,
    #[error(transparent)]
    Rejected(TransitionError),
    #[error("Reply is no longer pending")]
    StaleReply,
    #[error("Session is closed")]
    Closed,
}

impl From<TransitionError> for SessionError {
    fn from(err: TransitionError) -> Self {
        match err {
            TransitionError::EmptyInput => SessionError::InvalidInput,
            other => SessionError::Rejected(other),
        }
    }
}

/// Outcome of the first phase of a user turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatched {
    /// Messages appended immediately
    pub appended: Vec<Message>,
    /// Deferred reply, to be passed to [`ConversationSession::deliver_reply`]
    pub reply: Option<ReplyTicket>,
}

/// One open chat surface
#[derive(Debug)]
pub struct ConversationSession {
    context: ConvContext,
    state: ConvState,
    history: Vec<Message>,
    next_message_id: u64,
    next_ticket: u64,
    pending_reply: Option<ReplyTicket>,
}

impl ConversationSession {
    pub fn new(context: ConvContext) -> Self {
        let mut session = Self {
            context,
            state: ConvState::idle(),
            history: Vec::new(),
            next_message_id: 1,
            next_ticket: 1,
            pending_reply: None,
        };
        session.seed_greeting();
        session
    }

    pub fn context(&self) -> &ConvContext {
        &self.context
    }

    /// Read-only snapshot for rendering
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn state(&self) -> &ConvState {
        &self.state
    }

    pub fn dialog_state(&self) -> &DialogState {
        self.state.dialog()
    }

    pub fn is_replying(&self) -> bool {
        self.state.is_replying()
    }

    pub fn pending_reply(&self) -> Option<ReplyTicket> {
        self.pending_reply
    }

    /// First phase of a user turn
    pub fn dispatch(&mut self, event: Event) -> Result<Dispatched, SessionError> {
        if matches!(
            (&self.state, &event),
            (
                ConvState::Ready {
                    dialog: DialogState::AwaitingConfirmation { .. }
                },
                Event::FreeText { .. } | Event::QuickAction { .. }
            )
        ) {
            tracing::debug!(
                session_id = %self.context.session_id,
                "New input abandons the pending confirmation"
            );
        }

        let result = transition(&self.state, &self.context, event).map_err(|e| {
            tracing::debug!(session_id = %self.context.session_id, error = %e, "Input rejected");
            SessionError::from(e)
        })?;
        Ok(self.apply(result))
    }

    /// Second phase: show the bot reply for `ticket`
    pub fn deliver_reply(&mut self, ticket: ReplyTicket) -> Result<Vec<Message>, SessionError> {
        if self.pending_reply != Some(ticket) {
            tracing::debug!(session_id = %self.context.session_id, ?ticket, "Dropping stale reply");
            return Err(SessionError::StaleReply);
        }
        let result = transition(&self.state, &self.context, Event::ReplyDue)?;
        Ok(self.apply(result).appended)
    }

    pub fn submit_free_text(&mut self, text: &str) -> Result<Vec<Message>, SessionError> {
        self.run_turn(Event::free_text(text))
    }

    pub fn submit_quick_action(&mut self, trigger: &str) -> Result<Vec<Message>, SessionError> {
        self.run_turn(Event::quick_action(trigger))
    }

    pub fn confirm(&mut self, answer: Confirmation) -> Result<Vec<Message>, SessionError> {
        self.run_turn(Event::confirm(answer))
    }

    /// Clear history and state, dropping any pending reply
    ///
    /// Message ids and tickets keep counting so nothing from before the
    /// reset can collide with what comes after.
    pub fn reset(&mut self) {
        tracing::info!(
            session_id = %self.context.session_id,
            messages = self.history.len(),
            "Resetting session"
        );
        self.history.clear();
        self.state = ConvState::idle();
        self.pending_reply = None;
        self.seed_greeting();
    }

    /// Both phases back to back, for callers without a delay
    fn run_turn(&mut self, event: Event) -> Result<Vec<Message>, SessionError> {
        let dispatched = self.dispatch(event)?;
        let mut appended = dispatched.appended;
        if let Some(ticket) = dispatched.reply {
            appended.extend(self.deliver_reply(ticket)?);
        }
        Ok(appended)
    }

    fn apply(&mut self, result: TransitionResult) -> Dispatched {
        self.state = result.new_state;

        let mut dispatched = Dispatched {
            appended: Vec::new(),
            reply: None,
        };
        for effect in result.effects {
            match effect {
                Effect::AppendMessage { sender, text, kind } => {
                    dispatched.appended.push(self.push_message(sender, text, kind));
                }
                Effect::ScheduleReply => {
                    let ticket = ReplyTicket(self.next_ticket);
                    self.next_ticket += 1;
                    self.pending_reply = Some(ticket);
                    dispatched.reply = Some(ticket);
                }
                Effect::NotifyPending { active } => {
                    if !active {
                        self.pending_reply = None;
                    }
                    tracing::trace!(
                        session_id = %self.context.session_id,
                        active,
                        "Pending indicator"
                    );
                }
            }
        }
        dispatched
    }

    fn push_message(&mut self, sender: Sender, text: String, kind: MessageKind) -> Message {
        let message = Message::new(self.next_message_id, sender, text, kind);
        self.next_message_id += 1;
        self.history.push(message.clone());
        message
    }

    fn seed_greeting(&mut self) {
        if let Some(greeting) = self.context.catalog.greeting().map(str::to_owned) {
            self.push_message(Sender::Bot, greeting, MessageKind::Normal);
        }
    }
}
