//! Runtime for driving a chat session
//!
//! One tokio task owns each `ConversationSession`. The presentation layer
//! talks to it through a cloneable [`SessionHandle`] and renders the
//! [`SessionUpdate`]s it broadcasts.

mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::SessionRuntime;
pub use traits::*;

use crate::message::Message;
use crate::session::{ConversationSession, ReplyTicket, SessionError};
use crate::state_machine::{Confirmation, ConvContext, DialogState, Event};
use tokio::sync::{broadcast, mpsc, oneshot};

/// Events sent to the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionUpdate {
    MessageAdded {
        message: Message,
    },
    /// Show or hide the "thinking" indicator
    Pending {
        active: bool,
    },
    /// Dialogue state after a bot reply landed
    StateChange {
        dialog: DialogState,
    },
    /// History was cleared; any greeting follows as `MessageAdded`
    Reset,
    /// Input refused by the state machine (empty input is not reported)
    Rejected {
        message: String,
    },
}

/// Requests handled by the runtime task
#[derive(Debug)]
pub(crate) enum Command {
    Dispatch {
        event: Event,
        ack: oneshot::Sender<Result<(), SessionError>>,
    },
    ReplyDue {
        ticket: ReplyTicket,
    },
    History {
        reply: oneshot::Sender<Vec<Message>>,
    },
    Reset {
        ack: oneshot::Sender<()>,
    },
}

/// Handle to interact with a running session
///
/// The runtime stops, cancelling any outstanding reply delay, once every
/// handle is dropped.
#[derive(Clone)]
pub struct SessionHandle {
    command_tx: mpsc::Sender<Command>,
    broadcast_tx: broadcast::Sender<SessionUpdate>,
}

impl SessionHandle {
    /// Start a runtime task for a fresh session
    pub fn spawn<D: ReplyDelay + 'static>(context: ConvContext, delay: D) -> Self {
        let (command_tx, command_rx) = mpsc::channel(32);
        let (broadcast_tx, _) = broadcast::channel(128);

        let runtime = SessionRuntime::new(
            ConversationSession::new(context),
            delay,
            command_rx,
            command_tx.downgrade(),
            broadcast_tx.clone(),
        );
        tokio::spawn(runtime.run());

        Self {
            command_tx,
            broadcast_tx,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionUpdate> {
        self.broadcast_tx.subscribe()
    }

    pub async fn submit_free_text(&self, text: impl Into<String>) -> Result<(), SessionError> {
        self.dispatch(Event::free_text(text)).await
    }

    pub async fn submit_quick_action(
        &self,
        trigger: impl Into<String>,
    ) -> Result<(), SessionError> {
        self.dispatch(Event::quick_action(trigger)).await
    }

    pub async fn confirm(&self, answer: Confirmation) -> Result<(), SessionError> {
        self.dispatch(Event::confirm(answer)).await
    }

    /// Snapshot of the current history
    pub async fn history(&self) -> Result<Vec<Message>, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::History { reply }).await?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    pub async fn reset(&self) -> Result<(), SessionError> {
        let (ack, rx) = oneshot::channel();
        self.send(Command::Reset { ack }).await?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    async fn dispatch(&self, event: Event) -> Result<(), SessionError> {
        let (ack, rx) = oneshot::channel();
        self.send(Command::Dispatch { event, ack }).await?;
        rx.await.map_err(|_| SessionError::Closed)?
    }

    async fn send(&self, command: Command) -> Result<(), SessionError> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| SessionError::Closed)
    }
}
