//! Session runtime executor

use super::traits::ReplyDelay;
use super::{Command, SessionUpdate};

use crate::session::{ConversationSession, ReplyTicket, SessionError};
use crate::state_machine::{ConvState, Event};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;

/// Owns one session and serializes every action on it
pub struct SessionRuntime<D>
where
    D: ReplyDelay + 'static,
{
    session: ConversationSession,
    delay: Arc<D>,
    command_rx: mpsc::Receiver<Command>,
    /// Weak so an outstanding reply delay never keeps the runtime alive
    command_tx: mpsc::WeakSender<Command>,
    broadcast_tx: broadcast::Sender<SessionUpdate>,
    /// Token to cancel the outstanding reply delay
    reply_cancel_token: Option<CancellationToken>,
}

impl<D> SessionRuntime<D>
where
    D: ReplyDelay + 'static,
{
    pub(crate) fn new(
        session: ConversationSession,
        delay: D,
        command_rx: mpsc::Receiver<Command>,
        command_tx: mpsc::WeakSender<Command>,
        broadcast_tx: broadcast::Sender<SessionUpdate>,
    ) -> Self {
        Self {
            session,
            delay: Arc::new(delay),
            command_rx,
            command_tx,
            broadcast_tx,
            reply_cancel_token: None,
        }
    }

    pub async fn run(mut self) {
        tracing::info!(session_id = %self.session_id(), "Starting session runtime");

        while let Some(command) = self.command_rx.recv().await {
            self.handle_command(command);
        }

        // Every handle is gone: the chat surface was torn down
        self.cancel_pending_reply();
        tracing::info!(session_id = %self.session_id(), "Session runtime stopped");
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Dispatch { event, ack } => {
                let result = self.dispatch(event);
                let _ = ack.send(result);
            }
            Command::ReplyDue { ticket } => self.deliver_reply(ticket),
            Command::History { reply } => {
                let _ = reply.send(self.session.history().to_vec());
            }
            Command::Reset { ack } => {
                self.reset();
                let _ = ack.send(());
            }
        }
    }

    fn dispatch(&mut self, event: Event) -> Result<(), SessionError> {
        let dispatched = match self.session.dispatch(event) {
            Ok(d) => d,
            Err(SessionError::InvalidInput) => return Err(SessionError::InvalidInput),
            Err(e) => {
                let _ = self.broadcast_tx.send(SessionUpdate::Rejected {
                    message: e.to_string(),
                });
                return Err(e);
            }
        };

        for message in dispatched.appended {
            let _ = self.broadcast_tx.send(SessionUpdate::MessageAdded { message });
        }
        if let Some(ticket) = dispatched.reply {
            let _ = self
                .broadcast_tx
                .send(SessionUpdate::Pending { active: true });
            self.schedule_reply(ticket);
        }
        Ok(())
    }

    fn schedule_reply(&mut self, ticket: ReplyTicket) {
        let ConvState::Replying { reply, .. } = self.session.state() else {
            tracing::warn!(
                session_id = %self.session_id(),
                "Reply scheduled without a reply in flight"
            );
            return;
        };
        let reply = reply.clone();

        self.cancel_pending_reply();
        let cancel_token = CancellationToken::new();
        self.reply_cancel_token = Some(cancel_token.clone());

        let delay = self.delay.clone();
        let command_tx = self.command_tx.clone();
        let session_id = self.session_id().to_string();

        tokio::spawn(async move {
            tokio::select! {
                () = delay.wait(&reply) => {
                    if let Some(command_tx) = command_tx.upgrade() {
                        let _ = command_tx.send(Command::ReplyDue { ticket }).await;
                    }
                }
                () = cancel_token.cancelled() => {
                    tracing::debug!(session_id = %session_id, ?ticket, "Reply delay cancelled");
                }
            }
        });
    }

    fn deliver_reply(&mut self, ticket: ReplyTicket) {
        let messages = match self.session.deliver_reply(ticket) {
            Ok(messages) => messages,
            Err(e) => {
                tracing::debug!(session_id = %self.session_id(), error = %e, "Ignoring reply");
                return;
            }
        };
        self.reply_cancel_token = None;

        for message in messages {
            let _ = self.broadcast_tx.send(SessionUpdate::MessageAdded { message });
        }
        let _ = self
            .broadcast_tx
            .send(SessionUpdate::Pending { active: false });
        let _ = self.broadcast_tx.send(SessionUpdate::StateChange {
            dialog: self.session.dialog_state().clone(),
        });
    }

    fn reset(&mut self) {
        let was_pending = self.session.is_replying();
        self.cancel_pending_reply();
        self.session.reset();

        let _ = self.broadcast_tx.send(SessionUpdate::Reset);
        if was_pending {
            let _ = self
                .broadcast_tx
                .send(SessionUpdate::Pending { active: false });
        }
        for message in self.session.history() {
            let _ = self.broadcast_tx.send(SessionUpdate::MessageAdded {
                message: message.clone(),
            });
        }
    }

    fn cancel_pending_reply(&mut self) {
        if let Some(token) = self.reply_cancel_token.take() {
            token.cancel();
        }
    }

    fn session_id(&self) -> &str {
        &self.session.context().session_id
    }
}
