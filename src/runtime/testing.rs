//! Mock implementations for testing
//!
//! These mocks let the runtime be driven without real timers.

use super::traits::*;
use super::{SessionHandle, SessionUpdate};
use crate::catalog::CatalogPreset;
use crate::state_machine::{ConvContext, Reply};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Notify};

// ============================================================================
// Mock Delays
// ============================================================================

/// Releases every reply immediately
pub struct InstantDelay;

#[async_trait]
impl ReplyDelay for InstantDelay {
    async fn wait(&self, _reply: &Reply) {}
}

/// Holds each reply until the test opens the gate
#[derive(Default)]
pub struct GatedDelay {
    gate: Notify,
    started: Notify,
}

impl GatedDelay {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Let one waiting reply through
    pub fn release(&self) {
        self.gate.notify_one();
    }

    /// Resolves once a reply delay has begun
    pub async fn wait_started(&self) {
        self.started.notified().await;
    }
}

#[async_trait]
impl ReplyDelay for GatedDelay {
    async fn wait(&self, _reply: &Reply) {
        self.started.notify_one();
        self.gate.notified().await;
    }
}

// ============================================================================
// Test Runtime
// ============================================================================

pub struct TestRuntime {
    pub handle: SessionHandle,
    pub updates: broadcast::Receiver<SessionUpdate>,
}

impl TestRuntime {
    pub fn start<D: ReplyDelay + 'static>(preset: CatalogPreset, delay: D) -> Self {
        let catalog = Arc::new(preset.catalog().unwrap());
        let handle = SessionHandle::spawn(ConvContext::new("test-session", catalog), delay);
        let updates = handle.subscribe();
        Self { handle, updates }
    }

    /// Next update, failing the test if none arrives
    pub async fn next_update(&mut self) -> SessionUpdate {
        tokio::time::timeout(Duration::from_secs(2), self.updates.recv())
            .await
            .expect("timed out waiting for update")
            .expect("update channel closed")
    }

    /// Collect updates up to and including the next `StateChange`
    pub async fn until_reply(&mut self) -> Vec<SessionUpdate> {
        let mut seen = Vec::new();
        loop {
            let update = self.next_update().await;
            let done = matches!(update, SessionUpdate::StateChange { .. });
            seen.push(update);
            if done {
                return seen;
            }
        }
    }

    /// True if nothing is broadcast within a short window
    pub async fn stays_quiet(&mut self) -> bool {
        tokio::time::timeout(Duration::from_millis(100), self.updates.recv())
            .await
            .is_err()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{MessageKind, Sender};
    use crate::session::SessionError;
    use crate::state_machine::{Confirmation, DialogState, TransitionError};
    use tokio::sync::broadcast::error::{RecvError, TryRecvError};

    fn message_of(update: &SessionUpdate) -> Option<(Sender, &str)> {
        match update {
            SessionUpdate::MessageAdded { message } => {
                Some((message.sender, message.text.as_str()))
            }
            _ => None,
        }
    }

    #[tokio::test]
    async fn test_two_phase_update_order() {
        let mut rt = TestRuntime::start(CatalogPreset::Cse, InstantDelay);
        rt.handle.submit_quick_action("Admission Process").await.unwrap();

        let updates = rt.until_reply().await;
        assert_eq!(updates.len(), 5);
        assert_eq!(message_of(&updates[0]), Some((Sender::User, "Admission Process")));
        assert_eq!(updates[1], SessionUpdate::Pending { active: true });
        let (sender, text) = message_of(&updates[2]).unwrap();
        assert_eq!(sender, Sender::Bot);
        assert!(text.starts_with("The admission process at MUJ CSE involves:"));
        assert_eq!(updates[3], SessionUpdate::Pending { active: false });
        assert_eq!(
            updates[4],
            SessionUpdate::StateChange {
                dialog: DialogState::Idle
            }
        );

        assert_eq!(rt.handle.history().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_input_rejected_while_reply_pending() {
        let delay = GatedDelay::new();
        let mut rt = TestRuntime::start(CatalogPreset::Cse, delay.clone());

        rt.handle.submit_quick_action("Fee Structure").await.unwrap();
        delay.wait_started().await;

        let err = rt.handle.submit_free_text("hostel").await.unwrap_err();
        assert_eq!(err, SessionError::Rejected(TransitionError::ReplyPending));

        assert!(message_of(&rt.next_update().await).is_some());
        assert_eq!(rt.next_update().await, SessionUpdate::Pending { active: true });
        assert!(matches!(rt.next_update().await, SessionUpdate::Rejected { .. }));

        delay.release();
        let updates = rt.until_reply().await;
        let history = rt.handle.history().await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].text, "Fee Structure");
        assert_eq!(message_of(&updates[0]).map(|(s, _)| s), Some(Sender::Bot));
    }

    #[tokio::test]
    async fn test_reset_during_delay_drops_reply() {
        let delay = GatedDelay::new();
        let mut rt = TestRuntime::start(CatalogPreset::Cse, delay.clone());

        rt.handle.submit_quick_action("Infrastructure").await.unwrap();
        delay.wait_started().await;
        rt.handle.reset().await.unwrap();

        assert!(message_of(&rt.next_update().await).is_some());
        assert_eq!(rt.next_update().await, SessionUpdate::Pending { active: true });
        assert_eq!(rt.next_update().await, SessionUpdate::Reset);
        assert_eq!(rt.next_update().await, SessionUpdate::Pending { active: false });
        assert!(rt.stays_quiet().await);
        assert!(rt.handle.history().await.unwrap().is_empty());

        // The session is usable again right away
        rt.handle.submit_quick_action("Course Duration").await.unwrap();
        delay.release();
        let updates = rt.until_reply().await;
        let history = rt.handle.history().await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].text, "Course Duration");
        assert!(updates.iter().all(|u| !matches!(u, SessionUpdate::Rejected { .. })));
    }

    #[tokio::test]
    async fn test_empty_input_broadcasts_nothing() {
        let mut rt = TestRuntime::start(CatalogPreset::Cse, InstantDelay);

        assert_eq!(
            rt.handle.submit_free_text("   ").await,
            Err(SessionError::InvalidInput)
        );
        assert_eq!(
            rt.handle.submit_quick_action("").await,
            Err(SessionError::InvalidInput)
        );
        assert_eq!(rt.updates.try_recv(), Err(TryRecvError::Empty));
        assert!(rt.handle.history().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_confirmation_flow_through_handle() {
        let mut rt = TestRuntime::start(CatalogPreset::Cse, InstantDelay);

        rt.handle.submit_free_text("123 ???").await.unwrap();
        let updates = rt.until_reply().await;
        match &updates[2] {
            SessionUpdate::MessageAdded { message } => {
                assert_eq!(message.kind, MessageKind::ConfirmationPrompt);
            }
            other => panic!("expected prompt, got {other:?}"),
        }
        assert_eq!(
            updates.last(),
            Some(&SessionUpdate::StateChange {
                dialog: DialogState::AwaitingConfirmation {
                    assumed_key: "Admission Process".to_string()
                }
            })
        );

        rt.handle.confirm(Confirmation::Yes).await.unwrap();
        let updates = rt.until_reply().await;
        assert_eq!(message_of(&updates[0]), Some((Sender::User, "Yes, that's correct")));
        let (_, text) = message_of(&updates[2]).unwrap();
        assert!(text.starts_with("The admission process at MUJ CSE involves:"));
        assert_eq!(
            updates.last(),
            Some(&SessionUpdate::StateChange {
                dialog: DialogState::Idle
            })
        );
    }

    #[tokio::test]
    async fn test_confirm_without_prompt_is_rejected() {
        let mut rt = TestRuntime::start(CatalogPreset::Cse, InstantDelay);
        let err = rt.handle.confirm(Confirmation::No).await.unwrap_err();
        assert_eq!(
            err,
            SessionError::Rejected(TransitionError::NoPendingConfirmation)
        );
        assert!(matches!(rt.next_update().await, SessionUpdate::Rejected { .. }));
    }

    #[tokio::test]
    async fn test_greeting_in_history_and_after_reset() {
        let mut rt = TestRuntime::start(CatalogPreset::Campus, InstantDelay);
        let history = rt.handle.history().await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].sender, Sender::Bot);

        rt.handle.reset().await.unwrap();
        assert_eq!(rt.next_update().await, SessionUpdate::Reset);
        let (sender, text) = message_of(&rt.next_update().await)
            .map(|(s, t)| (s, t.to_string()))
            .unwrap();
        assert_eq!(sender, Sender::Bot);
        assert_eq!(text, history[0].text);
    }

    #[tokio::test]
    async fn test_dropping_handle_stops_runtime() {
        let delay = GatedDelay::new();
        let TestRuntime {
            handle,
            mut updates,
        } = TestRuntime::start(CatalogPreset::Cse, delay.clone());

        handle.submit_quick_action("Placement Statistics").await.unwrap();
        delay.wait_started().await;
        drop(handle);

        let closed = async {
            loop {
                match updates.recv().await {
                    Err(RecvError::Closed) => return true,
                    Err(RecvError::Lagged(_)) => return false,
                    Ok(_) => {}
                }
            }
        };
        assert!(tokio::time::timeout(Duration::from_secs(2), closed)
            .await
            .unwrap());
    }
}
