//! Trait abstractions for runtime I/O
//!
//! The thinking delay sits behind `ReplyDelay` so tests can control it and a
//! real backend call could take its place.

use crate::state_machine::Reply;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Decides when a pending bot reply becomes visible
#[async_trait]
pub trait ReplyDelay: Send + Sync {
    /// Resolves when `reply` should be shown
    async fn wait(&self, reply: &Reply);
}

/// Waits a fixed duration before every reply
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[async_trait]
impl ReplyDelay for FixedDelay {
    async fn wait(&self, _reply: &Reply) {
        tokio::time::sleep(self.delay).await;
    }
}

#[async_trait]
impl<T: ReplyDelay + ?Sized> ReplyDelay for Arc<T> {
    async fn wait(&self, reply: &Reply) {
        (**self).wait(reply).await;
    }
}
