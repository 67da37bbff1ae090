//! Notification channel seam
//!
//! Signals carry no lifecycle data. Receivers re-fetch the snapshot and
//! re-run the resolver, so delivering a signal twice is harmless.

use crate::error::NotifyError;
use async_trait::async_trait;
use hatch_engine::LifecycleSignal;
use tokio::sync::broadcast;

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, signal: LifecycleSignal) -> Result<(), NotifyError>;
}

/// Fan-out to every open session over a tokio broadcast channel
#[derive(Debug, Clone)]
pub struct BroadcastNotifier {
    sender: broadcast::Sender<LifecycleSignal>,
}

impl BroadcastNotifier {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Open a session feed; each receiver sees signals sent after this call
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<LifecycleSignal> {
        self.sender.subscribe()
    }

    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for BroadcastNotifier {
    fn default() -> Self {
        Self::new(256)
    }
}

#[async_trait]
impl Notifier for BroadcastNotifier {
    async fn notify(&self, signal: LifecycleSignal) -> Result<(), NotifyError> {
        // No open session is not a failure; the next page load resolves fresh.
        if self.sender.receiver_count() == 0 {
            tracing::trace!(founder = %signal.founder_id(), "no open sessions");
            return Ok(());
        }
        self.sender
            .send(signal)
            .map(|_| ())
            .map_err(|_| NotifyError::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hatch_model::UserId;

    #[tokio::test]
    async fn subscribers_receive_signals() {
        let notifier = BroadcastNotifier::default();
        let mut feed = notifier.subscribe();
        let founder = UserId::new();

        notifier
            .notify(LifecycleSignal::SnapshotChanged { founder_id: founder })
            .await
            .unwrap();

        assert_eq!(feed.recv().await.unwrap().founder_id(), founder);
    }

    #[tokio::test]
    async fn no_subscribers_is_not_an_error() {
        let notifier = BroadcastNotifier::new(4);
        let signal = LifecycleSignal::SnapshotChanged {
            founder_id: UserId::new(),
        };
        assert!(notifier.notify(signal).await.is_ok());
    }
}
