//! Warden change notification.
//!
//! A watcher tells other engine instances that policy changed so they can
//! reload from storage. Notification is strictly best-effort: the call
//! must not block on delivery, carries no rule data, and its outcome is
//! never inspected by the write path.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]
#![warn(rust_2018_idioms)]

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

/// Marker event delivered to subscribers: policy changed, reload if you
/// care. Carries no rule data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyEvent;

/// Best-effort peer notification.
///
/// `update` is fire-and-forget: implementations must return promptly and
/// swallow delivery failures. There is no acknowledgment and no delivery
/// guarantee.
pub trait Watcher: Send + Sync {
    /// Signal that policy changed.
    fn update(&self);
}

/// In-process fan-out watcher over a broadcast channel.
///
/// Lagging or absent subscribers are acceptable loss.
#[derive(Debug)]
pub struct BroadcastWatcher {
    tx: broadcast::Sender<PolicyEvent>,
}

impl BroadcastWatcher {
    /// Create a watcher whose channel buffers up to `capacity` pending
    /// events per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to change events.
    pub fn subscribe(&self) -> broadcast::Receiver<PolicyEvent> {
        self.tx.subscribe()
    }
}

impl Default for BroadcastWatcher {
    fn default() -> Self {
        Self::new(16)
    }
}

impl Watcher for BroadcastWatcher {
    fn update(&self) {
        if self.tx.send(PolicyEvent).is_err() {
            debug!("policy change notification dropped, no active subscribers");
        }
    }
}

/// Watcher that discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopWatcher;

impl Watcher for NoopWatcher {
    fn update(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_broadcast_delivers_to_subscriber() {
        let watcher = BroadcastWatcher::default();
        let mut rx = watcher.subscribe();

        watcher.update();
        assert_eq!(rx.recv().await.unwrap(), PolicyEvent);
    }

    #[tokio::test]
    async fn test_broadcast_delivers_to_every_subscriber() {
        let watcher = BroadcastWatcher::new(4);
        let mut rx1 = watcher.subscribe();
        let mut rx2 = watcher.subscribe();

        watcher.update();
        assert_eq!(rx1.recv().await.unwrap(), PolicyEvent);
        assert_eq!(rx2.recv().await.unwrap(), PolicyEvent);
    }

    #[test]
    fn test_update_without_subscribers_is_silent() {
        let watcher = BroadcastWatcher::default();
        watcher.update();
    }

    #[test]
    fn test_noop_watcher_discards() {
        NoopWatcher.update();
    }
}
