//! Named-channel publish/subscribe

use super::log_event::LogEvent;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Callback invoked synchronously for every event published on its channel.
pub type Listener = Arc<dyn Fn(&Arc<LogEvent>) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Subscription {
    id: SubscriptionId,
    channel: String,
    listener: Listener,
}

/// Synchronous event bus.
///
/// Listeners run on the publisher's call, in subscription order. The
/// listener list is snapshotted before delivery, so a listener may
/// unsubscribe itself (or others) while being called.
#[derive(Default)]
pub struct EventBus {
    subscriptions: RwLock<Vec<Subscription>>,
    next_id: AtomicU64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, channel: &str, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscriptions.write().push(Subscription {
            id,
            channel: channel.to_string(),
            listener,
        });
        id
    }

    /// Returns `false` if the subscription was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscriptions = self.subscriptions.write();
        match subscriptions.iter().position(|s| s.id == id) {
            Some(index) => {
                subscriptions.remove(index);
                true
            }
            None => false,
        }
    }

    /// Deliver an event to every listener of `channel`; returns how many
    /// listeners were called.
    pub fn publish(&self, channel: &str, event: &Arc<LogEvent>) -> usize {
        let listeners: Vec<Listener> = self
            .subscriptions
            .read()
            .iter()
            .filter(|s| s.channel == channel)
            .map(|s| Arc::clone(&s.listener))
            .collect();

        for listener in &listeners {
            listener(event);
        }
        listeners.len()
    }

    pub fn listener_count(&self, channel: &str) -> usize {
        self.subscriptions
            .read()
            .iter()
            .filter(|s| s.channel == channel)
            .count()
    }
}
