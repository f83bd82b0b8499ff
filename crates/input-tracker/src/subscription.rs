//! Owned groups of host subscriptions.

use std::sync::Arc;

use peeper_platform_core::{EventSource, Listener, SubscriptionId};
use peeper_widget_model::Channel;

/// A set of listeners registered on one event source, released together.
///
/// Disposal is idempotent: the first call unsubscribes everything, later
/// calls (including the one from `Drop`) find nothing left to release.
pub struct SubscriptionSet {
    source: Arc<dyn EventSource>,
    entries: Vec<(Channel, SubscriptionId)>,
}

impl SubscriptionSet {
    pub fn new(source: Arc<dyn EventSource>) -> Self {
        Self {
            source,
            entries: Vec::new(),
        }
    }

    /// Register a listener and take ownership of the subscription.
    pub fn subscribe(&mut self, channel: Channel, listener: Listener) {
        let id = self.source.subscribe(channel, listener);
        self.entries.push((channel, id));
    }

    /// Release every subscription. Returns how many the source removed.
    pub fn dispose(&mut self) -> usize {
        if self.entries.is_empty() {
            return 0;
        }

        let mut released = 0;
        for (channel, id) in self.entries.drain(..) {
            if self.source.unsubscribe(id) {
                released += 1;
            } else {
                tracing::warn!(channel = channel.as_str(), id = id.0, "Subscription already gone");
            }
        }
        tracing::debug!(released, "Released subscriptions");
        released
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any subscription is held on `channel`.
    pub fn holds(&self, channel: Channel) -> bool {
        self.entries.iter().any(|(c, _)| *c == channel)
    }
}

impl Drop for SubscriptionSet {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for SubscriptionSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionSet")
            .field("entries", &self.entries)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::SyntheticEvents;
    use peeper_widget_model::HostEvent;

    fn noop() -> Listener {
        Arc::new(|_: &HostEvent| {})
    }

    #[test]
    fn test_dispose_releases_each_subscription_once() {
        let events = Arc::new(SyntheticEvents::new());
        let mut set = SubscriptionSet::new(events.clone());
        set.subscribe(Channel::KeyUp, noop());
        set.subscribe(Channel::Focus, noop());
        assert_eq!(events.total_listeners(), 2);
        assert!(set.holds(Channel::Focus));

        assert_eq!(set.dispose(), 2);
        assert_eq!(events.total_listeners(), 0);
        assert_eq!(set.dispose(), 0);
        assert!(set.is_empty());
    }

    #[test]
    fn test_drop_releases_subscriptions() {
        let events = Arc::new(SyntheticEvents::new());
        {
            let mut set = SubscriptionSet::new(events.clone());
            set.subscribe(Channel::Click, noop());
            assert_eq!(events.listener_count(Channel::Click), 1);
        }
        assert_eq!(events.listener_count(Channel::Click), 0);
    }
}
