//! Process-wide alert channel with named topics.
//!
//! Delivery is synchronous: `publish` pushes into every matching subscriber's
//! queue before it returns, so each subscriber sees a channel's alerts in
//! publish order.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tokio::sync::mpsc;
use tracing::debug;

/// Channel used when a producer does not name one.
pub const DEFAULT_CHANNEL: &str = "default-alert";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Info,
    Warning,
}

impl Severity {
    /// Presentation variant name for a UI binding.
    pub fn variant(self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Error => "danger",
            Severity::Info => "info",
            Severity::Warning => "warning",
        }
    }
}

/// A transient notification.
///
/// An alert without a message is a tombstone: see [`Alert::tombstone`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    /// Empty means "not stamped yet"; the bus fills it in.
    pub channel: String,
    pub severity: Option<Severity>,
    pub message: Option<String>,
    pub keep_after_route_change: bool,
    pub auto_close: bool,
    pub fade: bool,
}

impl Alert {
    pub fn new(severity: Severity, message: impl Into<String>, options: AlertOptions) -> Self {
        Self {
            channel: options.channel.unwrap_or_default(),
            severity: Some(severity),
            message: Some(message.into()),
            keep_after_route_change: options.keep_after_route_change,
            auto_close: options.auto_close,
            fade: options.fade,
        }
    }

    /// The clear signal for `channel`.
    pub fn tombstone(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            severity: None,
            message: None,
            keep_after_route_change: false,
            auto_close: false,
            fade: false,
        }
    }

    pub fn is_tombstone(&self) -> bool {
        self.message.as_deref().map_or(true, str::is_empty)
    }
}

/// Producer-side knobs for the convenience constructors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertOptions {
    pub channel: Option<String>,
    pub keep_after_route_change: bool,
    pub auto_close: bool,
    pub fade: bool,
}

impl AlertOptions {
    pub fn on_channel(channel: impl Into<String>) -> Self {
        Self {
            channel: Some(channel.into()),
            ..Self::default()
        }
    }

    pub fn auto_close(mut self) -> Self {
        self.auto_close = true;
        self
    }

    pub fn keep_after_route_change(mut self) -> Self {
        self.keep_after_route_change = true;
        self
    }
}

struct Subscriber {
    id: u64,
    channel: String,
    sender: mpsc::UnboundedSender<Alert>,
}

#[derive(Default)]
struct BusInner {
    next_id: u64,
    subscribers: Vec<Subscriber>,
}

fn lock(inner: &Mutex<BusInner>) -> MutexGuard<'_, BusInner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Cloneable handle to the alert bus. Clones share subscribers.
#[derive(Clone, Default)]
pub struct AlertBus {
    inner: Arc<Mutex<BusInner>>,
}

impl AlertBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Live view of one channel.
    pub fn subscribe(&self, channel: &str) -> AlertSubscription {
        let (sender, receiver) = mpsc::unbounded_channel();
        let mut inner = lock(&self.inner);
        inner.next_id += 1;
        let id = inner.next_id;
        inner.subscribers.push(Subscriber {
            id,
            channel: channel.to_string(),
            sender,
        });
        debug!(channel, id, "Alert subscriber added");
        AlertSubscription {
            id,
            channel: channel.to_string(),
            receiver,
            bus: Arc::downgrade(&self.inner),
            subscribed: true,
        }
    }

    /// Delivers `alert` on its own channel, or the default one when unset.
    pub fn publish(&self, alert: Alert) {
        self.publish_to(DEFAULT_CHANNEL, alert);
    }

    /// Delivers `alert`, stamping `channel` on it if it has none.
    pub fn publish_to(&self, channel: &str, mut alert: Alert) {
        if alert.channel.is_empty() {
            alert.channel = channel.to_string();
        }
        let mut inner = lock(&self.inner);
        let mut delivered = 0usize;
        // Subscribers whose receiving side is gone are pruned here.
        inner.subscribers.retain(|subscriber| {
            if subscriber.channel != alert.channel {
                return !subscriber.sender.is_closed();
            }
            let sent = subscriber.sender.send(alert.clone()).is_ok();
            if sent {
                delivered += 1;
            }
            sent
        });
        debug!(
            channel = %alert.channel,
            tombstone = alert.is_tombstone(),
            delivered,
            "Alert published"
        );
    }

    /// Publishes the tombstone for `channel`.
    pub fn clear(&self, channel: &str) {
        self.publish(Alert::tombstone(channel));
    }

    pub fn success(&self, message: impl Into<String>, options: AlertOptions) {
        self.publish(Alert::new(Severity::Success, message, options));
    }

    pub fn error(&self, message: impl Into<String>, options: AlertOptions) {
        self.publish(Alert::new(Severity::Error, message, options));
    }

    pub fn info(&self, message: impl Into<String>, options: AlertOptions) {
        self.publish(Alert::new(Severity::Info, message, options));
    }

    pub fn warn(&self, message: impl Into<String>, options: AlertOptions) {
        self.publish(Alert::new(Severity::Warning, message, options));
    }

    pub fn subscriber_count(&self, channel: &str) -> usize {
        lock(&self.inner)
            .subscribers
            .iter()
            .filter(|s| s.channel == channel)
            .count()
    }
}

/// Receiving end of [`AlertBus::subscribe`]. Dropping it unsubscribes.
pub struct AlertSubscription {
    id: u64,
    channel: String,
    receiver: mpsc::UnboundedReceiver<Alert>,
    bus: Weak<Mutex<BusInner>>,
    subscribed: bool,
}

impl AlertSubscription {
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Next alert; `None` after unsubscribing or once the bus is gone.
    pub async fn recv(&mut self) -> Option<Alert> {
        self.receiver.recv().await
    }

    pub fn try_recv(&mut self) -> Option<Alert> {
        self.receiver.try_recv().ok()
    }

    /// Idempotent, and harmless after the bus itself was dropped.
    pub fn unsubscribe(&mut self) {
        if !std::mem::replace(&mut self.subscribed, false) {
            return;
        }
        self.receiver.close();
        if let Some(inner) = self.bus.upgrade() {
            let id = self.id;
            lock(&inner).subscribers.retain(|s| s.id != id);
            debug!(channel = %self.channel, id, "Alert subscriber removed");
        }
    }
}

impl Drop for AlertSubscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_reaches_only_matching_channel_in_order() {
        let bus = AlertBus::new();
        let mut x = bus.subscribe("x");
        let mut y = bus.subscribe("y");

        bus.info("one", AlertOptions::on_channel("x"));
        bus.error("two", AlertOptions::on_channel("x"));
        bus.info("other", AlertOptions::on_channel("y"));

        assert_eq!(x.try_recv().unwrap().message.as_deref(), Some("one"));
        assert_eq!(x.try_recv().unwrap().message.as_deref(), Some("two"));
        assert!(x.try_recv().is_none());
        assert_eq!(y.try_recv().unwrap().message.as_deref(), Some("other"));
    }

    #[test]
    fn test_unset_channel_is_stamped_with_default() {
        let bus = AlertBus::new();
        let mut default = bus.subscribe(DEFAULT_CHANNEL);

        bus.error("Deleting account failed with: boom", AlertOptions::default());

        let alert = default.try_recv().unwrap();
        assert_eq!(alert.channel, DEFAULT_CHANNEL);
        assert_eq!(alert.severity, Some(Severity::Error));
    }

    #[test]
    fn test_multiple_subscribers_each_receive() {
        let bus = AlertBus::new();
        let mut a = bus.subscribe("x");
        let mut b = bus.subscribe("x");

        bus.success("saved", AlertOptions::on_channel("x"));

        assert!(a.try_recv().is_some());
        assert!(b.try_recv().is_some());
    }

    #[test]
    fn test_clear_publishes_tombstone() {
        let bus = AlertBus::new();
        let mut sub = bus.subscribe("y");

        bus.clear("y");

        let alert = sub.try_recv().unwrap();
        assert!(alert.is_tombstone());
        assert_eq!(alert.channel, "y");
    }

    #[test]
    fn test_unsubscribe_is_idempotent_and_survives_bus_drop() {
        let bus = AlertBus::new();
        let mut sub = bus.subscribe("x");
        assert_eq!(bus.subscriber_count("x"), 1);

        sub.unsubscribe();
        sub.unsubscribe();
        assert_eq!(bus.subscriber_count("x"), 0);

        let mut orphan = bus.subscribe("x");
        drop(bus);
        orphan.unsubscribe();
        assert!(orphan.try_recv().is_none());
    }
}
