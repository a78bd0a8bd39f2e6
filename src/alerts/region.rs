//! Consumer side of the alert bus: the list of alerts one mounted region shows.
//!
//! [`AlertRegion`] is a plain state machine driven by explicit instants, so the
//! rendering rules can be tested without a runtime. [`AlertRegion::spawn`]
//! drives it from a bus subscription on Tokio time.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::{sleep_until, Instant};
use tracing::debug;

use super::bus::{Alert, AlertSubscription};

/// Delays applied by a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionTimings {
    /// Lifetime of an auto-closing alert.
    pub auto_close: Duration,
    /// Time between the fade mark and removal.
    pub fade: Duration,
}

impl Default for RegionTimings {
    fn default() -> Self {
        Self {
            auto_close: Duration::from_millis(3000),
            fade: Duration::from_millis(250),
        }
    }
}

/// An alert as currently shown. `id` is local to the region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveAlert {
    pub id: u64,
    pub alert: Alert,
    pub faded: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerKind {
    AutoClose,
    Splice,
}

#[derive(Debug, Clone, Copy)]
struct Timer {
    at: Instant,
    id: u64,
    kind: TimerKind,
}

pub struct AlertRegion {
    fade: bool,
    timings: RegionTimings,
    alerts: Vec<ActiveAlert>,
    timers: Vec<Timer>,
    next_id: u64,
}

impl AlertRegion {
    pub fn new(fade: bool, timings: RegionTimings) -> Self {
        Self {
            fade,
            timings,
            alerts: Vec::new(),
            timers: Vec::new(),
            next_id: 0,
        }
    }

    /// Alerts in publish order.
    pub fn alerts(&self) -> &[ActiveAlert] {
        &self.alerts
    }

    pub fn receive(&mut self, alert: Alert, now: Instant) {
        if alert.is_tombstone() {
            self.alerts.retain(|active| active.alert.keep_after_route_change);
            for active in &mut self.alerts {
                active.alert.keep_after_route_change = false;
            }
            self.timers
                .retain(|timer| self.alerts.iter().any(|active| active.id == timer.id));
            debug!(kept = self.alerts.len(), "Alert region cleared");
            return;
        }

        self.next_id += 1;
        let id = self.next_id;
        if alert.auto_close {
            self.timers.push(Timer {
                at: now + self.timings.auto_close,
                id,
                kind: TimerKind::AutoClose,
            });
        }
        self.alerts.push(ActiveAlert {
            id,
            alert,
            faded: false,
        });
    }

    /// User closed the alert. Same path as auto-close.
    pub fn dismiss(&mut self, id: u64, now: Instant) {
        self.remove(id, now);
    }

    fn remove(&mut self, id: u64, now: Instant) {
        if !self.fade {
            self.alerts.retain(|active| active.id != id);
            return;
        }
        let Some(active) = self.alerts.iter_mut().find(|active| active.id == id) else {
            return;
        };
        if active.faded {
            return;
        }
        active.faded = true;
        self.timers.push(Timer {
            at: now + self.timings.fade,
            id,
            kind: TimerKind::Splice,
        });
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.iter().map(|timer| timer.at).min()
    }

    /// Fires every timer due at or before `now`, earliest first.
    pub fn advance(&mut self, now: Instant) {
        loop {
            let due = self
                .timers
                .iter()
                .enumerate()
                .filter(|(_, timer)| timer.at <= now)
                .min_by_key(|(_, timer)| timer.at)
                .map(|(index, _)| index);
            let Some(index) = due else {
                break;
            };
            let timer = self.timers.swap_remove(index);
            match timer.kind {
                TimerKind::AutoClose => self.remove(timer.id, timer.at),
                TimerKind::Splice => self.alerts.retain(|active| active.id != timer.id),
            }
        }
    }

    /// Drives the region from `subscription` until the returned handle is dropped.
    pub fn spawn(self, subscription: AlertSubscription) -> AlertRegionHandle {
        let (commands, command_rx) = mpsc::channel(16);
        let (state_tx, state) = watch::channel(Vec::new());
        tokio::spawn(self.run(subscription, command_rx, state_tx));
        AlertRegionHandle { commands, state }
    }

    async fn run(
        mut self,
        mut subscription: AlertSubscription,
        mut commands: mpsc::Receiver<RegionCommand>,
        state: watch::Sender<Vec<ActiveAlert>>,
    ) {
        debug!(channel = subscription.channel(), "Alert region mounted");
        loop {
            let deadline = self.next_deadline();
            tokio::select! {
                alert = subscription.recv() => match alert {
                    Some(alert) => self.receive(alert, Instant::now()),
                    None => break,
                },
                command = commands.recv() => match command {
                    Some(RegionCommand::Dismiss(id)) => self.dismiss(id, Instant::now()),
                    None => break,
                },
                _ = sleep_until_deadline(deadline) => self.advance(Instant::now()),
            }
            state.send_replace(self.alerts.clone());
        }
        subscription.unsubscribe();
        debug!("Alert region unmounted");
    }
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionCommand {
    Dismiss(u64),
}

/// Handle to a spawned region. Dropping it unmounts the region.
pub struct AlertRegionHandle {
    commands: mpsc::Sender<RegionCommand>,
    state: watch::Receiver<Vec<ActiveAlert>>,
}

impl AlertRegionHandle {
    pub fn alerts(&self) -> Vec<ActiveAlert> {
        self.state.borrow().clone()
    }

    pub fn watch(&self) -> watch::Receiver<Vec<ActiveAlert>> {
        self.state.clone()
    }

    pub async fn dismiss(&self, id: u64) {
        let _ = self.commands.send(RegionCommand::Dismiss(id)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::bus::{AlertBus, AlertOptions, Severity};

    fn alert(channel: &str, message: &str) -> Alert {
        Alert::new(Severity::Info, message, AlertOptions::on_channel(channel))
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_auto_close_removes_after_exact_delay() {
        let t0 = Instant::now();
        let mut region = AlertRegion::new(false, RegionTimings::default());
        let mut hi = alert("x", "hi");
        hi.auto_close = true;
        region.receive(hi, t0);

        region.advance(t0 + ms(2999));
        assert_eq!(region.alerts().len(), 1);

        region.advance(t0 + ms(3000));
        assert!(region.alerts().is_empty());
    }

    #[test]
    fn test_clear_keeps_survivors_and_strips_flag() {
        let t0 = Instant::now();
        let mut region = AlertRegion::new(true, RegionTimings::default());
        let mut a = alert("y", "A");
        a.keep_after_route_change = true;
        region.receive(a, t0);
        region.receive(alert("y", "B"), t0);

        region.receive(Alert::tombstone("y"), t0);

        let alerts = region.alerts();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].alert.message.as_deref(), Some("A"));
        assert!(!alerts[0].alert.keep_after_route_change);

        region.receive(Alert::tombstone("y"), t0);
        assert!(region.alerts().is_empty());
    }

    #[test]
    fn test_fade_dismissal_is_two_phase() {
        let t0 = Instant::now();
        let mut region = AlertRegion::new(true, RegionTimings::default());
        region.receive(alert("x", "bye"), t0);
        let id = region.alerts()[0].id;

        region.dismiss(id, t0);
        assert_eq!(region.alerts().len(), 1);
        assert!(region.alerts()[0].faded);

        region.advance(t0 + ms(249));
        assert_eq!(region.alerts().len(), 1);

        region.advance(t0 + ms(250));
        assert!(region.alerts().is_empty());
    }

    #[test]
    fn test_auto_close_with_fade_chains_both_delays() {
        let t0 = Instant::now();
        let mut region = AlertRegion::new(true, RegionTimings::default());
        let mut hi = alert("x", "hi");
        hi.auto_close = true;
        region.receive(hi, t0);

        region.advance(t0 + ms(3000));
        assert!(region.alerts()[0].faded);

        region.advance(t0 + ms(3250));
        assert!(region.alerts().is_empty());
    }

    #[test]
    fn test_dismiss_after_fade_does_not_reschedule() {
        let t0 = Instant::now();
        let mut region = AlertRegion::new(true, RegionTimings::default());
        region.receive(alert("x", "once"), t0);
        let id = region.alerts()[0].id;

        region.dismiss(id, t0);
        region.dismiss(id, t0 + ms(200));
        region.advance(t0 + ms(250));

        assert!(region.alerts().is_empty());
        assert!(region.next_deadline().is_none());
    }

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawned_region_follows_tokio_time() {
        let bus = AlertBus::new();
        let region = AlertRegion::new(false, RegionTimings::default()).spawn(bus.subscribe("x"));

        bus.info("hi", AlertOptions::on_channel("x").auto_close());
        settle().await;
        assert_eq!(region.alerts().len(), 1);

        tokio::time::advance(ms(2999)).await;
        settle().await;
        assert_eq!(region.alerts().len(), 1);

        tokio::time::advance(ms(1)).await;
        settle().await;
        assert!(region.alerts().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawned_region_dismiss_with_fade() {
        let bus = AlertBus::new();
        let region = AlertRegion::new(true, RegionTimings::default()).spawn(bus.subscribe("x"));

        bus.error("failed", AlertOptions::on_channel("x"));
        settle().await;
        let id = region.alerts()[0].id;

        region.dismiss(id).await;
        settle().await;
        assert!(region.alerts()[0].faded);

        tokio::time::advance(ms(250)).await;
        settle().await;
        assert!(region.alerts().is_empty());
    }
}
