//! The warning countdown shown before an event.

use rustc_hash::FxHashSet;
use uuid::Uuid;

use crate::config::FallingBlocksConfig;
use crate::host::{CountdownBar, Observer};

/// In-memory countdown bar.
#[derive(Debug, Clone, PartialEq)]
pub struct CountdownBarState {
    /// Whether the bar is drawn at all.
    pub visible: bool,
    /// Fill fraction in `[0, 1]`.
    pub fraction: f32,
    /// Text on the bar, the whole seconds left.
    pub label: String,
    subscribers: FxHashSet<Uuid>,
}

impl CountdownBarState {
    /// A hidden, full bar labelled `N/A`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently subscribed observers.
    #[must_use]
    pub fn subscribers(&self) -> &FxHashSet<Uuid> {
        &self.subscribers
    }
}

impl Default for CountdownBarState {
    fn default() -> Self {
        Self {
            visible: false,
            fraction: 1.0,
            label: "N/A".to_string(),
            subscribers: FxHashSet::default(),
        }
    }
}

impl CountdownBar for CountdownBarState {
    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn set_progress(&mut self, fraction: f32) {
        self.fraction = fraction;
    }

    fn set_label(&mut self, label: &str) {
        label.clone_into(&mut self.label);
    }

    fn subscribe(&mut self, observer: Uuid) {
        self.subscribers.insert(observer);
    }

    fn unsubscribe(&mut self, observer: Uuid) {
        self.subscribers.remove(&observer);
    }

    fn is_subscribed(&self, observer: Uuid) -> bool {
        self.subscribers.contains(&observer)
    }

    fn unsubscribe_all(&mut self) {
        self.subscribers.clear();
    }
}

/// Drives a [`CountdownBar`] from the time left until the next event.
pub struct CountdownPresenter<B: CountdownBar = CountdownBarState> {
    bar: B,
    warning_ticks: u64,
    ticks_per_second: u64,
}

impl<B: CountdownBar> CountdownPresenter<B> {
    /// `warning_ticks` and `ticks_per_second` must both be non-zero.
    #[must_use]
    pub const fn new(bar: B, warning_ticks: u64, ticks_per_second: u64) -> Self {
        Self {
            bar,
            warning_ticks,
            ticks_per_second,
        }
    }

    /// A presenter using the configured warning window and tick rate.
    #[must_use]
    pub fn from_config(bar: B, config: &FallingBlocksConfig) -> Self {
        Self::new(bar, config.warning_ticks(), config.ticks_per_second())
    }

    /// The driven bar.
    #[must_use]
    pub fn bar(&self) -> &B {
        &self.bar
    }

    /// Mutable access to the driven bar.
    pub fn bar_mut(&mut self) -> &mut B {
        &mut self.bar
    }

    /// Ticks from `now` until `next_event_tick`. Negative once the deadline has passed.
    #[must_use]
    pub fn remaining(now: u64, next_event_tick: u64) -> i64 {
        next_event_tick as i64 - now as i64
    }

    /// Whether `remaining` ticks falls inside the warning window.
    #[must_use]
    pub fn in_warning_window(&self, remaining: i64) -> bool {
        remaining <= self.warning_ticks as i64
    }

    /// Whole seconds left, rounded up.
    #[must_use]
    pub fn seconds_left(&self, remaining: i64) -> i64 {
        let tps = self.ticks_per_second as i64;
        (remaining + tps - 1) / tps
    }

    /// Refreshes the bar for the current tick.
    ///
    /// Inside the warning window the bar is shown, filled with the fraction of the
    /// window still left, labelled with the seconds left, and every connected
    /// observer is subscribed. Outside it the bar is hidden and subscriptions are
    /// left alone. Returns the seconds left when the bar is shown.
    pub fn update<O: Observer>(
        &mut self,
        now: u64,
        next_event_tick: u64,
        observers: &[O],
    ) -> Option<i64> {
        let remaining = Self::remaining(now, next_event_tick);

        if !self.in_warning_window(remaining) {
            self.bar.set_visible(false);
            return None;
        }

        self.bar.set_visible(true);

        let fraction = (remaining as f32 / self.warning_ticks as f32).clamp(0.0, 1.0);
        let seconds_left = self.seconds_left(remaining);

        self.bar.set_label(&seconds_left.to_string());
        self.bar.set_progress(fraction);

        for observer in observers {
            let id = observer.id();
            if !self.bar.is_subscribed(id) {
                self.bar.subscribe(id);
            }
        }

        Some(seconds_left)
    }

    /// Subscribes a joining observer when a countdown is already running.
    pub fn on_observer_join(&mut self, observer: Uuid, now: u64, next_event_tick: Option<u64>) {
        let Some(next_event_tick) = next_event_tick else {
            return;
        };
        if self.in_warning_window(Self::remaining(now, next_event_tick)) {
            self.bar.subscribe(observer);
        }
    }

    /// Unsubscribes a leaving observer.
    pub fn on_observer_leave(&mut self, observer: Uuid) {
        self.bar.unsubscribe(observer);
    }

    /// Hides the bar, refills it and drops every subscriber.
    pub fn reset(&mut self) {
        self.bar.set_progress(1.0);
        self.bar.set_visible(false);
        self.bar.unsubscribe_all();
    }
}
