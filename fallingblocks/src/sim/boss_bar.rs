//! A countdown bar that reports its changes to the log.

use fallingblocks_core::CountdownBarState;
use fallingblocks_core::host::CountdownBar;
use uuid::Uuid;

/// Wraps a [`CountdownBarState`] and logs what a connected client would see change.
#[derive(Debug, Default)]
pub struct LoggedBossBar {
    state: CountdownBarState,
}

impl LoggedBossBar {
    /// A hidden, empty bar.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The wrapped bar.
    #[must_use]
    pub fn state(&self) -> &CountdownBarState {
        &self.state
    }
}

impl CountdownBar for LoggedBossBar {
    fn set_visible(&mut self, visible: bool) {
        if visible != self.state.visible {
            if visible {
                log::info!("Countdown bar shown");
            } else {
                log::debug!("Countdown bar hidden");
            }
        }
        self.state.set_visible(visible);
    }

    fn set_progress(&mut self, fraction: f32) {
        self.state.set_progress(fraction);
    }

    fn set_label(&mut self, label: &str) {
        if label != self.state.label {
            log::info!("Blocks fall in {label}s");
        }
        self.state.set_label(label);
    }

    fn subscribe(&mut self, observer: Uuid) {
        if !self.state.is_subscribed(observer) {
            log::debug!("{observer} now sees the countdown bar");
        }
        self.state.subscribe(observer);
    }

    fn unsubscribe(&mut self, observer: Uuid) {
        self.state.unsubscribe(observer);
    }

    fn is_subscribed(&self, observer: Uuid) -> bool {
        self.state.is_subscribed(observer)
    }

    fn unsubscribe_all(&mut self) {
        self.state.unsubscribe_all();
    }
}
