//! The per-tick driver that owns the event timer.
//!
//! # Timing
//!
//! The deadline is an absolute tick, not a remaining duration. While no observer
//! is connected the driver does nothing at all, so no deadline check runs and no
//! countdown is shown, but the deadline itself does not move. When someone
//! connects after it has passed, the event fires on the first evaluated tick.

use uuid::Uuid;

use crate::config::FallingBlocksConfig;
use crate::countdown::{CountdownBarState, CountdownPresenter};
use crate::host::{Clock, CountdownBar, Roster, WorldMutation};
use crate::scanner::{RegionScanner, ScanReport};
use crate::schedule::{IntervalScheduler, RadiusPicker};

/// Where the driver is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventPhase {
    /// No event scheduled yet, or the next one is outside the warning window.
    Idle,
    /// The warning countdown is visible.
    CountingDown,
    /// An event is running. Collapses back to `Idle` before `tick` returns.
    Triggering,
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nobody is connected, so nothing was evaluated.
    Skipped,
    /// An event is scheduled outside the warning window.
    Waiting {
        /// Ticks until the event.
        remaining: i64,
    },
    /// The countdown is visible.
    CountingDown {
        /// Ticks until the event.
        remaining: i64,
        /// Whole seconds shown on the bar.
        seconds_left: i64,
    },
    /// The deadline was reached and an event ran.
    Triggered(ScanReport),
}

/// Process-wide timer state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimerState {
    /// Absolute tick of the next event. `None` means it is drawn on the next evaluation.
    pub next_event_tick: Option<u64>,
}

/// Owns the timer and the countdown, and runs falling events when they are due.
///
/// Every entry point takes `&mut self`: there is exactly one writer, the host's
/// tick thread.
pub struct FallingBlocks<B: CountdownBar = CountdownBarState> {
    timer: TimerState,
    phase: EventPhase,
    interval: IntervalScheduler,
    radius: RadiusPicker,
    countdown: CountdownPresenter<B>,
}

impl FallingBlocks<CountdownBarState> {
    /// A driver with an in-memory countdown bar.
    #[must_use]
    pub fn new(config: &FallingBlocksConfig) -> Self {
        Self::with_bar(config, CountdownBarState::new())
    }
}

impl<B: CountdownBar> FallingBlocks<B> {
    /// A driver that renders its countdown on `bar`.
    #[must_use]
    pub fn with_bar(config: &FallingBlocksConfig, bar: B) -> Self {
        Self::from_parts(
            IntervalScheduler::from_config(config),
            RadiusPicker::from_config(config),
            CountdownPresenter::from_config(bar, config),
        )
    }

    /// A driver assembled from prebuilt pickers and presenter.
    #[must_use]
    pub fn from_parts(
        interval: IntervalScheduler,
        radius: RadiusPicker,
        countdown: CountdownPresenter<B>,
    ) -> Self {
        Self {
            timer: TimerState::default(),
            phase: EventPhase::Idle,
            interval,
            radius,
            countdown,
        }
    }

    /// A copy of the timer state.
    #[must_use]
    pub fn timer(&self) -> TimerState {
        self.timer
    }

    /// Absolute tick of the next event, if one is scheduled.
    #[must_use]
    pub fn next_event_tick(&self) -> Option<u64> {
        self.timer.next_event_tick
    }

    /// Where the driver is in its cycle.
    #[must_use]
    pub fn phase(&self) -> EventPhase {
        self.phase
    }

    /// The bar the countdown is drawn on.
    #[must_use]
    pub fn countdown_bar(&self) -> &B {
        self.countdown.bar()
    }

    /// Mutable access to the countdown bar.
    pub fn countdown_bar_mut(&mut self) -> &mut B {
        self.countdown.bar_mut()
    }

    /// Evaluates one host tick.
    pub fn tick<C, R, W>(&mut self, clock: &C, roster: &R, world: &mut W) -> TickOutcome
    where
        C: Clock + ?Sized,
        R: Roster + ?Sized,
        W: WorldMutation + ?Sized,
    {
        if roster.observer_count() == 0 {
            return TickOutcome::Skipped;
        }

        let now = clock.current_tick();
        let next_event_tick = match self.timer.next_event_tick {
            Some(tick) => tick,
            None => self.schedule_next(now),
        };

        let observers = roster.connected_observers();
        let seconds_left = self.countdown.update(now, next_event_tick, &observers);
        self.phase = if seconds_left.is_some() {
            EventPhase::CountingDown
        } else {
            EventPhase::Idle
        };

        if now >= next_event_tick {
            self.phase = EventPhase::Triggering;
            let radius = self.radius.next_radius();
            let report = RegionScanner::trigger_event(&observers, radius, world);
            log::info!(
                "Falling event at tick {now}: radius {}, {} observer(s), {} voxel(s) dropped",
                report.radius,
                report.observers,
                report.converted
            );
            self.schedule_next(now);
            self.phase = EventPhase::Idle;
            return TickOutcome::Triggered(report);
        }

        let remaining = CountdownPresenter::<B>::remaining(now, next_event_tick);
        match seconds_left {
            Some(seconds_left) => TickOutcome::CountingDown {
                remaining,
                seconds_left,
            },
            None => TickOutcome::Waiting { remaining },
        }
    }

    fn schedule_next(&mut self, now: u64) -> u64 {
        let interval = self.interval.next_interval();
        let next = now + interval;
        self.timer.next_event_tick = Some(next);
        log::debug!("Next falling event at tick {next} (in {interval} ticks)");
        next
    }

    /// Forgets the scheduled event and clears the countdown.
    pub fn reset(&mut self) {
        self.timer = TimerState::default();
        self.phase = EventPhase::Idle;
        self.countdown.reset();
        log::debug!("Falling event timer reset");
    }

    /// Host hook for server start. Same as [`FallingBlocks::reset`].
    pub fn on_session_start(&mut self) {
        self.reset();
    }

    /// Host hook for server stop. Same as [`FallingBlocks::reset`].
    pub fn on_session_stop(&mut self) {
        self.reset();
    }

    /// Shows a running countdown to a joining observer right away.
    pub fn on_observer_join<C: Clock + ?Sized>(&mut self, clock: &C, observer: Uuid) {
        self.countdown
            .on_observer_join(observer, clock.current_tick(), self.timer.next_event_tick);
    }

    /// Drops a leaving observer from the countdown bar.
    pub fn on_observer_leave(&mut self, observer: Uuid) {
        self.countdown.on_observer_leave(observer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{FixedObserver, ManualClock, MemoryWorld};
    use crate::voxel::VoxelState;
    use fallingblocks_utils::BlockPos;

    fn fixed(interval: u64, radius: i32) -> FallingBlocks {
        FallingBlocks::from_parts(
            IntervalScheduler::new(interval, interval),
            RadiusPicker::new(radius, radius),
            CountdownPresenter::new(CountdownBarState::new(), 100, 20),
        )
    }

    #[test]
    fn no_observers_skips_everything() {
        let mut driver = fixed(600, 3);
        let clock = ManualClock::at(5000);
        let roster: Vec<FixedObserver> = Vec::new();
        let mut world = MemoryWorld::new();

        assert_eq!(driver.tick(&clock, &roster, &mut world), TickOutcome::Skipped);
        assert_eq!(driver.next_event_tick(), None);
    }

    #[test]
    fn first_tick_schedules_from_now() {
        let mut driver = fixed(600, 3);
        let clock = ManualClock::at(1000);
        let roster = vec![FixedObserver::at(0.0, 64.0, 0.0)];
        let mut world = MemoryWorld::new();

        let outcome = driver.tick(&clock, &roster, &mut world);

        assert_eq!(outcome, TickOutcome::Waiting { remaining: 600 });
        assert_eq!(driver.next_event_tick(), Some(1600));
        assert_eq!(driver.phase(), EventPhase::Idle);
    }

    #[test]
    fn default_config_draws_interval_in_bounds() {
        let mut driver = FallingBlocks::new(&FallingBlocksConfig::default());
        let clock = ManualClock::at(0);
        let roster = vec![FixedObserver::at(0.0, 0.0, 0.0)];
        let mut world = MemoryWorld::new();

        driver.tick(&clock, &roster, &mut world);

        let next = driver.next_event_tick().expect("scheduled");
        assert!((600..=2400).contains(&next));
    }

    #[test]
    fn countdown_then_trigger_then_reschedule() {
        let mut driver = fixed(600, 2);
        let mut clock = ManualClock::at(0);
        let observer = FixedObserver::at(0.5, 10.0, 0.5);
        let roster = vec![observer];
        let mut world = MemoryWorld::new();
        world.set(BlockPos::new(1, 11, 0), VoxelState::vanilla("sand"));

        driver.tick(&clock, &roster, &mut world);
        assert_eq!(driver.next_event_tick(), Some(600));

        clock.tick = 560;
        let outcome = driver.tick(&clock, &roster, &mut world);
        assert_eq!(
            outcome,
            TickOutcome::CountingDown {
                remaining: 40,
                seconds_left: 2
            }
        );
        assert_eq!(driver.phase(), EventPhase::CountingDown);
        assert!(driver.countdown_bar().visible);
        assert_eq!(driver.countdown_bar().label, "2");
        assert!(driver.countdown_bar().is_subscribed(observer.id));

        clock.tick = 600;
        let outcome = driver.tick(&clock, &roster, &mut world);
        let TickOutcome::Triggered(report) = outcome else {
            panic!("expected a trigger, got {outcome:?}");
        };
        assert_eq!(report.radius, 2);
        assert_eq!(report.converted, 1);
        assert_eq!(world.falling().len(), 1);
        assert_eq!(driver.next_event_tick(), Some(1200));
        assert_eq!(driver.phase(), EventPhase::Idle);

        clock.advance(1);
        let outcome = driver.tick(&clock, &roster, &mut world);
        assert_eq!(outcome, TickOutcome::Waiting { remaining: 599 });
        assert!(!driver.countdown_bar().visible);
    }

    #[test]
    fn overdue_deadline_fires_once_observers_return() {
        let mut driver = fixed(600, 1);
        let mut clock = ManualClock::at(0);
        let roster = vec![FixedObserver::at(0.0, 0.0, 0.0)];
        let empty: Vec<FixedObserver> = Vec::new();
        let mut world = MemoryWorld::new();

        driver.tick(&clock, &roster, &mut world);
        clock.tick = 5000;
        assert_eq!(driver.tick(&clock, &empty, &mut world), TickOutcome::Skipped);
        assert_eq!(driver.next_event_tick(), Some(600));

        assert!(matches!(
            driver.tick(&clock, &roster, &mut world),
            TickOutcome::Triggered(_)
        ));
        assert_eq!(driver.next_event_tick(), Some(5600));
    }

    #[test]
    fn session_reset_draws_fresh_interval() {
        let resets: [fn(&mut FallingBlocks); 2] =
            [FallingBlocks::on_session_start, FallingBlocks::on_session_stop];
        for reset in resets {
            let mut driver = fixed(600, 1);
            let mut clock = ManualClock::at(0);
            let observer = FixedObserver::at(0.0, 0.0, 0.0);
            let roster = vec![observer];
            let mut world = MemoryWorld::new();

            driver.tick(&clock, &roster, &mut world);
            clock.tick = 550;
            driver.tick(&clock, &roster, &mut world);
            assert!(driver.countdown_bar().visible);

            reset(&mut driver);
            assert_eq!(driver.timer(), TimerState::default());
            assert!(!driver.countdown_bar().visible);
            assert!((driver.countdown_bar().fraction - 1.0).abs() < f32::EPSILON);
            assert!(driver.countdown_bar().subscribers().is_empty());

            clock.tick = 700;
            let outcome = driver.tick(&clock, &roster, &mut world);
            assert_eq!(outcome, TickOutcome::Waiting { remaining: 600 });
            assert_eq!(driver.next_event_tick(), Some(1300));
        }
    }

    #[test]
    fn join_during_countdown_subscribes() {
        let mut driver = fixed(600, 1);
        let mut clock = ManualClock::at(0);
        let roster = vec![FixedObserver::at(0.0, 0.0, 0.0)];
        let mut world = MemoryWorld::new();
        driver.tick(&clock, &roster, &mut world);

        let early = Uuid::new_v4();
        clock.tick = 450;
        driver.on_observer_join(&clock, early);
        assert!(!driver.countdown_bar().is_subscribed(early));

        let late = Uuid::new_v4();
        clock.tick = 520;
        driver.on_observer_join(&clock, late);
        assert!(driver.countdown_bar().is_subscribed(late));

        driver.on_observer_leave(late);
        assert!(!driver.countdown_bar().is_subscribed(late));
    }

    #[test]
    fn join_before_first_schedule_does_nothing() {
        let mut driver = fixed(600, 1);
        let id = Uuid::new_v4();
        driver.on_observer_join(&ManualClock::at(0), id);
        assert!(!driver.countdown_bar().is_subscribed(id));
    }
}
