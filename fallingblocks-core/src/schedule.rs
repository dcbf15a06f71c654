//! Random draws for event timing and scan size.
//!
//! Both pickers draw from the thread-local generator on every call and keep no
//! state between calls. Bounds with `max <= min` always yield `min`.

use crate::config::FallingBlocksConfig;

/// Picks the wait, in ticks, before the next event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalScheduler {
    min_ticks: u64,
    max_ticks: u64,
}

impl IntervalScheduler {
    /// Draws waits from `min_ticks..=max_ticks`.
    #[must_use]
    pub const fn new(min_ticks: u64, max_ticks: u64) -> Self {
        Self {
            min_ticks,
            max_ticks,
        }
    }

    /// Uses the configured interval bounds.
    #[must_use]
    pub fn from_config(config: &FallingBlocksConfig) -> Self {
        Self::new(config.interval_min_ticks(), config.interval_max_ticks())
    }

    /// A wait uniformly drawn from `min..=max`.
    #[must_use]
    pub fn next_interval(&self) -> u64 {
        if self.max_ticks <= self.min_ticks {
            return self.min_ticks;
        }
        rand::random_range(self.min_ticks..=self.max_ticks)
    }
}

/// Picks the scan radius for an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RadiusPicker {
    min: i32,
    max: i32,
}

impl RadiusPicker {
    /// Draws radii from `min..=max`.
    #[must_use]
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// Uses the configured radius bounds.
    #[must_use]
    pub fn from_config(config: &FallingBlocksConfig) -> Self {
        Self::new(config.radius_min, config.radius_max)
    }

    /// A radius uniformly drawn from `min..=max`.
    #[must_use]
    pub fn next_radius(&self) -> i32 {
        if self.max <= self.min {
            return self.min;
        }
        rand::random_range(self.min..=self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIALS: usize = 20_000;

    #[test]
    fn interval_covers_both_bounds() {
        let scheduler = IntervalScheduler::new(600, 610);
        let mut seen = [false; 11];
        for _ in 0..TRIALS {
            let interval = scheduler.next_interval();
            assert!((600..=610).contains(&interval));
            seen[(interval - 600) as usize] = true;
        }
        assert!(seen.iter().all(|s| *s), "every value drawn: {seen:?}");
    }

    #[test]
    fn default_interval_in_range() {
        let scheduler = IntervalScheduler::from_config(&FallingBlocksConfig::default());
        for _ in 0..TRIALS {
            let interval = scheduler.next_interval();
            assert!((600..=2400).contains(&interval));
        }
    }

    #[test]
    fn degenerate_interval_returns_min() {
        assert_eq!(IntervalScheduler::new(600, 600).next_interval(), 600);
        for _ in 0..100 {
            assert_eq!(IntervalScheduler::new(600, 20).next_interval(), 600);
        }
    }

    #[test]
    fn radius_covers_default_bounds() {
        let picker = RadiusPicker::from_config(&FallingBlocksConfig::default());
        let mut seen_min = false;
        let mut seen_max = false;
        for _ in 0..TRIALS {
            let radius = picker.next_radius();
            assert!((9..=15).contains(&radius));
            seen_min |= radius == 9;
            seen_max |= radius == 15;
        }
        assert!(seen_min && seen_max);
    }

    #[test]
    fn degenerate_radius_returns_min() {
        assert_eq!(RadiusPicker::new(12, 12).next_radius(), 12);
        assert_eq!(RadiusPicker::new(12, 3).next_radius(), 12);
    }
}
