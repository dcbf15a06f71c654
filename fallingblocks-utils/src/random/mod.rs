//! Seedable random sources.
//!
//! Event timing in the core draws from the thread-local generator in `rand`.
//! The sources here are for reproducible things such as generated test terrain.

mod xoroshiro;

pub use xoroshiro::Xoroshiro;

/// A seedable pseudo random source.
pub trait Random {
    /// Splits off an independent source.
    #[must_use]
    fn fork(&mut self) -> Self;

    /// Returns a uniformly distributed `i32`.
    fn next_i32(&mut self) -> i32;

    /// Returns a uniformly distributed value in `0..bound`.
    fn next_i32_bounded(&mut self, bound: i32) -> i32;

    /// Returns a uniformly distributed value in `min..=max`.
    fn next_i32_between(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        min + self.next_i32_bounded(max - min + 1)
    }
}
