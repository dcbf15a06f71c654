//! # Falling Blocks Utils
//!
//! Shared value types for the falling blocks workspace: positions, vectors,
//! namespaced identifiers and a seedable random source.

pub mod math;
pub mod random;
pub mod types;

pub use types::{BlockPos, ResourceLocation};
