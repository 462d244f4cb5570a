//! Aspect-ratio bucketing.
//!
//! - **ratio**: rounding policy and string keys
//! - **index**: the append-only [`BucketIndex`] accumulator
//! - **assign**: [`BucketAssigner`], which files one image per call

pub mod assign;
pub mod index;
pub mod ratio;

pub use assign::{assign_to_bucket, BucketAssigner};
pub use index::BucketIndex;
pub use ratio::{aspect_ratio, round_to, AspectKey, DEFAULT_ROUNDING, MAX_ROUNDING};
