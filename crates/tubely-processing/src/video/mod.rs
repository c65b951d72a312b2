//! Video tooling: geometry probe and fast-start remux

pub mod faststart;
pub mod probe;

pub use faststart::{FfmpegOptimizer, StreamingOptimizer};
pub use probe::{Dimensions, FfprobeInspector, MediaInspector};
