//! # Filter Pipeline Engine
//!
//! The ordered chain of image transforms behind the film look. The engine is
//! a pure function of `(image, params, seed)`: the caller owns the seed and
//! all concurrency; the engine owns stage order, gating, compositing and the
//! numeric contracts of every transform.

pub mod engine;
pub mod noise;
pub mod ops;
pub mod stages;

// Re-exports for convenience
pub use engine::{Pipeline, StageDescriptor, STAGES};
pub use stages::StageContext;
