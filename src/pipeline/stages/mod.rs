//! The individual pipeline stages
//!
//! Every stage exposes a gate predicate over [`EffectParameters`] and an
//! `apply` transform from a borrowed input image to a new image. `apply`
//! returns `None` when an intermediate could not be produced; the sequencer
//! recovers by keeping the running image and moving on.

pub mod aberration;
pub mod blur;
pub mod color;
pub mod grain;
pub mod noise;
pub mod sepia;
pub mod sparkle;
pub mod vignette;

use crate::params::EffectParameters;

/// Per-invocation inputs shared by all stages
#[derive(Debug, Clone, Copy)]
pub struct StageContext<'a> {
    /// Parameter snapshot for this invocation
    pub params: &'a EffectParameters,
    /// Caller-owned seed scalar; the engine never advances it
    pub seed: f64,
}
