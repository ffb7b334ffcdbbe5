//! # Film-Look
//!
//! A deterministic "film look" filter pipeline for still images and numbered
//! frame sequences.
//!
//! Fourteen scalar sliders drive a fixed chain of stages (color and tone,
//! chromatic aberration, blur, grain, vignette, sepia, sparkle, and three
//! noise overlays). Processing is a pure function of the input image, the
//! parameter snapshot, and a caller-owned seed: the same three inputs always
//! produce the same output, and the output always has the input's extent.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use film_look::{
//!     config::Config,
//!     session::Session,
//! };
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut config = Config::default();
//!     config.params.sepia = 0.6;
//!     config.params.vignette = 0.4;
//!
//!     let mut session = Session::new(&config)?;
//!     session.process_still("photo.png", "photo_film.png")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! The library is organized into several key modules:
//!
//! - [`pipeline`] - The stage table, sequencer, and per-stage image math
//! - [`raster`] - The float RGBA working format
//! - [`params`] - The slider snapshot and its declared ranges
//! - [`session`] - Still/sequence front end, seed ownership, file I/O
//! - [`config`] - Configuration management
//!
//! ## Driving the engine directly
//!
//! Sessions own the seed protocol; callers that want full control can run
//! the [`Pipeline`](pipeline::Pipeline) themselves with any seed:
//!
//! ```rust,no_run
//! use film_look::{params::EffectParameters, pipeline::Pipeline, raster::RasterImage};
//!
//! fn render(input: &RasterImage, seed: f64) -> RasterImage {
//!     let params = EffectParameters {
//!         grain: 0.3,
//!         color_noise: 0.5,
//!         ..Default::default()
//!     };
//!     Pipeline::run(input, &params, seed)
//! }
//! ```

pub mod config;
pub mod error;
pub mod params;
pub mod pipeline;
pub mod raster;
pub mod session;

// Re-export commonly used types for convenience
pub use crate::{
    config::Config,
    error::{FilmLookError, Result},
    params::EffectParameters,
    pipeline::Pipeline,
    raster::RasterImage,
    session::Session,
};
