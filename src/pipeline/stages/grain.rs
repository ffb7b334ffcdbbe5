//! Film grain stage
//!
//! Full-frame uniform noise composited source-over the running image, with
//! RGB magnitude scaled by the `grain` slider. The noise is stage-local and
//! unseeded: unlike the seeded noise stages it draws from a fresh generator
//! on every invocation, an asymmetry the original look depends on.

use rand::{rngs::SmallRng, SeedableRng};

use crate::params::EffectParameters;
use crate::pipeline::{noise, ops};
use crate::pipeline::stages::StageContext;
use crate::raster::RasterImage;

pub fn enabled(params: &EffectParameters) -> bool {
    params.grain > 0.0
}

pub fn apply(input: &RasterImage, ctx: &StageContext) -> Option<RasterImage> {
    let strength = ctx.params.grain;
    let mut rng = SmallRng::from_entropy();
    let raw = noise::rgba_noise(input.width(), input.height(), &mut rng);
    let grain = ops::map_pixels(&raw, |px| {
        [px[0] * strength, px[1] * strength, px[2] * strength, px[3]]
    });
    ops::source_over(&grain, input)
}
