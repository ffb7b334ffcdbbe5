//! Color and tone stage: brightness/contrast/saturation plus white balance
//!
//! The one unconditional stage. Brightness, contrast and saturation have no
//! cheap skip and temperature/tint always ride along with them, so the stage
//! executes even at identity defaults.

use crate::params::EffectParameters;
use crate::pipeline::ops;
use crate::pipeline::stages::StageContext;
use crate::raster::RasterImage;

pub fn enabled(_params: &EffectParameters) -> bool {
    true
}

pub fn apply(input: &RasterImage, ctx: &StageContext) -> Option<RasterImage> {
    let p = ctx.params;
    let toned = ops::color_controls(input, p.brightness, p.contrast, p.saturation);
    Some(ops::white_balance(&toned, p.temperature, p.tint))
}
