//! Sparkle stage: pixelated highlight accents
//!
//! Builds a softened luminance mask of the brightest regions, pushes a
//! boosted/pixelated/sharpened copy of the stage input through that mask,
//! and screen-blends the accent back over the input. Any missing
//! intermediate aborts the stage as a no-op.

use crate::params::EffectParameters;
use crate::pipeline::ops;
use crate::pipeline::stages::StageContext;
use crate::raster::RasterImage;

/// Fixed highlight boost applied before pixelation
const HIGHLIGHT_CONTRAST: f32 = 1.8;
const HIGHLIGHT_SATURATION: f32 = 1.2;

pub fn enabled(params: &EffectParameters) -> bool {
    params.sparkle > 0.0
}

pub fn apply(input: &RasterImage, ctx: &StageContext) -> Option<RasterImage> {
    let s = ctx.params.sparkle;
    let base = input;

    // 1-2: luminance mask of the highlights, softened at the edges
    let threshold = (1.0 - s * 0.2).max(0.7);
    let mask = ops::luminance_threshold(base, threshold);
    let mask = ops::gaussian_blur(&mask, 2.0 + s * 2.0);

    // 3-5: boosted highlights, pixelated about the image center, sharpened
    let highlights = ops::color_controls(base, s * 0.7, HIGHLIGHT_CONTRAST, HIGHLIGHT_SATURATION);
    let center = (base.width() as f32 / 2.0, base.height() as f32 / 2.0);
    let pixelated = ops::pixelate(&highlights, 10.0 + s * 30.0, center);
    let sharpened = ops::sharpen_luminance(&pixelated, s * 0.5).unwrap_or(pixelated);

    // 6-7: restrict to the mask, then a final screen accent over the base
    let masked = ops::mask_blend(&sharpened, base, &mask)?;
    ops::screen_blend(&masked, base)
}
