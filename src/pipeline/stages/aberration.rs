//! Chromatic aberration stage
//!
//! Splits the stage input into three single-channel images, shifts red and
//! blue in opposite directions along x, recombines with per-component max
//! compositing, then applies a fixed corrective tone shift to compensate for
//! the brightening the max composite introduces.

use crate::params::EffectParameters;
use crate::pipeline::ops::{self, Channel};
use crate::pipeline::stages::StageContext;
use crate::raster::RasterImage;

/// Tone correction applied after recombination
const CORRECTIVE_BRIGHTNESS: f32 = -0.1;
const CORRECTIVE_CONTRAST: f32 = 1.1;

pub fn enabled(params: &EffectParameters) -> bool {
    params.chromatic_aberration > 0.0
}

pub fn apply(input: &RasterImage, ctx: &StageContext) -> Option<RasterImage> {
    let offset = ctx.params.chromatic_aberration.round() as i32;

    // All three channels derive from the same pre-stage image.
    let red = ops::translate(&ops::extract_channel(input, Channel::Red), offset, 0);
    let green = ops::extract_channel(input, Channel::Green);
    let blue = ops::translate(&ops::extract_channel(input, Channel::Blue), -offset, 0);

    let red_green = ops::max_composite(&red, &green)?;
    let combined = ops::max_composite(&blue, &red_green)?;

    Some(ops::color_controls(
        &combined,
        CORRECTIVE_BRIGHTNESS,
        CORRECTIVE_CONTRAST,
        1.0,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(params: &EffectParameters) -> StageContext<'_> {
        StageContext { params, seed: 0.0 }
    }

    #[test]
    fn test_gate() {
        assert!(!enabled(&EffectParameters::default()));
        assert!(enabled(&EffectParameters {
            chromatic_aberration: 1.0,
            ..Default::default()
        }));
    }

    #[test]
    fn test_channel_peaks_shift_in_opposite_directions() {
        // White vertical line at x = 16 on black
        let src = RasterImage::from_fn(32, 9, |x, _| {
            if x == 16 {
                [1.0, 1.0, 1.0, 1.0]
            } else {
                [0.0, 0.0, 0.0, 1.0]
            }
        });
        let params = EffectParameters {
            chromatic_aberration: 4.0,
            ..Default::default()
        };
        let out = apply(&src, &ctx(&params)).unwrap();
        assert_eq!(out.extent(), src.extent());

        let peak = |channel: usize| {
            (0..32)
                .max_by(|&a, &b| {
                    out.pixel(a, 4)[channel]
                        .partial_cmp(&out.pixel(b, 4)[channel])
                        .unwrap()
                })
                .unwrap()
        };
        assert_eq!(peak(0), 20); // red moved +4
        assert_eq!(peak(1), 16); // green untouched
        assert_eq!(peak(2), 12); // blue moved -4
    }

    #[test]
    fn test_corrective_shift_applies_on_flat_gray() {
        let src = RasterImage::filled(8, 8, [0.5, 0.5, 0.5]);
        let params = EffectParameters {
            chromatic_aberration: 2.0,
            ..Default::default()
        };
        let out = apply(&src, &ctx(&params)).unwrap();
        // interior pixels: recombined gray, then brightness -0.1 and contrast x1.1
        let expected = (0.5 - 0.1 - 0.5) * 1.1 + 0.5;
        assert!((out.pixel(4, 4)[0] - expected).abs() < 1e-5);
    }

    #[test]
    fn test_extent_preserved() {
        let src = RasterImage::filled(20, 10, [0.4, 0.4, 0.4]);
        let params = EffectParameters {
            chromatic_aberration: 10.0,
            ..Default::default()
        };
        let out = apply(&src, &ctx(&params)).unwrap();
        assert_eq!(out.extent(), (20, 10));
    }
}
