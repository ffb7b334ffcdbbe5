//! Gaussian blur stage
//!
//! Radius comes straight from the `blur` slider. The blur never grows the
//! canvas: samples past the edge read as transparent black, which matches a
//! grown-then-cropped blur and preserves the extent invariant.

use crate::params::EffectParameters;
use crate::pipeline::ops;
use crate::pipeline::stages::StageContext;
use crate::raster::RasterImage;

pub fn enabled(params: &EffectParameters) -> bool {
    params.blur > 0.0
}

pub fn apply(input: &RasterImage, ctx: &StageContext) -> Option<RasterImage> {
    let blurred = ops::gaussian_blur(input, ctx.params.blur);
    debug_assert!(blurred.same_extent(input));
    Some(blurred)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate() {
        assert!(!enabled(&EffectParameters::default()));
        assert!(enabled(&EffectParameters {
            blur: 0.5,
            ..Default::default()
        }));
    }

    #[test]
    fn test_extent_invariant_at_max_radius() {
        let src = RasterImage::filled(30, 20, [0.6, 0.6, 0.6]);
        let params = EffectParameters {
            blur: 20.0,
            ..Default::default()
        };
        let ctx = StageContext {
            params: &params,
            seed: 0.0,
        };
        let out = apply(&src, &ctx).unwrap();
        assert_eq!(out.extent(), (30, 20));
    }

    #[test]
    fn test_blur_softens_an_edge() {
        let src = RasterImage::from_fn(40, 8, |x, _| {
            if x < 20 {
                [0.0, 0.0, 0.0, 1.0]
            } else {
                [1.0, 1.0, 1.0, 1.0]
            }
        });
        let params = EffectParameters {
            blur: 3.0,
            ..Default::default()
        };
        let ctx = StageContext {
            params: &params,
            seed: 0.0,
        };
        let out = apply(&src, &ctx).unwrap();
        let just_dark = out.pixel(18, 4)[0];
        assert!(just_dark > 0.0 && just_dark < 0.5);
    }
}
