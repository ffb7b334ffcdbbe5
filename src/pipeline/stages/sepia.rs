//! Sepia tone stage
//!
//! The standard sepia matrix, mixed with the source color by the slider
//! value so intensity 0 would be the identity (the gate skips it anyway).

use crate::params::EffectParameters;
use crate::pipeline::ops;
use crate::pipeline::stages::StageContext;
use crate::raster::RasterImage;

const SEPIA: [[f32; 3]; 3] = [
    [0.393, 0.769, 0.189],
    [0.349, 0.686, 0.168],
    [0.272, 0.534, 0.131],
];

pub fn enabled(params: &EffectParameters) -> bool {
    params.sepia > 0.0
}

pub fn apply(input: &RasterImage, ctx: &StageContext) -> Option<RasterImage> {
    let intensity = ctx.params.sepia;
    Some(ops::map_pixels(input, |px| {
        let mut out = [0.0, 0.0, 0.0, px[3]];
        for c in 0..3 {
            let toned =
                SEPIA[c][0] * px[0] + SEPIA[c][1] * px[1] + SEPIA[c][2] * px[2];
            out[c] = (px[c] + (toned - px[c]) * intensity).clamp(0.0, 1.0);
        }
        out
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(src: &RasterImage, sepia: f32) -> RasterImage {
        let params = EffectParameters {
            sepia,
            ..Default::default()
        };
        let ctx = StageContext {
            params: &params,
            seed: 0.0,
        };
        apply(src, &ctx).unwrap()
    }

    #[test]
    fn test_gate() {
        assert!(!enabled(&EffectParameters::default()));
        assert!(enabled(&EffectParameters {
            sepia: 0.5,
            ..Default::default()
        }));
    }

    #[test]
    fn test_full_sepia_is_warm_toned() {
        let src = RasterImage::filled(4, 4, [0.5, 0.5, 0.5]);
        let out = run(&src, 1.0);
        let px = out.pixel(0, 0);
        assert!(px[0] > px[1]);
        assert!(px[1] > px[2]);
    }

    #[test]
    fn test_intensity_scales_the_shift() {
        let src = RasterImage::filled(4, 4, [0.2, 0.5, 0.8]);
        let light = run(&src, 0.2);
        let heavy = run(&src, 1.0);
        let shift = |img: &RasterImage| (img.pixel(0, 0)[0] - 0.2).abs();
        assert!(shift(&heavy) > shift(&light));
    }
}
