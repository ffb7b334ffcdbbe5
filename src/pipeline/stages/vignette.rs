//! Vignette stage: radial darkening toward the corners
//!
//! Intensity is the slider value; the effective radius is twice that, so the
//! darkening both deepens and widens as the slider rises.

use crate::params::EffectParameters;
use crate::pipeline::ops;
use crate::pipeline::stages::StageContext;
use crate::raster::RasterImage;

pub fn enabled(params: &EffectParameters) -> bool {
    params.vignette > 0.0
}

pub fn apply(input: &RasterImage, ctx: &StageContext) -> Option<RasterImage> {
    let intensity = ctx.params.vignette;
    let radius = ctx.params.vignette * 2.0;

    let (w, h) = input.extent();
    if w == 0 || h == 0 {
        return Some(input.clone());
    }
    let cx = (w - 1) as f32 / 2.0;
    let cy = (h - 1) as f32 / 2.0;
    let half_diag = (cx * cx + cy * cy).sqrt().max(1e-6);
    // wider radius flattens the falloff curve, pushing darkening inward
    let falloff = (4.0 - 1.5 * radius).max(1.0);

    Some(ops::map_coords(w, h, move |x, y| {
        let dx = x as f32 - cx;
        let dy = y as f32 - cy;
        let d = (dx * dx + dy * dy).sqrt() / half_diag;
        let gain = (1.0 - intensity * d.powf(falloff)).max(0.0);
        let px = input.pixel(x, y);
        [px[0] * gain, px[1] * gain, px[2] * gain, px[3]]
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(src: &RasterImage, vignette: f32) -> RasterImage {
        let params = EffectParameters {
            vignette,
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
            vignette: 0.1,
            ..Default::default()
        }));
    }

    #[test]
    fn test_corners_darker_than_center() {
        let src = RasterImage::filled(21, 21, [0.8, 0.8, 0.8]);
        let out = run(&src, 0.8);
        let center = out.pixel(10, 10)[0];
        let corner = out.pixel(0, 0)[0];
        assert!(corner < center);
        assert!((center - 0.8).abs() < 1e-4);
    }

    #[test]
    fn test_stronger_slider_darkens_more() {
        let src = RasterImage::filled(21, 21, [0.8, 0.8, 0.8]);
        let soft = run(&src, 0.3);
        let hard = run(&src, 1.0);
        assert!(hard.pixel(0, 0)[0] < soft.pixel(0, 0)[0]);
    }

    #[test]
    fn test_single_pixel_image() {
        let src = RasterImage::filled(1, 1, [0.5, 0.5, 0.5]);
        let out = run(&src, 1.0);
        assert_eq!(out.extent(), (1, 1));
    }
}
