//! Procedural noise synthesis for the grain, mono, color and dust stages
//!
//! Seeded noise is sampled from an infinite coordinate-addressable field so
//! that identical seeds reproduce identical frames; the seed only ever moves
//! the sampling window, never reshapes the field. Grain is the deliberate
//! exception: it draws from a fresh generator on every invocation.

use rand::{rngs::SmallRng, Rng, SeedableRng};

use crate::pipeline::ops::{map_coords, Channel};
use crate::raster::RasterImage;

/// Static field backing the mono noise stage
pub const MONO_FIELD: NoiseField = NoiseField::new(0x6d6f_6e6f);
/// Static field backing the dust/scratch stage
pub const DUST_FIELD: NoiseField = NoiseField::new(0x6475_7374);
/// Shared field the seeded color-noise dots sample through translation
pub const DOT_FIELD: NoiseField = NoiseField::new(0x646f_7473);

/// An infinite, deterministic uniform noise field
///
/// Every `(x, y, lane)` coordinate maps to an independent value in [0, 1).
/// Translating the sampling window is what makes a consumer seed-dependent.
#[derive(Debug, Clone, Copy)]
pub struct NoiseField {
    salt: u64,
}

impl NoiseField {
    pub const fn new(salt: u64) -> Self {
        Self { salt }
    }

    /// Uniform value in [0, 1) at the given field coordinate
    pub fn sample(&self, x: i64, y: i64, lane: u32) -> f32 {
        let key = (x as u64)
            .wrapping_mul(0x9e37_79b9_7f4a_7c15)
            .wrapping_add((y as u64).wrapping_mul(0xc2b2_ae3d_27d4_eb4f))
            .wrapping_add((lane as u64).wrapping_mul(0x1656_67b1_9e37_79f9))
            ^ self.salt;
        SmallRng::seed_from_u64(key).gen::<f32>()
    }
}

/// Side of the reduced working square: `min(width, height) / 4`, at least 1
pub fn reduced_side(width: u32, height: u32) -> u32 {
    (width.min(height) / 4).max(1)
}

/// Factor expanding the reduced square back over the full extent
pub fn upscale_factor(width: u32, height: u32, side: u32) -> f32 {
    width.max(height) as f32 / side as f32
}

/// Reduced-resolution grayscale noise upscaled (nearest) to the full extent
///
/// The value is collapsed to luminance with equal R=G=B weighting and the
/// given alpha; reduced generation trades grain size for generation cost.
pub fn grayscale_field(
    field: &NoiseField,
    width: u32,
    height: u32,
    alpha: f32,
) -> RasterImage {
    let side = reduced_side(width, height);
    let scale = upscale_factor(width, height, side);
    let field = *field;
    map_coords(width, height, move |x, y| {
        let sx = (x as f32 / scale) as i64;
        let sy = (y as f32 / scale) as i64;
        let u = field.sample(sx, sy, 0);
        [u, u, u, alpha]
    })
}

/// Full-frame uniform RGBA noise from a caller-supplied generator
///
/// Used by the grain stage only; components are uncorrelated across channels
/// and deliberately not tied to the pipeline seed.
pub fn rgba_noise<R: Rng>(width: u32, height: u32, rng: &mut R) -> RasterImage {
    let mut img = RasterImage::new(width, height);
    for v in img.data_mut() {
        *v = rng.gen();
    }
    img
}

/// Single-channel pixelated dot field for the color-noise stage
///
/// The shared dot field is translated by `(sin(seed)·width, cos(seed)·height)`
/// before pixelation, which is what makes the dots vary frame to frame; the
/// selected channel carries `value · gain`, alpha is 1.
pub fn color_dots(
    width: u32,
    height: u32,
    scale: f32,
    seed: f64,
    channel: Channel,
    gain: f32,
) -> RasterImage {
    let tx = (seed.sin() * width as f64) as i64;
    let ty = (seed.cos() * height as f64) as i64;
    let block = scale.max(1.0);
    let lane = channel.index() as u32;
    map_coords(width, height, move |x, y| {
        let bx = ((x as f32 / block).floor() * block + block * 0.5) as i64;
        let by = ((y as f32 / block).floor() * block + block * 0.5) as i64;
        let u = DOT_FIELD.sample(bx - tx, by - ty, lane);
        let mut out = [0.0, 0.0, 0.0, 1.0];
        out[channel.index()] = u * gain;
        out
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_is_deterministic() {
        let f = NoiseField::new(42);
        assert_eq!(f.sample(10, -3, 1), f.sample(10, -3, 1));
        assert_ne!(f.sample(10, -3, 1), f.sample(11, -3, 1));
    }

    #[test]
    fn test_lanes_are_decorrelated() {
        let f = NoiseField::new(7);
        assert_ne!(f.sample(5, 5, 0), f.sample(5, 5, 1));
    }

    #[test]
    fn test_reduced_side() {
        assert_eq!(reduced_side(100, 100), 25);
        assert_eq!(reduced_side(200, 100), 25);
        assert_eq!(reduced_side(3, 3), 1);
        assert_eq!(reduced_side(0, 0), 1);
    }

    #[test]
    fn test_grayscale_field_is_gray_and_blocky() {
        let img = grayscale_field(&MONO_FIELD, 40, 40, 0.05);
        assert_eq!(img.extent(), (40, 40));
        let px = img.pixel(7, 7);
        assert_eq!(px[0], px[1]);
        assert_eq!(px[1], px[2]);
        assert_eq!(px[3], 0.05);
        // reduced side 10, upscale factor 4: each field cell covers 4x4 pixels
        assert_eq!(img.pixel(0, 0)[0], img.pixel(3, 3)[0]);
    }

    #[test]
    fn test_color_dots_seed_dependent_and_reproducible() {
        let a = color_dots(32, 32, 6.0, 1.5, Channel::Red, 0.2);
        let b = color_dots(32, 32, 6.0, 1.5, Channel::Red, 0.2);
        let c = color_dots(32, 32, 6.0, 2.5, Channel::Red, 0.2);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_color_dots_touch_only_their_channel() {
        let dots = color_dots(16, 16, 5.0, 0.7, Channel::Green, 0.2);
        for y in 0..16 {
            for x in 0..16 {
                let px = dots.pixel(x, y);
                assert_eq!(px[0], 0.0);
                assert_eq!(px[2], 0.0);
                assert!(px[1] <= 0.2);
                assert_eq!(px[3], 1.0);
            }
        }
    }

    #[test]
    fn test_rgba_noise_uses_caller_rng() {
        let mut rng_a = SmallRng::seed_from_u64(9);
        let mut rng_b = SmallRng::seed_from_u64(9);
        let a = rgba_noise(8, 8, &mut rng_a);
        let b = rgba_noise(8, 8, &mut rng_b);
        assert_eq!(a, b);
        let mut rng_c = SmallRng::seed_from_u64(10);
        assert_ne!(a, rgba_noise(8, 8, &mut rng_c));
    }
}
