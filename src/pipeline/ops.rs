//! Shared raster operations used by the pipeline stages
//!
//! Every operation consumes borrowed images and produces a new one; none
//! mutates its input. Compositing operations return `None` when their inputs
//! disagree on extent, which the stages propagate as a soft skip.

use rayon::prelude::*;

use crate::raster::{luminance, RasterImage};

/// One of the three color channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    pub fn index(self) -> usize {
        match self {
            Channel::Red => 0,
            Channel::Green => 1,
            Channel::Blue => 2,
        }
    }
}

/// Apply a per-pixel transform in parallel over rows
pub(crate) fn map_pixels<F>(src: &RasterImage, f: F) -> RasterImage
where
    F: Fn([f32; 4]) -> [f32; 4] + Sync,
{
    let stride = src.stride();
    let mut out = RasterImage::new(src.width(), src.height());
    if stride == 0 {
        return out;
    }
    let data = src.data();
    out.data_mut()
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row)| {
            let src_row = &data[y * stride..(y + 1) * stride];
            for i in (0..stride).step_by(4) {
                let px = [src_row[i], src_row[i + 1], src_row[i + 2], src_row[i + 3]];
                row[i..i + 4].copy_from_slice(&f(px));
            }
        });
    out
}

/// Evaluate a coordinate function at every pixel, in parallel over rows
pub(crate) fn map_coords<F>(width: u32, height: u32, f: F) -> RasterImage
where
    F: Fn(u32, u32) -> [f32; 4] + Sync,
{
    let mut out = RasterImage::new(width, height);
    let stride = out.stride();
    if stride == 0 {
        return out;
    }
    out.data_mut()
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..width {
                let i = x as usize * 4;
                row[i..i + 4].copy_from_slice(&f(x, y as u32));
            }
        });
    out
}

/// Combine two same-extent images per pixel, in parallel over rows
pub(crate) fn zip_pixels<F>(fg: &RasterImage, bg: &RasterImage, f: F) -> Option<RasterImage>
where
    F: Fn([f32; 4], [f32; 4]) -> [f32; 4] + Sync,
{
    if !fg.same_extent(bg) {
        return None;
    }
    let stride = fg.stride();
    let mut out = RasterImage::new(fg.width(), fg.height());
    if stride == 0 {
        return Some(out);
    }
    let fg_data = fg.data();
    let bg_data = bg.data();
    out.data_mut()
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row)| {
            let fg_row = &fg_data[y * stride..(y + 1) * stride];
            let bg_row = &bg_data[y * stride..(y + 1) * stride];
            for i in (0..stride).step_by(4) {
                let a = [fg_row[i], fg_row[i + 1], fg_row[i + 2], fg_row[i + 3]];
                let b = [bg_row[i], bg_row[i + 1], bg_row[i + 2], bg_row[i + 3]];
                row[i..i + 4].copy_from_slice(&f(a, b));
            }
        });
    Some(out)
}

/// Brightness offset, contrast about mid-gray, saturation about luminance
///
/// At (0, 1, 1) this is numerically the identity; alpha passes through.
pub fn color_controls(
    src: &RasterImage,
    brightness: f32,
    contrast: f32,
    saturation: f32,
) -> RasterImage {
    map_pixels(src, |px| {
        let mut rgb = [px[0], px[1], px[2]];
        for c in rgb.iter_mut() {
            *c = (*c + brightness - 0.5) * contrast + 0.5;
        }
        if saturation != 1.0 {
            let lum = 0.2126 * rgb[0] + 0.7152 * rgb[1] + 0.0722 * rgb[2];
            for c in rgb.iter_mut() {
                *c = lum + (*c - lum) * saturation;
            }
        }
        [
            rgb[0].clamp(0.0, 1.0),
            rgb[1].clamp(0.0, 1.0),
            rgb[2].clamp(0.0, 1.0),
            px[3],
        ]
    })
}

/// White-balance shift against the 6500-unit reference neutral
///
/// `temperature` moves the neutral ±1000 units along the red-blue axis,
/// `tint` ±500 units along the green-magenta axis; both map to per-channel
/// gains normalized by the reference.
pub fn white_balance(src: &RasterImage, temperature: f32, tint: f32) -> RasterImage {
    let warm = temperature * (1000.0 / 6500.0);
    let shift = tint * (500.0 / 6500.0);
    let gains = [1.0 + warm, 1.0 - shift, 1.0 - warm];
    map_pixels(src, |px| {
        [
            (px[0] * gains[0]).clamp(0.0, 1.0),
            (px[1] * gains[1]).clamp(0.0, 1.0),
            (px[2] * gains[2]).clamp(0.0, 1.0),
            px[3],
        ]
    })
}

/// Zero every color component except the selected channel, keeping alpha
pub fn extract_channel(src: &RasterImage, channel: Channel) -> RasterImage {
    let keep = channel.index();
    map_pixels(src, |px| {
        let mut out = [0.0, 0.0, 0.0, px[3]];
        out[keep] = px[keep];
        out
    })
}

/// Shift the image by whole pixels, filling vacated areas with transparent black
///
/// The extent never grows; content shifted past the edge is discarded.
pub fn translate(src: &RasterImage, dx: i32, dy: i32) -> RasterImage {
    let (w, h) = (src.width() as i64, src.height() as i64);
    map_coords(src.width(), src.height(), |x, y| {
        let sx = x as i64 - dx as i64;
        let sy = y as i64 - dy as i64;
        if sx >= 0 && sx < w && sy >= 0 && sy < h {
            src.pixel(sx as u32, sy as u32)
        } else {
            [0.0; 4]
        }
    })
}

/// Separable Gaussian blur with the given radius (sigma)
///
/// Samples beyond the extent read as transparent black and the result keeps
/// the input extent, so edges darken slightly just as a grown-then-cropped
/// blur would.
pub fn gaussian_blur(src: &RasterImage, radius: f32) -> RasterImage {
    if radius <= 0.0 || src.width() == 0 || src.height() == 0 {
        return src.clone();
    }
    let taps = (radius * 3.0).ceil() as i32;
    let mut weights = Vec::with_capacity((2 * taps + 1) as usize);
    let denom = 2.0 * radius * radius;
    for o in -taps..=taps {
        weights.push((-(o * o) as f32 / denom).exp());
    }
    let total: f32 = weights.iter().sum();
    for w in weights.iter_mut() {
        *w /= total;
    }

    let horizontal = blur_pass(src, &weights, true);
    blur_pass(&horizontal, &weights, false)
}

fn blur_pass(src: &RasterImage, weights: &[f32], horizontal: bool) -> RasterImage {
    let (w, h) = (src.width() as i64, src.height() as i64);
    let taps = (weights.len() / 2) as i64;
    let stride = src.stride();
    let data = src.data();
    let mut out = RasterImage::new(src.width(), src.height());
    out.data_mut()
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row)| {
            let y = y as i64;
            for x in 0..w {
                let mut acc = [0.0f32; 4];
                for (k, &wt) in weights.iter().enumerate() {
                    let o = k as i64 - taps;
                    let (sx, sy) = if horizontal { (x + o, y) } else { (x, y + o) };
                    if sx >= 0 && sx < w && sy >= 0 && sy < h {
                        let i = (sy as usize * w as usize + sx as usize) * 4;
                        for (c, a) in acc.iter_mut().enumerate() {
                            *a += data[i + c] * wt;
                        }
                    }
                }
                let i = x as usize * 4;
                row[i..i + 4].copy_from_slice(&acc);
            }
        });
    out
}

/// Replace each pixel with the value at the center of its block
///
/// The block grid is anchored on `center` so the pattern stays stable when
/// the scale changes.
pub fn pixelate(src: &RasterImage, scale: f32, center: (f32, f32)) -> RasterImage {
    let block = scale.max(1.0);
    let (w, h) = (src.width(), src.height());
    if w == 0 || h == 0 {
        return src.clone();
    }
    map_coords(w, h, |x, y| {
        let cell_x = ((x as f32 - center.0) / block).floor();
        let cell_y = ((y as f32 - center.1) / block).floor();
        let sx = (center.0 + (cell_x + 0.5) * block).clamp(0.0, (w - 1) as f32) as u32;
        let sy = (center.1 + (cell_y + 0.5) * block).clamp(0.0, (h - 1) as f32) as u32;
        src.pixel(sx, sy)
    })
}

/// Unsharp-mask the luminance channel
///
/// Returns `None` when the image is too small to support the 3x3
/// neighborhood the mask needs; callers treat that as "sharpening failed".
pub fn sharpen_luminance(src: &RasterImage, sharpness: f32) -> Option<RasterImage> {
    let (w, h) = (src.width(), src.height());
    if w < 3 || h < 3 {
        return None;
    }
    if sharpness <= 0.0 {
        return Some(src.clone());
    }

    // 3x3 binomial low-pass of luminance
    let lum = map_pixels(src, |px| {
        let l = luminance(px);
        [l, l, l, px[3]]
    });
    let soft = {
        let weights = [0.25, 0.5, 0.25];
        let horizontal = blur_pass(&lum, &weights, true);
        blur_pass(&horizontal, &weights, false)
    };

    Some(map_coords(w, h, |x, y| {
        let px = src.pixel(x, y);
        let l = luminance(px);
        let boosted = l + sharpness * (l - soft.pixel(x, y)[0]);
        let gain = if l > 1e-5 { boosted / l } else { 1.0 };
        [
            (px[0] * gain).clamp(0.0, 1.0),
            (px[1] * gain).clamp(0.0, 1.0),
            (px[2] * gain).clamp(0.0, 1.0),
            px[3],
        ]
    }))
}

/// Hard luminance threshold
///
/// Pixels whose luminance exceeds the threshold become opaque white;
/// everything else becomes fully transparent black.
pub fn luminance_threshold(src: &RasterImage, threshold: f32) -> RasterImage {
    map_pixels(src, |px| {
        if luminance(px) > threshold {
            [1.0, 1.0, 1.0, 1.0]
        } else {
            [0.0, 0.0, 0.0, 0.0]
        }
    })
}

/// Per-component maximum of the premultiplied inputs
pub fn max_composite(fg: &RasterImage, bg: &RasterImage) -> Option<RasterImage> {
    zip_pixels(fg, bg, |f, b| {
        let a = f[3].max(b[3]);
        let mut out = [0.0, 0.0, 0.0, a];
        for c in 0..3 {
            let m = (f[c] * f[3]).max(b[c] * b[3]);
            out[c] = if a > 0.0 { (m / a).min(1.0) } else { 0.0 };
        }
        out
    })
}

/// Additive compositing of the premultiplied inputs, clamped at white
pub fn additive_composite(fg: &RasterImage, bg: &RasterImage) -> Option<RasterImage> {
    zip_pixels(fg, bg, |f, b| {
        let a = (f[3] + b[3]).min(1.0);
        let mut out = [0.0, 0.0, 0.0, a];
        for c in 0..3 {
            let sum = f[c] * f[3] + b[c] * b[3];
            out[c] = if a > 0.0 { (sum / a).min(1.0) } else { 0.0 };
        }
        out
    })
}

/// Standard alpha-over blend, foreground on top
pub fn source_over(fg: &RasterImage, bg: &RasterImage) -> Option<RasterImage> {
    blend_composite(fg, bg, |_, f| f)
}

/// Screen blend mode: brightens, never darkens
pub fn screen_blend(fg: &RasterImage, bg: &RasterImage) -> Option<RasterImage> {
    blend_composite(fg, bg, |b, f| 1.0 - (1.0 - b) * (1.0 - f))
}

/// Overlay blend mode: multiplies shadows, screens highlights
pub fn overlay_blend(fg: &RasterImage, bg: &RasterImage) -> Option<RasterImage> {
    blend_composite(fg, bg, |b, f| {
        if b <= 0.5 {
            2.0 * b * f
        } else {
            1.0 - 2.0 * (1.0 - b) * (1.0 - f)
        }
    })
}

/// Per-pixel mix of foreground over background, weighted by mask luminance
///
/// The result keeps the mask in its alpha channel: where the mask is black
/// the pixel is fully transparent, so a later composite of the masked result
/// leaves those regions of its background untouched.
pub fn mask_blend(
    fg: &RasterImage,
    bg: &RasterImage,
    mask: &RasterImage,
) -> Option<RasterImage> {
    if !fg.same_extent(bg) || !fg.same_extent(mask) {
        return None;
    }
    Some(map_coords(fg.width(), fg.height(), |x, y| {
        let m = luminance(mask.pixel(x, y)).clamp(0.0, 1.0);
        let f = fg.pixel(x, y);
        let b = bg.pixel(x, y);
        [
            f[0] * m + b[0] * (1.0 - m),
            f[1] * m + b[1] * (1.0 - m),
            f[2] * m + b[2] * (1.0 - m),
            f[3] * m,
        ]
    }))
}

/// Crop (or pad with transparent black) to the given extent, anchored top-left
pub fn crop(src: &RasterImage, width: u32, height: u32) -> RasterImage {
    map_coords(width, height, |x, y| {
        if x < src.width() && y < src.height() {
            src.pixel(x, y)
        } else {
            [0.0; 4]
        }
    })
}

/// Separable blend with source-over alpha compositing
fn blend_composite<F>(fg: &RasterImage, bg: &RasterImage, blend: F) -> Option<RasterImage>
where
    F: Fn(f32, f32) -> f32 + Sync,
{
    zip_pixels(fg, bg, |f, b| {
        let (fa, ba) = (f[3], b[3]);
        let ao = fa + ba - fa * ba;
        let mut out = [0.0, 0.0, 0.0, ao];
        if ao > 0.0 {
            for c in 0..3 {
                let co = fa * (1.0 - ba) * f[c]
                    + ba * (1.0 - fa) * b[c]
                    + fa * ba * blend(b[c], f[c]);
                out[c] = (co / ao).clamp(0.0, 1.0);
            }
        }
        out
    })
}
