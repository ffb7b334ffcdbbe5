use image::{ImageBuffer, Rgba, RgbaImage};

use crate::error::PipelineError;

/// A working raster image for the filter pipeline
///
/// Pixels are stored as interleaved RGBA `f32` components in the normalized
/// [0, 1] range. Every pipeline stage consumes one or more `RasterImage`s and
/// produces a new one; nothing mutates its input in place, which lets stages
/// feed the same upstream image into several branches (the chromatic
/// aberration stage reads its input three times).
#[derive(Clone, Debug, PartialEq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl RasterImage {
    /// Create a transparent black image with the given extent
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; width as usize * height as usize * 4],
        }
    }

    /// Create an opaque image filled with the given RGB color
    pub fn filled(width: u32, height: u32, rgb: [f32; 3]) -> Self {
        Self::from_fn(width, height, |_, _| [rgb[0], rgb[1], rgb[2], 1.0])
    }

    /// Create an image by evaluating a function at every pixel coordinate
    pub fn from_fn<F>(width: u32, height: u32, f: F) -> Self
    where
        F: Fn(u32, u32) -> [f32; 4],
    {
        let mut data = Vec::with_capacity(width as usize * height as usize * 4);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Width of the image extent
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height of the image extent
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Extent as (width, height)
    pub fn extent(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Whether another image has the same extent
    pub fn same_extent(&self, other: &RasterImage) -> bool {
        self.extent() == other.extent()
    }

    /// Get the RGBA components at the given coordinates
    pub fn pixel(&self, x: u32, y: u32) -> [f32; 4] {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// Set the RGBA components at the given coordinates
    pub fn set_pixel(&mut self, x: u32, y: u32, px: [f32; 4]) {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.data[i..i + 4].copy_from_slice(&px);
    }

    /// Raw interleaved RGBA components
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Mutable raw interleaved RGBA components
    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Row stride in `f32` components
    pub fn stride(&self) -> usize {
        self.width as usize * 4
    }

    /// Convert an 8-bit RGBA buffer into the normalized working format
    pub fn from_rgba8(buffer: &RgbaImage) -> Self {
        let (width, height) = buffer.dimensions();
        let data = buffer
            .as_raw()
            .iter()
            .map(|&c| c as f32 / 255.0)
            .collect();
        Self {
            width,
            height,
            data,
        }
    }

    /// Terminal conversion to a displayable/encodable 8-bit RGBA buffer
    ///
    /// This is the one pipeline step that fails hard: a failure here means
    /// "no output produced" for the invocation and the caller skips the frame.
    pub fn to_rgba8(&self) -> Result<RgbaImage, PipelineError> {
        let raw: Vec<u8> = self
            .data
            .iter()
            .map(|&c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
            .collect();
        ImageBuffer::from_raw(self.width, self.height, raw).ok_or(PipelineError::NoOutput {
            width: self.width,
            height: self.height,
        })
    }
}

impl From<&RgbaImage> for RasterImage {
    fn from(buffer: &RgbaImage) -> Self {
        Self::from_rgba8(buffer)
    }
}

/// Rec. 709 luminance of an RGB triple
pub fn luminance(px: [f32; 4]) -> f32 {
    0.2126 * px[0] + 0.7152 * px[1] + 0.0722 * px[2]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extent_and_pixel_access() {
        let mut img = RasterImage::new(4, 3);
        assert_eq!(img.extent(), (4, 3));
        img.set_pixel(2, 1, [0.25, 0.5, 0.75, 1.0]);
        assert_eq!(img.pixel(2, 1), [0.25, 0.5, 0.75, 1.0]);
        assert_eq!(img.pixel(0, 0), [0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_rgba8_round_trip() {
        let buffer = RgbaImage::from_fn(5, 5, |x, y| {
            Rgba([(x * 50) as u8, (y * 50) as u8, 128, 255])
        });
        let raster = RasterImage::from_rgba8(&buffer);
        let back = raster.to_rgba8().unwrap();
        assert_eq!(buffer, back);
    }

    #[test]
    fn test_terminal_conversion_clamps_out_of_range() {
        let img = RasterImage::from_fn(2, 1, |x, _| {
            if x == 0 {
                [1.5, -0.2, 0.5, 1.0]
            } else {
                [0.0, 0.0, 0.0, 1.0]
            }
        });
        let out = img.to_rgba8().unwrap();
        assert_eq!(out.get_pixel(0, 0).0, [255, 0, 128, 255]);
    }

    #[test]
    fn test_zero_area_conversion() {
        let img = RasterImage::new(0, 0);
        assert!(img.to_rgba8().is_ok());
    }

    #[test]
    fn test_luminance_weights() {
        assert!((luminance([1.0, 1.0, 1.0, 1.0]) - 1.0).abs() < 1e-5);
        assert!(luminance([0.0, 1.0, 0.0, 1.0]) > luminance([1.0, 0.0, 0.0, 1.0]));
    }
}
