//! # Pixel Sources
//!
//! Produces the RGBA8 row-major buffers the rasterizer consumes.
//!
//! Images wider than the print width are scaled down (Lanczos3, aspect ratio
//! preserved). Narrow images are left at their natural size. The right edge
//! is then padded with transparent pixels up to the next multiple of 8, which
//! the rasterizer treats as unprinted background.

use std::path::Path;

use image::{DynamicImage, RgbaImage, imageops::FilterType};
use tracing::debug;

use crate::error::PrintError;

/// An RGBA8 pixel buffer together with its width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelSource {
    /// RGBA8 row-major, `width * height * 4` bytes
    pub pixels: Vec<u8>,
    /// Width in pixels (multiple of 8)
    pub width: usize,
}

impl PixelSource {
    pub fn height(&self) -> usize {
        if self.width == 0 {
            0
        } else {
            self.pixels.len() / (self.width * 4)
        }
    }

    /// Decode an encoded image (PNG, JPEG, ...) and fit it to `max_width`.
    pub fn from_encoded(bytes: &[u8], max_width: u32) -> Result<Self, PrintError> {
        let img = image::load_from_memory(bytes)
            .map_err(|e| PrintError::Image(format!("Failed to decode image: {}", e)))?;
        Ok(Self::from_image(img, max_width))
    }

    /// Open an image file and fit it to `max_width`.
    pub fn open<P: AsRef<Path>>(path: P, max_width: u32) -> Result<Self, PrintError> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|e| {
            PrintError::Image(format!("Failed to open {}: {}", path.display(), e))
        })?;
        Ok(Self::from_image(img, max_width))
    }

    /// Fit a decoded image to `max_width` and pad it to a multiple of 8.
    pub fn from_image(img: DynamicImage, max_width: u32) -> Self {
        let img = fit_width(img, max_width);
        let rgba = pad_to_byte_columns(img.to_rgba8());
        let width = rgba.width() as usize;
        Self {
            pixels: rgba.into_raw(),
            width,
        }
    }
}

/// Downscale `img` to `max_width` if it is wider, preserving aspect ratio.
pub fn fit_width(img: DynamicImage, max_width: u32) -> DynamicImage {
    if img.width() <= max_width || max_width == 0 {
        return img;
    }

    let aspect = img.height() as f32 / img.width() as f32;
    let height = ((max_width as f32 * aspect).round() as u32).max(1);
    debug!(
        from_width = img.width(),
        from_height = img.height(),
        to_width = max_width,
        to_height = height,
        "resizing image to print width"
    );
    img.resize_exact(max_width, height, FilterType::Lanczos3)
}

/// Extend the right edge with transparent pixels to a multiple of 8.
pub fn pad_to_byte_columns(img: RgbaImage) -> RgbaImage {
    let width = img.width();
    let padded = width.div_ceil(8) * 8;
    if padded == width {
        return img;
    }

    let mut canvas = RgbaImage::new(padded, img.height());
    image::imageops::replace(&mut canvas, &img, 0, 0);
    canvas
}
