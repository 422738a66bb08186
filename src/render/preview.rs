//! PNG previews of packed bitmaps.
//!
//! Expands a [`MonochromeBitmap`] back to 8-bit grayscale so the exact dots a
//! printer will burn can be inspected without wasting paper.

use std::io::Cursor;
use std::path::Path;

use image::{GrayImage, ImageFormat, Luma};

use super::rasterize::MonochromeBitmap;
use crate::error::PrintError;

/// Expand a packed bitmap to a black-on-white grayscale image.
pub fn to_gray_image(bitmap: &MonochromeBitmap) -> GrayImage {
    GrayImage::from_fn(bitmap.width as u32, bitmap.height as u32, |x, y| {
        if bitmap.is_ink(x as usize, y as usize) {
            Luma([0u8])
        } else {
            Luma([255u8])
        }
    })
}

/// Encode a packed bitmap as PNG bytes.
pub fn to_png(bitmap: &MonochromeBitmap) -> Result<Vec<u8>, PrintError> {
    let mut out = Cursor::new(Vec::new());
    to_gray_image(bitmap)
        .write_to(&mut out, ImageFormat::Png)
        .map_err(|e| PrintError::Image(format!("Failed to encode PNG: {}", e)))?;
    Ok(out.into_inner())
}

/// Save a packed bitmap as a PNG file.
pub fn save_png(path: &Path, bitmap: &MonochromeBitmap) -> Result<(), PrintError> {
    to_gray_image(bitmap)
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| PrintError::Image(format!("Failed to save PNG: {}", e)))
}
