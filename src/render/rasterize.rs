//! # Monochrome Rasterizer
//!
//! Converts RGBA8 pixels into the packed 1-bit bitmap expected by the
//! `GS v 0` raster command.
//!
//! ## Thresholding
//!
//! Each pixel becomes ink (1) or background (0):
//!
//! ```text
//! alpha <= 126                         -> 0   (mostly transparent, never printed)
//! floor(0.2126 R + 0.7152 G + 0.0722 B) < 128 -> 1
//! otherwise                            -> 0
//! ```
//!
//! The luminance weights are the Rec. 709 coefficients. There is no dithering:
//! every pixel is decided on its own.
//!
//! ## Packing
//!
//! ```text
//! pixels:  x0 x1 x2 x3 x4 x5 x6 x7 | x8 ...
//! byte 0:  b7 b6 b5 b4 b3 b2 b1 b0 | byte 1 ...
//! ```
//!
//! Rows are never padded because the width is required to be a multiple of 8.
//! Rows are independent, so they are packed in parallel with rayon.

use rayon::prelude::*;

use crate::error::RasterError;

/// Alpha values at or below this are treated as background.
pub const ALPHA_CUTOFF: u8 = 126;

/// Luminance values strictly below this are printed.
pub const LUMINANCE_CUTOFF: u32 = 128;

/// A packed 1-bit-per-pixel image, MSB-first, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonochromeBitmap {
    /// Width in dots (multiple of 8)
    pub width: usize,
    /// Height in rows
    pub height: usize,
    /// `(width / 8) * height` bytes
    pub data: Vec<u8>,
}

impl MonochromeBitmap {
    /// Bytes per row (byte-columns)
    #[inline]
    pub fn width_bytes(&self) -> usize {
        self.width / 8
    }

    /// Whether the dot at (x, y) is printed.
    #[inline]
    pub fn is_ink(&self, x: usize, y: usize) -> bool {
        let byte = self.data[y * self.width_bytes() + x / 8];
        (byte >> (7 - (x % 8))) & 1 == 1
    }
}

/// Integer luminance of an RGB triple, floored.
#[inline]
pub fn luminance(r: u8, g: u8, b: u8) -> u32 {
    (0.2126 * r as f64 + 0.7152 * g as f64 + 0.0722 * b as f64).floor() as u32
}

/// Decide whether one RGBA pixel is printed.
///
/// ## Example
///
/// ```
/// use rasterprint::render::rasterize::is_ink;
///
/// assert!(is_ink(0, 0, 0, 255));
/// assert!(!is_ink(0, 0, 0, 126)); // too transparent
/// assert!(!is_ink(128, 128, 128, 255)); // luminance 128 is background
/// ```
#[inline]
pub fn is_ink(r: u8, g: u8, b: u8, a: u8) -> bool {
    a > ALPHA_CUTOFF && luminance(r, g, b) < LUMINANCE_CUTOFF
}

/// Check the rasterizer's input contract and return the derived height.
pub fn validate(len: usize, width: usize) -> Result<usize, RasterError> {
    if width == 0 || width % 8 != 0 {
        return Err(RasterError::InvalidWidth { width });
    }
    let row_len = width
        .checked_mul(4)
        .ok_or(RasterError::InvalidWidth { width })?;
    if len % row_len != 0 {
        return Err(RasterError::MalformedPixelBuffer { len, width });
    }
    Ok(len / row_len)
}

/// # Rasterize RGBA Pixels
///
/// Thresholds `pixels` (RGBA8, row-major) and packs them 8 dots per byte.
///
/// ## Errors
///
/// - [`RasterError::InvalidWidth`] if `width` is zero or not a multiple of 8
/// - [`RasterError::MalformedPixelBuffer`] if `pixels.len()` is not a
///   multiple of `width * 4`
///
/// ## Example
///
/// ```
/// use rasterprint::render::rasterize;
///
/// // One row of 8 pixels: black, then seven white
/// let mut pixels = vec![255u8; 8 * 4];
/// pixels[..4].copy_from_slice(&[0, 0, 0, 255]);
///
/// let bitmap = rasterize(&pixels, 8)?;
/// assert_eq!(bitmap.height, 1);
/// assert_eq!(bitmap.data, vec![0x80]);
/// # Ok::<(), rasterprint::error::RasterError>(())
/// ```
pub fn rasterize(pixels: &[u8], width: usize) -> Result<MonochromeBitmap, RasterError> {
    let height = validate(pixels.len(), width)?;
    let width_bytes = width / 8;

    let mut data = vec![0u8; width_bytes * height];
    data.par_chunks_exact_mut(width_bytes)
        .zip(pixels.par_chunks_exact(width * 4))
        .for_each(|(out_row, in_row)| pack_row(in_row, out_row));

    Ok(MonochromeBitmap {
        width,
        height,
        data,
    })
}

/// Pack one row: 32 input bytes (8 RGBA pixels) per output byte.
fn pack_row(in_row: &[u8], out_row: &mut [u8]) {
    for (out, group) in out_row.iter_mut().zip(in_row.chunks_exact(32)) {
        let mut acc = 0u8;
        for (bit, px) in group.chunks_exact(4).enumerate() {
            if is_ink(px[0], px[1], px[2], px[3]) {
                acc |= 1 << (7 - bit);
            }
        }
        *out = acc;
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const BLACK: [u8; 4] = [0, 0, 0, 255];
    const WHITE: [u8; 4] = [255, 255, 255, 255];
    const CLEAR: [u8; 4] = [0, 0, 0, 0];

    fn row(px: &[[u8; 4]]) -> Vec<u8> {
        px.iter().flatten().copied().collect()
    }

    #[test]
    fn test_leftmost_pixel_is_msb() {
        let mut px = [WHITE; 8];
        px[0] = BLACK;
        let bitmap = rasterize(&row(&px), 8).unwrap();
        assert_eq!(bitmap.data, vec![0x80]);
    }

    #[test]
    fn test_rightmost_pixel_is_lsb() {
        let mut px = [WHITE; 8];
        px[7] = BLACK;
        let bitmap = rasterize(&row(&px), 8).unwrap();
        assert_eq!(bitmap.data, vec![0x01]);
    }

    #[test]
    fn test_alternating_pattern() {
        let px = [BLACK, WHITE, BLACK, WHITE, BLACK, WHITE, BLACK, WHITE];
        let bitmap = rasterize(&row(&px), 8).unwrap();
        assert_eq!(bitmap.data, vec![0xAA]);
    }

    #[test]
    fn test_alpha_boundary() {
        // alpha 126 is background even when black
        assert!(!is_ink(0, 0, 0, 126));
        // alpha 127 falls through to luminance
        assert!(is_ink(0, 0, 0, 127));
        assert!(!is_ink(255, 255, 255, 127));
    }

    #[test]
    fn test_luminance_boundary() {
        assert_eq!(luminance(128, 128, 128), 128);
        assert_eq!(luminance(127, 127, 127), 127);
        assert!(!is_ink(128, 128, 128, 255));
        assert!(is_ink(127, 127, 127, 255));
    }

    #[test]
    fn test_luminance_weights() {
        // Pure green is weighted most heavily
        assert_eq!(luminance(0, 179, 0), 128);
        assert_eq!(luminance(0, 178, 0), 127);
        // Pure red and blue are dark enough to print
        assert!(is_ink(255, 0, 0, 255));
        assert!(is_ink(0, 0, 255, 255));
        // White floors to 254, not 255
        assert_eq!(luminance(255, 255, 255), 254);
    }

    #[test]
    fn test_all_black_square() {
        let pixels = row(&[BLACK; 64]);
        let bitmap = rasterize(&pixels, 8).unwrap();
        assert_eq!(bitmap.height, 8);
        assert_eq!(bitmap.data, vec![0xFF; 8]);
    }

    #[test]
    fn test_all_transparent_is_blank() {
        let pixels = row(&[CLEAR; 16 * 3]);
        let bitmap = rasterize(&pixels, 16).unwrap();
        assert_eq!(bitmap.height, 3);
        assert_eq!(bitmap.data, vec![0x00; 6]);
    }

    #[test]
    fn test_empty_buffer() {
        let bitmap = rasterize(&[], 576).unwrap();
        assert_eq!(bitmap.height, 0);
        assert!(bitmap.data.is_empty());
    }

    #[test]
    fn test_rows_do_not_bleed() {
        // 16 wide, 2 rows: first row black on the left half, second on the right
        let mut px = vec![WHITE; 32];
        for x in 0..8 {
            px[x] = BLACK;
            px[16 + 8 + x] = BLACK;
        }
        let bitmap = rasterize(&row(&px), 16).unwrap();
        assert_eq!(bitmap.data, vec![0xFF, 0x00, 0x00, 0xFF]);
        assert!(bitmap.is_ink(0, 0));
        assert!(!bitmap.is_ink(8, 0));
        assert!(bitmap.is_ink(15, 1));
    }

    #[test]
    fn test_size_invariant() {
        for (width, height) in [(8, 1), (16, 5), (576, 3), (384, 0)] {
            let pixels = vec![0x7F; width * height * 4];
            let bitmap = rasterize(&pixels, width).unwrap();
            assert_eq!(bitmap.height, height);
            assert_eq!(bitmap.data.len(), (width / 8) * height);
        }
    }

    #[test]
    fn test_rejects_width_not_multiple_of_8() {
        assert_eq!(
            rasterize(&[0; 28], 7),
            Err(RasterError::InvalidWidth { width: 7 })
        );
        assert_eq!(
            rasterize(&[0; 36], 9),
            Err(RasterError::InvalidWidth { width: 9 })
        );
    }

    #[test]
    fn test_rejects_zero_width() {
        assert_eq!(rasterize(&[], 0), Err(RasterError::InvalidWidth { width: 0 }));
    }

    #[test]
    fn test_rejects_width_too_large_for_row_length() {
        // Multiple of 8, but width * 4 does not fit in usize
        let width = usize::MAX - 7;
        assert_eq!(validate(0, width), Err(RasterError::InvalidWidth { width }));
        assert_eq!(rasterize(&[], width), Err(RasterError::InvalidWidth { width }));
    }

    #[test]
    fn test_width_checked_before_length() {
        // Both contracts violated: width wins
        assert_eq!(
            rasterize(&[0; 31], 7),
            Err(RasterError::InvalidWidth { width: 7 })
        );
    }

    #[test]
    fn test_rejects_partial_row() {
        assert_eq!(
            rasterize(&[0; 31], 8),
            Err(RasterError::MalformedPixelBuffer { len: 31, width: 8 })
        );
    }

    #[test]
    fn test_deterministic() {
        let pixels: Vec<u8> = (0..32 * 10 * 4).map(|i| (i * 37 % 256) as u8).collect();
        let a = rasterize(&pixels, 32).unwrap();
        let b = rasterize(&pixels, 32).unwrap();
        assert_eq!(a, b);
    }
}
