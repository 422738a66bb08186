//! # ESC/POS Raster Graphics
//!
//! This module frames a packed 1-bit bitmap as a complete print job built
//! around the `GS v 0` (print raster bit image) command.
//!
//! ## Job Layout
//!
//! ```text
//! 1B 40 0A                      ESC @ LF        initialize
//! 1B 53 0A                      ESC S LF        standard mode
//! 0A                            LF
//! 1D 76 30 30 xL xH yL yH       GS v 0 m ...    raster header (m = 48, normal)
//! d1 ... dk                                     k = (width / 8) * height
//! 0A                            LF
//! ```
//!
//! ## Width and Height Encoding
//!
//! ```text
//! byte_width = width_dots / 8
//! xL = byte_width & 0xFF        xH = (byte_width >> 8) & 0xFF
//! yL = height & 0xFF            yH = (height >> 8) & 0xFF
//!
//! Example: 576 x 300  ->  xL=0x48 xH=0x00 yL=0x2C yH=0x01
//! ```
//!
//! `xH` is non-zero only for images of 2048 dots or wider, far beyond any
//! receipt printer head, so every real job carries `xH = 0`.
//!
//! ## Bit Packing
//!
//! - Bit 7 (MSB) = leftmost dot
//! - 1 = black (print), 0 = white (no print)

use super::commands::{self, GS};

/// Raster mode byte for normal density (`'0'`, decimal 48)
pub const MODE_NORMAL: u8 = 48;

/// Length of the `GS v 0` header
pub const HEADER_LEN: usize = 8;

/// Bytes surrounding the payload: init, standard mode, LF, header, LF
pub const FRAMING_LEN: usize = 3 + 3 + 1 + HEADER_LEN + 1;

/// A complete, immutable raster print job.
///
/// Built once by [`encode_raster_command`] and handed to a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterCommand(Vec<u8>);

impl RasterCommand {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for RasterCommand {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// # Raster Bit Image Header (GS v 0 m xL xH yL yH)
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | GS v 0 m xL xH yL yH |
/// | Hex     | 1D 76 30 m xL xH yL yH |
///
/// `width_dots` must already be a multiple of 8; the header carries the width
/// in byte-columns and the height in dots, both split low/high.
///
/// ## Example
///
/// ```
/// use rasterprint::protocol::graphics;
///
/// let header = graphics::raster_header(576, 300);
/// assert_eq!(header, [0x1D, 0x76, 0x30, 0x30, 0x48, 0x00, 0x2C, 0x01]);
/// ```
pub fn raster_header(width_dots: usize, height: usize) -> [u8; HEADER_LEN] {
    let [xl, xh] = commands::u16_le((width_dots >> 3) as u16);
    let [yl, yh] = commands::u16_le(height as u16);
    [GS, b'v', b'0', MODE_NORMAL, xl, xh, yl, yh]
}

/// # Encode a Raster Print Job
///
/// Wraps a packed bitmap in the full command sequence.
///
/// No validation is performed: `bitmap.len()` is trusted to equal
/// `(width / 8) * height`. Use [`crate::render::rasterize`] (or
/// [`crate::job::encode`]) to obtain consistent values. Heights above 65535
/// keep only their low 16 bits in the header.
///
/// ## Example
///
/// ```
/// use rasterprint::protocol::graphics;
///
/// let cmd = graphics::encode_raster_command(&[0xFF], 8, 1);
/// assert_eq!(
///     cmd.as_bytes(),
///     &[
///         0x1B, 0x40, 0x0A, 0x1B, 0x53, 0x0A, 0x0A,
///         0x1D, 0x76, 0x30, 0x30, 0x01, 0x00, 0x01, 0x00,
///         0xFF, 0x0A,
///     ]
/// );
/// ```
pub fn encode_raster_command(bitmap: &[u8], width: usize, height: usize) -> RasterCommand {
    debug_assert!(
        bitmap.len() == (width / 8) * height,
        "Raster data length mismatch. Expected {} ({} bytes x {} rows), got {}",
        (width / 8) * height,
        width / 8,
        height,
        bitmap.len()
    );

    let mut cmd = Vec::with_capacity(FRAMING_LEN + bitmap.len());
    cmd.extend_from_slice(&commands::init());
    cmd.extend_from_slice(&commands::standard_mode());
    cmd.extend_from_slice(&commands::line_feed());
    cmd.extend_from_slice(&raster_header(width, height));
    cmd.extend_from_slice(bitmap);
    cmd.extend_from_slice(&commands::line_feed());
    RasterCommand(cmd)
}

// ============================================================================
// TESTS
// ============================================================================
