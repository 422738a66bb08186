//! # Print Jobs
//!
//! Single entry points that run the full pipeline:
//!
//! ```text
//! RGBA pixels ──rasterize──► MonochromeBitmap ──encode──► RasterCommand ──send──► printer
//! ```
//!
//! Encoding is deterministic, so a failed delivery is never answered by
//! re-encoding; callers report the transport error instead.

use tracing::{debug, info};

use crate::error::PrintError;
use crate::protocol::{RasterCommand, encode_raster_command};
use crate::render::{MonochromeBitmap, rasterize};
use crate::transport::Transport;

/// Tallest image the 16-bit raster header can describe
pub const MAX_HEIGHT: usize = u16::MAX as usize;

/// Rasterize `pixels` and return the bitmap with its framed command.
pub fn encode_with_bitmap(
    pixels: &[u8],
    width: usize,
) -> Result<(MonochromeBitmap, RasterCommand), PrintError> {
    let bitmap = rasterize(pixels, width)?;
    if bitmap.height > MAX_HEIGHT {
        return Err(PrintError::ImageTooTall {
            height: bitmap.height,
        });
    }

    let command = encode_raster_command(&bitmap.data, bitmap.width, bitmap.height);
    debug!(
        width = bitmap.width,
        height = bitmap.height,
        bytes = command.len(),
        "encoded raster command"
    );
    Ok((bitmap, command))
}

/// # Encode RGBA Pixels as a Print Job
///
/// ## Example
///
/// ```
/// use rasterprint::job;
///
/// // 8x8 opaque black
/// let pixels: Vec<u8> = [0, 0, 0, 255].repeat(64);
/// let cmd = job::encode(&pixels, 8)?;
///
/// assert_eq!(&cmd.as_bytes()[7..15], &[0x1D, 0x76, 0x30, 0x30, 0x01, 0x00, 0x08, 0x00]);
/// # Ok::<(), rasterprint::error::PrintError>(())
/// ```
pub fn encode(pixels: &[u8], width: usize) -> Result<RasterCommand, PrintError> {
    encode_with_bitmap(pixels, width).map(|(_, command)| command)
}

/// Encode `pixels` and deliver the job through `transport`.
///
/// Returns the number of bytes sent.
pub async fn print(
    transport: &dyn Transport,
    destination: &str,
    pixels: &[u8],
    width: usize,
) -> Result<usize, PrintError> {
    let command = encode(pixels, width)?;
    send(transport, destination, &command).await?;
    Ok(command.len())
}

/// Deliver an already encoded job.
pub async fn send(
    transport: &dyn Transport,
    destination: &str,
    command: &RasterCommand,
) -> Result<(), PrintError> {
    info!(
        transport = transport.name(),
        destination,
        bytes = command.len(),
        "sending print job"
    );
    transport.send(command.as_bytes(), destination).await
}
