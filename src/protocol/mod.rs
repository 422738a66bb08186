//! # ESC/POS Protocol Implementation
//!
//! Low-level command builders for Epson-compatible thermal receipt printers.
//!
//! ## Module Structure
//!
//! - [`commands`]: Framing commands (init, standard mode, line feed)
//! - [`graphics`]: Raster bit image header and full job encoding
//!
//! ## Usage Example
//!
//! ```
//! use rasterprint::protocol::graphics;
//!
//! // 16 dots wide, 2 rows: a black bar on the left half of each row
//! let bitmap = [0xFF, 0x00, 0xFF, 0x00];
//! let cmd = graphics::encode_raster_command(&bitmap, 16, 2);
//!
//! assert_eq!(&cmd.as_bytes()[..3], &[0x1B, 0x40, 0x0A]);
//! assert_eq!(cmd.len(), graphics::FRAMING_LEN + bitmap.len());
//! ```

pub mod commands;
pub mod graphics;

pub use graphics::{RasterCommand, encode_raster_command};
