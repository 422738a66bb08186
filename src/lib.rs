//! # rasterprint - Thermal Receipt Printer Raster Encoder
//!
//! rasterprint turns an RGBA bitmap into the exact byte stream an
//! Epson-compatible (ESC/POS) thermal receipt printer expects for a raster
//! image, and delivers it to the printer. It provides:
//!
//! - **Rasterizer**: alpha-aware luminance threshold, MSB-first bit packing
//! - **Protocol**: `ESC @`, `ESC S`, and `GS v 0` job framing
//! - **Transport**: IPP, raw HTTP, device node, and CUPS `lp` delivery
//! - **Server**: HTTP endpoint that prints posted images
//!
//! ## Quick Start
//!
//! ```no_run
//! use rasterprint::{job, source::PixelSource, transport::IppTransport};
//!
//! # async fn example() -> Result<(), rasterprint::PrintError> {
//! // Load an image and fit it to 80mm paper
//! let source = PixelSource::open("receipt.png", 576)?;
//!
//! // Encode and send it to a CUPS queue over IPP
//! let transport = IppTransport::new()?;
//! job::print(
//!     &transport,
//!     "http://localhost:631/printers/M200",
//!     &source.pixels,
//!     source.width,
//! )
//! .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`render`] | Thresholding, bit packing, PNG previews |
//! | [`protocol`] | ESC/POS command builders |
//! | [`job`] | Rasterize + encode + send in one call |
//! | [`source`] | Decode and fit images to the print width |
//! | [`transport`] | Delivery backends |
//! | [`printer`] | Persisted printer settings |
//! | [`server`] | HTTP print server |
//! | [`error`] | Error types |

pub mod error;
pub mod job;
pub mod printer;
pub mod protocol;
pub mod render;
pub mod server;
pub mod source;
pub mod transport;

// Re-exports for convenience
pub use error::{PrintError, RasterError};
pub use printer::Settings;
pub use protocol::{RasterCommand, encode_raster_command};
pub use render::{MonochromeBitmap, rasterize};
pub use transport::{Transport, TransportKind};
