//! # Rendering
//!
//! Turns RGBA pixels into printer-ready 1-bit data.
//!
//! - [`rasterize`]: alpha-aware luminance threshold and MSB-first packing
//! - [`preview`]: expand packed bitmaps back into PNG for inspection

pub mod preview;
pub mod rasterize;

pub use rasterize::{MonochromeBitmap, rasterize};
