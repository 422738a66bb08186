//! # Error Types
//!
//! This module defines error types used throughout the rasterprint library.
//!
//! [`RasterError`] covers the pure encoding core and is the only error the
//! rasterizer can produce. [`PrintError`] is the crate-wide error that wraps
//! it together with image decoding, configuration, and delivery failures.

use thiserror::Error;

/// Input contract violations detected by the rasterizer.
///
/// Both variants are raised before any pixel is read, so a failed call never
/// leaves a partial bitmap behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RasterError {
    /// Width is zero or not a multiple of 8
    #[error("Invalid width {width}: must be a positive multiple of 8")]
    InvalidWidth { width: usize },

    /// Buffer length is not a whole number of RGBA rows
    #[error("Malformed pixel buffer: {len} bytes is not a whole number of {width}px RGBA rows")]
    MalformedPixelBuffer { len: usize, width: usize },
}

/// Main error type for rasterprint operations
#[derive(Debug, Error)]
pub enum PrintError {
    /// Rasterizer rejected its input
    #[error(transparent)]
    Raster(#[from] RasterError),

    /// Image height does not fit in the 16-bit raster header
    #[error("Image too tall: {height} rows exceeds the 65535 row raster limit")]
    ImageTooTall { height: usize },

    /// Image decoding or processing error
    #[error("Image error: {0}")]
    Image(String),

    /// Transport-level errors (connection, printer rejected the job)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Invalid or unreadable settings
    #[error("Config error: {0}")]
    Config(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
