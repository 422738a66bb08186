//! # ESC/POS Control Commands
//!
//! This module implements the handful of ESC/POS control sequences that frame
//! a raster print job on Epson-compatible thermal receipt printers
//! (TM-m30, TM-T20, M200 and clones).
//!
//! ## Escape Sequence Structure
//!
//! Commands are short byte sequences starting with a prefix byte:
//! - Single byte: `LF`
//! - Two bytes: `ESC @`, `ESC S`
//! - Multi-byte with parameters: `GS v 0 m xL xH yL yH data...`
//!
//! Every framing command in a job is followed by a line feed, so the printer
//! flushes its line buffer between them.
//!
//! ## Byte Order
//!
//! Multi-byte integers use **little-endian** encoding:
//! - `u16` value 0x1234 is sent as bytes `[0x34, 0x12]`

// ============================================================================
// ESCAPE SEQUENCE CONSTANTS
// ============================================================================

/// ESC (Escape) - Command prefix byte
pub const ESC: u8 = 0x1B;

/// GS (Group Separator) - Extended command prefix
///
/// Used for graphics commands such as `GS v 0` (print raster bit image).
pub const GS: u8 = 0x1D;

/// LF (Line Feed) - Print the line buffer and advance one line
pub const LF: u8 = 0x0A;

// ============================================================================
// INITIALIZATION COMMANDS
// ============================================================================

/// # Initialize Printer (ESC @ LF)
///
/// Clears the print buffer and resets the printer to its power-on modes,
/// marking the start of a fresh print context.
///
/// | Format  | Bytes      |
/// |---------|------------|
/// | ASCII   | ESC @ LF   |
/// | Hex     | 1B 40 0A   |
///
/// ## Example
///
/// ```
/// use rasterprint::protocol::commands;
///
/// assert_eq!(commands::init(), [0x1B, 0x40, 0x0A]);
/// ```
#[inline]
pub const fn init() -> [u8; 3] {
    [ESC, b'@', LF]
}

/// # Select Standard Mode (ESC S LF)
///
/// Switches from page mode (buffered, printed on FF) to standard mode, where
/// data is printed as soon as it is received.
///
/// | Format  | Bytes      |
/// |---------|------------|
/// | ASCII   | ESC S LF   |
/// | Hex     | 1B 53 0A   |
#[inline]
pub const fn standard_mode() -> [u8; 3] {
    [ESC, b'S', LF]
}

/// Line feed (LF)
#[inline]
pub const fn line_feed() -> [u8; 1] {
    [LF]
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Encode a u16 value as little-endian bytes [low, high]
///
/// ## Example
///
/// ```
/// use rasterprint::protocol::commands::u16_le;
///
/// assert_eq!(u16_le(0x1234), [0x34, 0x12]);
/// assert_eq!(u16_le(300), [0x2C, 0x01]);
/// ```
#[inline]
pub const fn u16_le(value: u16) -> [u8; 2] {
    [value as u8, (value >> 8) as u8]
}

// ============================================================================
// TESTS
// ============================================================================
