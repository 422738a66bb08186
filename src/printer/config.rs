//! # Printer Settings
//!
//! Persisted settings for where and how wide to print.
//!
//! ## File Format
//!
//! Settings are stored as JSON. Missing fields fall back to their defaults,
//! so an empty object (or a missing file) gives a working configuration:
//!
//! ```json
//! {
//!   "print_width": 576,
//!   "print_url": "http://localhost:631/printers/M200",
//!   "transport": "ipp"
//! }
//! ```
//!
//! ## Print Width
//!
//! | Paper | Typical width |
//! |-------|---------------|
//! | 80mm  | 576 dots (72 bytes) |
//! | 58mm  | 384 dots (48 bytes) |
//!
//! The width must be a multiple of 8 because every raster byte carries
//! exactly 8 dots.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::PrintError;
use crate::transport::TransportKind;

/// Default settings file name, resolved against the working directory
pub const DEFAULT_SETTINGS_FILE: &str = "thermal-printer.json";

/// Default print width for 80mm paper
pub const DEFAULT_PRINT_WIDTH: u16 = 576;

/// Default printer endpoint (local CUPS queue)
pub const DEFAULT_PRINT_URL: &str = "http://localhost:631/printers/M200";

/// Printer settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Width of the printed image in dots (multiple of 8)
    pub print_width: u16,
    /// Printer endpoint: URL, device path, or queue name depending on transport
    pub print_url: String,
    /// How the encoded job is delivered
    pub transport: TransportKind,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            print_width: DEFAULT_PRINT_WIDTH,
            print_url: DEFAULT_PRINT_URL.to_string(),
            transport: TransportKind::Ipp,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file. A missing file yields the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PrintError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "settings file not found, using defaults");
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&raw).map_err(|e| {
            PrintError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate and write settings as pretty JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), PrintError> {
        self.validate()?;
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| PrintError::Config(format!("Failed to serialize settings: {}", e)))?;
        fs::write(path, json + "\n")?;
        Ok(())
    }

    /// Reject widths the rasterizer cannot encode.
    pub fn validate(&self) -> Result<(), PrintError> {
        if self.print_width == 0 || self.print_width % 8 != 0 {
            return Err(PrintError::Config(format!(
                "Print width must be a number and a multiple of 8, got {}",
                self.print_width
            )));
        }
        if self.print_url.trim().is_empty() {
            return Err(PrintError::Config("Printer URL cannot be empty".to_string()));
        }
        Ok(())
    }
}
