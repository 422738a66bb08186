//! # Printer Module
//!
//! Printer settings: print width, endpoint, and transport selection.
//!
//! ## Modules
//!
//! - [`config`]: Persisted [`Settings`]

pub mod config;

pub use config::Settings;
