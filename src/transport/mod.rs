//! # Printer Transport Layer
//!
//! This module provides delivery backends for encoded print jobs. Every
//! backend implements the same [`Transport`] capability: send these bytes to
//! this destination. The encoder never knows which one is in use.
//!
//! ## Available Transports
//!
//! | Kind | Destination | Delivery |
//! |------|-------------|----------|
//! | [`ipp`] | `http://host:631/printers/M200`, `ipp://host/printers/M200` | IPP Print-Job |
//! | [`http`] | `http://host:8090/print` | raw POST, `application/octet-stream` |
//! | [`device`] | `/dev/usb/lp0`, `/dev/rfcomm0` | direct writes to a device node |
//! | [`lp`] | `M200` (CUPS queue) | `lp -d <queue> -o raw <file>` |

pub mod device;
pub mod http;
pub mod ipp;
pub mod lp;

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::PrintError;

pub use device::DeviceTransport;
pub use http::HttpTransport;
pub use ipp::IppTransport;
pub use lp::LpTransport;

/// User agent sent by the HTTP-based transports
pub const USER_AGENT: &str = "rasterprint/0.1";

/// Request timeout for the HTTP-based transports
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Delivers an opaque byte stream to a printer endpoint.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Transport name (lowercase, e.g., "ipp").
    fn name(&self) -> &'static str;

    /// Send `data` to `destination`. Interpretation of `destination` is
    /// backend-specific (URL, device path, or queue name).
    async fn send(&self, data: &[u8], destination: &str) -> Result<(), PrintError>;
}

/// Which [`Transport`] implementation to use.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// IPP Print-Job request
    #[default]
    Ipp,
    /// Raw HTTP POST
    Http,
    /// Local device node
    Device,
    /// CUPS `lp` command in raw mode
    Lp,
}

impl TransportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ipp => "ipp",
            Self::Http => "http",
            Self::Device => "device",
            Self::Lp => "lp",
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build the transport for `kind`.
pub fn for_kind(kind: TransportKind) -> Result<Box<dyn Transport>, PrintError> {
    Ok(match kind {
        TransportKind::Ipp => Box::new(IppTransport::new()?),
        TransportKind::Http => Box::new(HttpTransport::new()?),
        TransportKind::Device => Box::new(DeviceTransport::default()),
        TransportKind::Lp => Box::new(LpTransport::default()),
    })
}

/// Shared reqwest client builder for the HTTP-based transports.
pub(crate) fn http_client() -> Result<reqwest::Client, PrintError> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(|e| PrintError::Transport(format!("HTTP client error: {}", e)))
}
