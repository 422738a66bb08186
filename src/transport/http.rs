//! Raw HTTP POST transport.
//!
//! Posts the job bytes unchanged with `Content-Type: application/octet-stream`.
//! Suitable for print servers that forward the body straight to a printer.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use tracing::info;

use super::{Transport, http_client};
use crate::error::PrintError;

/// Content type of raw printer data
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Sends jobs as the body of an HTTP POST.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, PrintError> {
        Ok(Self {
            client: http_client()?,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn send(&self, data: &[u8], destination: &str) -> Result<(), PrintError> {
        let response = self
            .client
            .post(destination)
            .header(CONTENT_TYPE, OCTET_STREAM)
            .body(data.to_vec())
            .send()
            .await
            .map_err(|e| PrintError::Transport(format!("POST {} failed: {}", destination, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PrintError::Transport(format!(
                "POST {} returned {}: {}",
                destination,
                status,
                body.trim()
            )));
        }

        info!(destination, bytes = data.len(), "job posted");
        Ok(())
    }
}
