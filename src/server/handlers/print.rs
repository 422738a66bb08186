//! Image printing handlers.
//!
//! All three endpoints take a raw encoded image (PNG, JPEG, ...) as the
//! request body. Decoding and rasterizing run on the blocking thread pool.

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::sync::Arc;

use crate::{
    error::PrintError,
    job,
    protocol::RasterCommand,
    render::{MonochromeBitmap, preview},
    source::PixelSource,
};

use super::super::state::AppState;
use super::error_response;

/// Response from the print endpoint.
#[derive(Debug, Serialize)]
pub struct PrintResponse {
    pub success: bool,
    /// Printed width in dots
    pub width: usize,
    /// Printed height in rows
    pub height: usize,
    /// Size of the job sent to the printer
    pub bytes: usize,
    /// RFC 3339 timestamp of submission
    pub printed_at: String,
}

/// Decode, fit, and encode an uploaded image.
async fn encode_upload(
    body: Bytes,
    max_width: u32,
) -> Result<(MonochromeBitmap, RasterCommand), PrintError> {
    if body.is_empty() {
        return Err(PrintError::Image("Request body is empty".to_string()));
    }

    tokio::task::spawn_blocking(move || {
        let source = PixelSource::from_encoded(&body, max_width)?;
        job::encode_with_bitmap(&source.pixels, source.width)
    })
    .await
    .map_err(|e| PrintError::Image(format!("Processing error: {}", e)))?
}

/// POST /print - Encode the posted image and send it to the printer.
pub async fn print(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let (settings, transport) = state.snapshot().await;

    let (bitmap, command) = match encode_upload(body, settings.print_width as u32).await {
        Ok(encoded) => encoded,
        Err(e) => return error_response(e),
    };

    if let Err(e) = job::send(transport.as_ref(), &settings.print_url, &command).await {
        return error_response(e);
    }

    Json(PrintResponse {
        success: true,
        width: bitmap.width,
        height: bitmap.height,
        bytes: command.len(),
        printed_at: chrono::Local::now().to_rfc3339(),
    })
    .into_response()
}

/// POST /api/encode - Return the encoded job without printing.
pub async fn encode(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let max_width = state.settings.read().await.print_width as u32;

    match encode_upload(body, max_width).await {
        Ok((_, command)) => (
            [(header::CONTENT_TYPE, "application/octet-stream")],
            command.into_bytes(),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /api/preview - Return a PNG of exactly the dots that would print.
pub async fn preview(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let max_width = state.settings.read().await.print_width as u32;

    let png = match encode_upload(body, max_width).await {
        Ok((bitmap, _)) => preview::to_png(&bitmap),
        Err(e) => Err(e),
    };

    match png {
        Ok(png) => ([(header::CONTENT_TYPE, "image/png")], png).into_response(),
        Err(e) => error_response(e),
    }
}
