//! HTTP handlers for the server.

pub mod print;
pub mod settings;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::warn;

use crate::error::PrintError;

/// Status code for a failed request.
///
/// Bad input is the client's fault; a printer that refused or could not be
/// reached is reported as a bad gateway.
pub fn status_for(err: &PrintError) -> StatusCode {
    match err {
        PrintError::Raster(_)
        | PrintError::Image(_)
        | PrintError::ImageTooTall { .. }
        | PrintError::Config(_) => StatusCode::BAD_REQUEST,
        PrintError::Transport(_) => StatusCode::BAD_GATEWAY,
        PrintError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Generate error response JSON.
pub fn error_response(err: PrintError) -> Response {
    let status = status_for(&err);
    warn!(status = status.as_u16(), error = %err, "request failed");
    (
        status,
        Json(json!({ "success": false, "error": err.to_string() })),
    )
        .into_response()
}
