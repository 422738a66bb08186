//! Settings API handlers.

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::info;

use crate::{printer::Settings, transport};

use super::super::state::AppState;
use super::error_response;

/// GET /api/settings - Get the current settings.
pub async fn show(State(state): State<Arc<AppState>>) -> Json<Settings> {
    let settings = state.settings.read().await;
    Json(settings.clone())
}

/// PUT /api/settings - Replace the settings.
///
/// Invalid settings are rejected with 400 and leave the current ones intact.
/// A new transport is built when the transport kind changes. The settings
/// write lock is held until the file, the transport, and the in-memory
/// settings all agree.
pub async fn update(
    State(state): State<Arc<AppState>>,
    Json(new_settings): Json<Settings>,
) -> Response {
    let mut settings = state.settings.write().await;

    if let Err(e) = new_settings.validate() {
        return error_response(e);
    }

    let new_transport = if settings.transport != new_settings.transport {
        match transport::for_kind(new_settings.transport) {
            Ok(t) => Some(t),
            Err(e) => return error_response(e),
        }
    } else {
        None
    };

    if let Some(path) = &state.config.settings_path
        && let Err(e) = new_settings.save(path)
    {
        return error_response(e);
    }

    if let Some(t) = new_transport {
        *state.transport.write().await = Arc::from(t);
    }

    info!(
        width = new_settings.print_width,
        destination = %new_settings.print_url,
        transport = %new_settings.transport,
        "settings updated"
    );
    *settings = new_settings.clone();
    Json(new_settings).into_response()
}
