//! # HTTP Print Server
//!
//! Accepts images over HTTP, encodes them as raster jobs, and delivers them
//! to the configured printer.
//!
//! ## Usage
//!
//! ```bash
//! rasterprint serve --listen 0.0.0.0:8090
//! curl --data-binary @receipt.png http://localhost:8090/print
//! ```
//!
//! ## Routes
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | POST | `/print` | Encode the posted image and print it |
//! | POST | `/api/encode` | Return the encoded job without printing |
//! | POST | `/api/preview` | Return a PNG of the thresholded dots |
//! | GET | `/api/settings` | Current settings |
//! | PUT | `/api/settings` | Replace settings |

mod handlers;
mod state;

pub use state::{AppState, ServerConfig};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::PrintError;

/// Largest accepted upload
pub const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Build the router for `state`.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/print", post(handlers::print::print))
        .route("/api/encode", post(handlers::print::encode))
        .route("/api/preview", post(handlers::print::preview))
        .route(
            "/api/settings",
            get(handlers::settings::show).put(handlers::settings::update),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use std::sync::Arc;
/// use rasterprint::printer::Settings;
/// use rasterprint::server::{AppState, ServerConfig, serve};
/// use rasterprint::transport;
///
/// # async fn example() -> Result<(), rasterprint::error::PrintError> {
/// let settings = Settings::default();
/// let transport = transport::for_kind(settings.transport)?;
/// let config = ServerConfig {
///     listen_addr: "0.0.0.0:8090".to_string(),
///     settings_path: None,
/// };
///
/// serve(AppState::new(config, settings, Arc::from(transport))).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(state: AppState) -> Result<(), PrintError> {
    let listen_addr = state.config.listen_addr.clone();
    {
        let settings = state.settings.read().await;
        let transport = state.transport().await;
        info!(
            listen = %listen_addr,
            transport = transport.name(),
            destination = %settings.print_url,
            width = settings.print_width,
            "print server starting"
        );
    }

    let app = router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(&listen_addr)
        .await
        .map_err(|e| PrintError::Transport(format!("Failed to bind to {}: {}", listen_addr, e)))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| PrintError::Transport(format!("Server error: {}", e)))?;

    Ok(())
}
