//! humcap-server library - hum captcha HTTP service
//!
//! Serves tunes to the browser client, synthesizes their audio and verifies
//! hummed recordings through the pure verification core in `humcap-common`.

use axum::extract::DefaultBodyLimit;
use axum::Router;
use humcap_common::config::TomlConfig;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;
pub mod logging;
pub mod synth;

/// Application state shared across HTTP handlers
///
/// Read-only after startup; handlers never mutate it.
#[derive(Clone)]
pub struct AppState {
    /// Bootstrap configuration
    pub config: Arc<TomlConfig>,
}

impl AppState {
    /// Create new application state
    pub fn new(config: TomlConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_body_bytes;

    Router::new()
        .merge(api::ui_routes())
        .merge(api::health_routes())
        .merge(api::captcha_routes())
        .merge(api::audio_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::custom(api::handle_panic))
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
}
