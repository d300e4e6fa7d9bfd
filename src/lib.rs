//! Submission Box
//!
//! A single-page upload form for student work. Each submission is stored
//! under `<upload root>/<date>/<student id>/`, checksummed with CRC-32 and
//! recorded in an append-only log; the checksum is shown back to the
//! student as a receipt.

pub mod config;
pub mod error;
pub mod flash;
pub mod html;
pub mod routes;
pub mod state;
pub mod submission;

use axum::Router;
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the application router
pub fn app(state: AppState) -> Router {
    let max_body = state.config().uploads.max_content_length;

    Router::new()
        .merge(routes::submit::router(max_body))
        .nest("/health", routes::health::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
