//! HTTP routes.
//!
//! Organized by audience:
//! - `export`: public JSON / plaintext read endpoints for the client app
//! - `trial`: public self-service trial flow
//! - `admin`: login, dashboard, and the authenticated action dispatcher

pub mod admin;
pub mod export;
pub mod trial;

use std::sync::Arc;

use axum::Router;
use axum::http::HeaderValue;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router with all routes and middleware.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(export::router())
        .merge(trial::router())
        .merge(admin::router())
        .fallback(admin::fallback)
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            axum::http::header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            axum::http::header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .with_state(state)
}
