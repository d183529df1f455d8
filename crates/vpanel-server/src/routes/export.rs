//! Public read endpoints consumed by the client app.
//!
//! `/raw` (alias `/config.json`) exports the settings and the user list as
//! JSON; `/vpn` exports the reassembled VPN configuration as plain text.
//! Both carry a wildcard CORS header so the app can fetch them from any
//! origin. `/vpn` is deliberately open — the client app fetches it without
//! credentials, and both observed deployments depend on that. `/raw` can
//! optionally be withheld from unauthenticated *browsers* (humans poking
//! at the JSON) while staying open to the app.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};

use vpanel_core::User;

use crate::error::AppError;
use crate::session;
use crate::state::AppState;

/// Build the export router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/raw", get(raw_json))
        .route("/config.json", get(raw_json))
        .route("/vpn", get(vpn_text))
        .layer(CorsLayer::new().allow_origin(Any))
}

/// Full export payload. Field names are the wire contract with the app.
#[derive(Debug, Serialize)]
struct ExportPayload {
    #[serde(rename = "AdminUrl")]
    admin_url: String,
    #[serde(rename = "Marquee")]
    marquee: String,
    #[serde(rename = "Users")]
    users: Vec<User>,
}

/// `GET /raw` and `GET /config.json`.
async fn raw_json(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    if state.gate_browser_raw
        && !state.session.is_authorized(&headers)
        && session::is_browser(&headers)
    {
        return Ok((StatusCode::FORBIDDEN, "Forbidden").into_response());
    }

    let settings = state.settings.snapshot().await?;
    let users = state.users.list().await?;

    Ok(Json(ExportPayload {
        admin_url: settings.admin_url,
        marquee: settings.marquee,
        users,
    })
    .into_response())
}

/// `GET /vpn` — the reassembled blob, as plain text.
async fn vpn_text(State(state): State<Arc<AppState>>) -> Result<String, AppError> {
    Ok(state.blob.load().await?)
}
