//! Login, dashboard, and the authenticated action dispatcher.
//!
//! The session gate is evaluated inside each handler rather than as a
//! middleware layer: an unauthenticated request to a gated path is not an
//! error, it is the login page.

use std::sync::Arc;

use axum::Form;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use tracing::info;

use vpanel_core::expiry;
use vpanel_core::{User, settings};

use crate::error::AppError;
use crate::render;
use crate::state::AppState;

/// Build the admin router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(dashboard).post(dispatch_action))
        .route("/login", get(login_form).post(login))
}

#[derive(Debug, Deserialize)]
struct LoginForm {
    #[serde(default)]
    password: String,
}

/// Form fields for every dashboard action; the `action` discriminator
/// decides which of the optional fields matter.
#[derive(Debug, Deserialize)]
struct ActionForm {
    #[serde(default)]
    action: String,
    #[serde(rename = "AdminUrl")]
    admin_url: Option<String>,
    #[serde(rename = "Marquee")]
    marquee: Option<String>,
    #[serde(rename = "VpnData")]
    vpn_data: Option<String>,
    #[serde(rename = "ID")]
    id: Option<String>,
    #[serde(rename = "Expiry")]
    expiry: Option<String>,
}

/// `GET /login`.
async fn login_form() -> Html<String> {
    render::login_page()
}

/// `POST /login` — fixed-status rejection on mismatch, cookie + redirect
/// on success.
async fn login(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> Response {
    if state.session.verify_password(&form.password) {
        info!("operator logged in");
        (
            StatusCode::FOUND,
            [
                (header::SET_COOKIE, state.session.login_cookie()),
                (header::LOCATION, "/".to_owned()),
            ],
        )
            .into_response()
    } else {
        (StatusCode::FORBIDDEN, "Wrong Password").into_response()
    }
}

/// `GET /` — the dashboard, or the login form when unauthenticated.
async fn dashboard(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    if !state.session.is_authorized(&headers) {
        return Ok(render::login_page().into_response());
    }

    let settings = state.settings.snapshot().await?;
    let users = state.users.list().await?;
    let vpn = state.blob.load().await?;

    Ok(render::dashboard(&settings, &users, &vpn).into_response())
}

/// `POST /` — dispatch one mutation action, then bounce back to the
/// dashboard.
async fn dispatch_action(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<ActionForm>,
) -> Result<Response, AppError> {
    if !state.session.is_authorized(&headers) {
        return Ok(render::login_page().into_response());
    }

    match form.action.as_str() {
        "update_config" => {
            state
                .settings
                .set(settings::ADMIN_URL, form.admin_url.as_deref().unwrap_or(""))
                .await?;
            state
                .settings
                .set(settings::MARQUEE, form.marquee.as_deref().unwrap_or(""))
                .await?;
        }
        "update_vpn" => {
            let text = form.vpn_data.as_deref().unwrap_or("");
            state.blob.save(text).await?;
            info!(bytes = text.len(), "vpn configuration saved");
        }
        "add_user" => {
            let id = required_id(form.id.as_deref())?;
            let user = User {
                id: id.to_owned(),
                expiry: expiry::from_input(form.expiry.as_deref().unwrap_or("")),
            };
            state.users.upsert(&user).await?;
            info!(id, expiry = %user.expiry, "user saved");
        }
        "delete_user" => {
            let id = required_id(form.id.as_deref())?;
            state.users.delete(id).await?;
            info!(id, "user deleted");
        }
        "reset_trial" => {
            let id = required_id(form.id.as_deref())?;
            state.trial.reset(id).await?;
        }
        other => {
            return Err(AppError::BadRequest(format!("unknown action '{other}'")));
        }
    }

    Ok(Redirect::to("/").into_response())
}

/// Fallback for unmatched paths: the login form for strangers, the
/// dashboard for the operator.
pub async fn fallback(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    if state.session.is_authorized(&headers) {
        Redirect::to("/").into_response()
    } else {
        render::login_page().into_response()
    }
}

fn required_id(id: Option<&str>) -> Result<&str, AppError> {
    match id.map(str::trim) {
        Some(id) if !id.is_empty() => Ok(id),
        _ => Err(AppError::BadRequest("ID is required".to_owned())),
    }
}
