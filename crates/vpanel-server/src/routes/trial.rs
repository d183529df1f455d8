//! Public self-service trial flow.
//!
//! `GET /trial` renders the claim form; `POST /trial` runs the issuance
//! gate. A repeat claim renders a failure page rather than an error body —
//! the audience is a person on a phone, not an API client.

use std::sync::Arc;

use axum::Form;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use tracing::warn;

use vpanel_core::TrialError;

use crate::error::AppError;
use crate::render;
use crate::state::AppState;

/// Build the trial router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/trial", get(claim_form).post(claim))
}

#[derive(Debug, Deserialize)]
struct ClaimForm {
    #[serde(rename = "ID", default)]
    id: String,
}

/// `GET /trial`.
async fn claim_form() -> Html<String> {
    render::trial_form()
}

/// `POST /trial`.
async fn claim(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ClaimForm>,
) -> Result<Response, AppError> {
    let id = form.id.trim();
    if id.is_empty() {
        return Err(AppError::BadRequest("device ID is required".to_owned()));
    }

    match state.trial.issue(id).await {
        Ok(user) => Ok(render::trial_granted(&user).into_response()),
        Err(TrialError::AlreadyUsed { .. }) => {
            warn!(id, "repeat trial claim rejected");
            Ok((StatusCode::CONFLICT, render::trial_already_used(id)).into_response())
        }
        Err(other) => Err(other.into()),
    }
}
