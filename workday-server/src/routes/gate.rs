//! Standalone gate code check

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use serde::Serialize;

use workday_core::Role;

use crate::routes::GateBody;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/verify-gate-code", post(verify))
}

#[derive(Serialize)]
pub struct VerifyResponse {
    pub valid: bool,
    pub message: String,
}

/// POST /api/verify-gate-code - Check a code without touching any state
///
/// Body: `{ code, type }` where `type` is `volunteer` or `organizer`.
async fn verify(
    State(state): State<AppState>,
    body: GateBody,
) -> (StatusCode, Json<VerifyResponse>) {
    let code = body.code("code");
    let role = body
        .code("type")
        .parse::<Role>()
        .ok()
        .filter(|role| state.gate.verify(code, *role));

    let (status, valid, message) = match role {
        Some(Role::Volunteer) => (StatusCode::OK, true, "Volunteer gate code verified"),
        Some(Role::Organizer) => (StatusCode::OK, true, "Organizer gate code verified"),
        None => (StatusCode::UNAUTHORIZED, false, "Invalid gate code"),
    };

    (
        status,
        Json(VerifyResponse {
            valid,
            message: message.to_string(),
        }),
    )
}
