//! Volunteer signup and removal endpoints

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, post},
};
use chrono::Utc;
use serde::Serialize;

use workday_core::notify::notify_signup;
use workday_core::{NewVolunteer, Role, Volunteer, signup};

use crate::routes::{AppError, GateBody, MessageResponse};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/volunteer", post(sign_up))
        .route("/api/volunteer/{task_id}/{volunteer_id}", delete(remove))
}

#[derive(Serialize)]
pub struct SignupResponse {
    pub message: String,
    pub volunteer: Volunteer,
}

/// POST /api/volunteer - Claim a slot on a task
///
/// Body: `{ gateCode, volunteer: { name, email, phone?, notes?, taskId } }`
async fn sign_up(
    State(state): State<AppState>,
    mut body: GateBody,
) -> Result<Json<SignupResponse>, AppError> {
    state.gate.require(body.code("gateCode"), Role::Volunteer)?;

    let new_volunteer: NewVolunteer = body.take("volunteer")?;

    let signup = {
        let _guard = state.write_lock().await;
        signup::sign_up(&state.store, new_volunteer, Utc::now())
            .context("Failed to register volunteer")?
    };

    if let Some(task) = signup.event.task(&signup.task_id) {
        notify_signup(&state.notifier, &signup.event, task, &signup.volunteer).await;
    }

    Ok(Json(SignupResponse {
        message: "Volunteer registered successfully".to_string(),
        volunteer: signup.volunteer,
    }))
}

/// DELETE /api/volunteer/:task_id/:volunteer_id - Remove a signup
async fn remove(
    State(state): State<AppState>,
    Path((task_id, volunteer_id)): Path<(String, String)>,
    body: GateBody,
) -> Result<Json<MessageResponse>, AppError> {
    state.gate.require(body.code("gateCode"), Role::Volunteer)?;

    let _guard = state.write_lock().await;
    signup::remove_volunteer(&state.store, &task_id, &volunteer_id)
        .context("Failed to remove volunteer")?;

    Ok(MessageResponse::new("Volunteer removed successfully"))
}
