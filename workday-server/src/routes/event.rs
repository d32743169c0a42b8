//! Event endpoints

use anyhow::Context;
use axum::{Json, Router, extract::State, routing::get};

use workday_core::{Event, Role, signup};

use crate::routes::{AppError, GateBody, MessageResponse};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/event", get(get_event).post(replace_event))
}

/// GET /api/event - Current event with every task roster
async fn get_event(State(state): State<AppState>) -> Result<Json<Event>, AppError> {
    let event = state
        .store
        .read_event()
        .context("Failed to load event data")?;

    Ok(Json(event))
}

/// POST /api/event - Replace the event wholesale (organizer only)
///
/// Body: `{ gateCode, eventData }`. Fields of `eventData` this service
/// doesn't model are stored untouched.
async fn replace_event(
    State(state): State<AppState>,
    mut body: GateBody,
) -> Result<Json<MessageResponse>, AppError> {
    state.gate.require(body.code("gateCode"), Role::Organizer)?;

    let event: Event = body.take("eventData")?;

    let _guard = state.write_lock().await;
    signup::replace_event(&state.store, &event).context("Failed to update event")?;

    Ok(MessageResponse::new("Event updated successfully"))
}
