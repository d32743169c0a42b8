pub mod event;
pub mod gate;
pub mod volunteer;


use axum::{
    Json, Router,
    body::Bytes,
    extract::{FromRequest, Request, rejection::BytesRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use workday_core::WorkdayError;

use crate::state::AppState;

/// Full application: every API route plus CORS and request tracing.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(event::router())
        .merge(volunteer::router())
        .merge(gate::router())
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Request body read as loose JSON.
///
/// Gate-checked routes must answer a bad code with 401 whatever the body
/// looks like, so nothing is rejected here: an empty or non-JSON body
/// reads as `null` and a code that isn't a string reads as blank.
pub struct GateBody(Value);

impl GateBody {
    pub fn parse(bytes: &[u8]) -> Self {
        Self(serde_json::from_slice(bytes).unwrap_or(Value::Null))
    }

    /// String field `key`, or `""` when missing or not a string.
    pub fn code(&self, key: &str) -> &str {
        self.0.get(key).and_then(Value::as_str).unwrap_or_default()
    }

    /// Move field `key` out and parse it. Call only after the gate check.
    pub fn take<T: DeserializeOwned>(&mut self, key: &str) -> Result<T, WorkdayError> {
        let value = self.0.get_mut(key).map(Value::take).unwrap_or(Value::Null);
        serde_json::from_value(value).map_err(|e| WorkdayError::InvalidPayload(e.to_string()))
    }
}

impl<S> FromRequest<S> for GateBody
where
    S: Send + Sync,
{
    type Rejection = BytesRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await?;
        Ok(Self::parse(&bytes))
    }
}

/// Standard API error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Standard API success response
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Json<Self> {
        Json(MessageResponse {
            message: message.into(),
        })
    }
}

/// Convert anyhow errors to HTTP responses.
///
/// The status comes from the first `WorkdayError` in the chain. Client
/// errors report that error's message; server errors report the outermost
/// context and log the full chain.
pub struct AppError(anyhow::Error);

impl AppError {
    fn workday_error(&self) -> Option<&WorkdayError> {
        self.0
            .chain()
            .find_map(|e| e.downcast_ref::<WorkdayError>())
    }

    fn status(&self) -> StatusCode {
        match self.workday_error() {
            Some(WorkdayError::Unauthorized(_)) => StatusCode::UNAUTHORIZED,
            Some(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let error = if status.is_server_error() {
            tracing::error!("request failed: {:#}", self.0);
            self.0.to_string()
        } else {
            self.workday_error()
                .map(|e| e.to_string())
                .unwrap_or_else(|| self.0.to_string())
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
