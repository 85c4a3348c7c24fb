//! # Chat Server Handlers
//!
//! File: cli/src/commands/serve/handlers.rs
//!
//! ## Overview
//!
//! Routes served by `lookaroun serve`:
//!
//! | Method   | Path                          | Response                              |
//! |----------|-------------------------------|---------------------------------------|
//! | `GET`    | `/`                           | chat page                             |
//! | `GET`    | `/api/health`                 | `{ "status", "sessions" }`            |
//! | `GET`    | `/api/about`                  | sidebar content                       |
//! | `POST`   | `/api/sessions`               | `201 { "session_id" }`                |
//! | `GET`    | `/api/sessions/{id}`          | `{ "session_id", "transcript" }`      |
//! | `POST`   | `/api/sessions/{id}/messages` | `{ "answer", "transcript" }`          |
//! | `DELETE` | `/api/sessions/{id}/messages` | `204`, transcript cleared             |
//! | `DELETE` | `/api/sessions/{id}`          | `204`, session ended                  |
//!
//! Failures are returned as `{ "error": "..." }` with a status chosen from the
//! underlying `LookarounError`: 404 for an unknown session, 400 for an empty
//! message, 503 when the conversational generator cannot be started.
//!
use crate::bot::assistant::Assistant;
use crate::bot::knowledge::{ABOUT_HIGHLIGHTS, ABOUT_TITLE, SUGGESTED_QUESTIONS};
use crate::bot::session::{SessionStore, Turn};
use crate::core::error::LookarounError;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error};
use uuid::Uuid;

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub assistant: Arc<Assistant>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(assistant: Assistant) -> Self {
        Self {
            assistant: Arc::new(assistant),
            sessions: Arc::new(SessionStore::new()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AboutResponse {
    pub title: &'static str,
    pub highlights: &'static [&'static str],
    pub suggested_questions: &'static [&'static str],
}

#[derive(Debug, Serialize)]
pub struct SessionCreated {
    pub session_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub transcript: Vec<Turn>,
}

#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub answer: String,
    pub transcript: Vec<Turn>,
}

/// Error wrapper turning any propagated error into a JSON response.
#[derive(Debug)]
pub struct ApiError(anyhow::Error);

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0.downcast_ref::<LookarounError>() {
            Some(LookarounError::SessionNotFound { .. }) => StatusCode::NOT_FOUND,
            Some(LookarounError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            Some(LookarounError::GeneratorUnavailable { .. }) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!("Request failed: {:#}", self.0);
        } else {
            debug!("Request rejected ({}): {}", status, self.0);
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

type ApiResult<T> = std::result::Result<T, ApiError>;

/// Builds the router for the chat page and the JSON API.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/health", get(health))
        .route("/api/about", get(about))
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/{id}", get(get_session).delete(end_session))
        .route(
            "/api/sessions/{id}/messages",
            post(post_message).delete(clear_session),
        )
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(include_str!("../../../static/index.html"))
}

async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "sessions": state.sessions.len().await,
    }))
}

async fn about() -> Json<AboutResponse> {
    Json(AboutResponse {
        title: ABOUT_TITLE,
        highlights: ABOUT_HIGHLIGHTS,
        suggested_questions: SUGGESTED_QUESTIONS,
    })
}

async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionCreated>) {
    let session_id = state.sessions.create().await;
    (StatusCode::CREATED, Json(SessionCreated { session_id }))
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SessionView>> {
    let session = state.sessions.get(id).await?;
    let session = session.lock().await;
    Ok(Json(SessionView {
        session_id: id,
        transcript: session.transcript().to_vec(),
    }))
}

async fn post_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<MessageRequest>,
) -> ApiResult<Json<MessageResponse>> {
    if request.text.trim().is_empty() {
        return Err(LookarounError::InvalidInput("message text must not be empty".into()).into());
    }

    let session = state.sessions.get(id).await?;
    let mut session = session.lock().await;
    let answer = state.assistant.reply(&mut session, &request.text).await?;

    Ok(Json(MessageResponse {
        answer,
        transcript: session.transcript().to_vec(),
    }))
}

async fn clear_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let session = state.sessions.get(id).await?;
    session.lock().await.clear();
    Ok(StatusCode::NO_CONTENT)
}

async fn end_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.sessions.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
