//! HTTP request handlers

use super::sse::sse_stream;
use super::types::{ChatRequest, ChatResponse, ErrorResponse, MessagesResponse};
use super::AppState;
use crate::db::DbError;
use crate::dispatch::DispatchError;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Turn dispatch
        .route("/api/travel-agent", post(send_chat))
        // History replay
        .route("/api/conversations/:id/messages", get(get_messages))
        // Realtime mirror
        .route("/api/conversations/:id/stream", get(stream_conversation))
        .with_state(state)
}

// ============================================================
// Turn Dispatch
// ============================================================

async fn send_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    if request.message.trim().is_empty() {
        return Err(AppError::BadRequest("message must not be empty".to_string()));
    }

    let outcome = state
        .dispatcher
        .dispatch(
            request.user_id.as_deref(),
            request.conversation_id.as_deref(),
            &request.message,
        )
        .await?;

    Ok(Json(ChatResponse {
        response: outcome.response,
        agent: outcome.agent,
        conversation_id: outcome.conversation_id,
    }))
}

// ============================================================
// History Replay
// ============================================================

async fn get_messages(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessagesResponse>, AppError> {
    state.store.db().get_conversation(&id)?;
    let messages = state.store.db().get_messages(&id)?;
    Ok(Json(MessagesResponse { messages }))
}

// ============================================================
// Realtime Mirror
// ============================================================

async fn stream_conversation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    state.store.db().get_conversation(&id)?;

    // Subscribe before the replay read so nothing appended in between
    // is missed; clients dedupe by message id.
    let rx = state.store.subscribe(&id).await;
    let messages = state.store.db().get_messages(&id)?;

    Ok(sse_stream(messages, rx).into_response())
}

// ============================================================
// Error Handling
// ============================================================

enum AppError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
    Upstream(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}

impl From<DbError> for AppError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::ConversationNotFound(id) => {
                AppError::NotFound(format!("Conversation not found: {id}"))
            }
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<DispatchError> for AppError {
    fn from(e: DispatchError) -> Self {
        match e {
            DispatchError::Db(db) => db.into(),
            DispatchError::Advisory(advisory) if advisory.kind.is_configuration() => {
                AppError::Internal(advisory.to_string())
            }
            DispatchError::Advisory(advisory) => AppError::Upstream(advisory.to_string()),
        }
    }
}
