//! Router for the sessions API

use std::sync::{Arc, RwLock};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};

use super::public;
use crate::api::sessions::SharedChatbot;
use crate::api::state::AppState;

type SharedState = Arc<RwLock<AppState>>;

fn find_session(state: &SharedState, id: &str) -> Option<SharedChatbot> {
    state
        .read()
        .expect("Unable to read share state")
        .sessions
        .get(id)
}

fn not_found(id: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        format!("Chat session {} not found", id),
    )
        .into_response()
}

/// Start a new chat session
async fn create_session(State(state): State<SharedState>) -> impl IntoResponse {
    let mut shared_state = state.write().expect("Unable to write share state");
    let bot = shared_state.factory.create();
    let variant = bot.variant();
    let session_id = shared_state.sessions.create(bot);

    (
        StatusCode::CREATED,
        Json(public::CreateSessionResponse {
            session_id,
            variant,
        }),
    )
}

/// Get the transcript of a chat session
async fn get_session(State(state): State<SharedState>, Path(id): Path<String>) -> Response {
    let Some(session) = find_session(&state, &id) else {
        return not_found(&id);
    };
    let transcript = session.lock().await.transcript().messages().to_vec();

    Json(public::TranscriptResponse { transcript }).into_response()
}

/// End a chat session
async fn delete_session(State(state): State<SharedState>, Path(id): Path<String>) -> Response {
    let removed = state
        .write()
        .expect("Unable to write share state")
        .sessions
        .destroy(&id);

    if removed {
        StatusCode::NO_CONTENT.into_response()
    } else {
        not_found(&id)
    }
}

/// Clear a chat session back to the system message
async fn reset_session(State(state): State<SharedState>, Path(id): Path<String>) -> Response {
    let Some(session) = find_session(&state, &id) else {
        return not_found(&id);
    };
    session.lock().await.reset();

    StatusCode::NO_CONTENT.into_response()
}

/// Create the sessions router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", post(create_session))
        .route("/{id}", get(get_session).delete(delete_session))
        .route("/{id}/reset", post(reset_session))
}
