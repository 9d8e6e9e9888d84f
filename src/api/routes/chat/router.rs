//! Router for the chat API

use std::sync::{Arc, RwLock};

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};

use super::public;
use crate::ai::chat::DEFAULT_K;
use crate::api::state::AppState;

type SharedState = Arc<RwLock<AppState>>;

/// Run the next turn of a chat session
async fn chat_handler(
    State(state): State<SharedState>,
    Json(payload): Json<public::ChatRequest>,
) -> Result<Response, crate::api::public::ApiError> {
    let session = state
        .read()
        .expect("Unable to read share state")
        .sessions
        .get(&payload.session_id);

    let Some(session) = session else {
        return Ok((
            StatusCode::NOT_FOUND,
            format!("Chat session {} not found", payload.session_id),
        )
            .into_response());
    };

    // Held for the whole turn so requests for the same session run
    // one at a time
    let mut bot = session.lock().await;
    let message = bot.chat(&payload.message).await?;
    let sources = bot.sources(&payload.message, DEFAULT_K).await?;

    Ok(Json(public::ChatResponse { message, sources }).into_response())
}

/// Create the chat router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", post(chat_handler))
}
