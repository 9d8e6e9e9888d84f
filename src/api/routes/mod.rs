//! API routes module

pub mod chat;
pub mod sessions;
pub mod sources;

use std::sync::{Arc, RwLock};

use crate::api::state::AppState;
use axum::Router;

type SharedState = Arc<RwLock<AppState>>;

/// Create the combined API router
pub fn router() -> Router<SharedState> {
    Router::new()
        // Session lifecycle routes
        .nest("/sessions", sessions::router())
        // Chat routes
        .nest("/chat", chat::router())
        // Retrieval routes
        .nest("/sources", sources::router())
}
