//! Router for the sources API

use std::sync::{Arc, RwLock};

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use super::public;
use crate::ai::chat::DEFAULT_K;
use crate::api::state::AppState;

type SharedState = Arc<RwLock<AppState>>;

/// Search the vector store without touching any chat session
async fn sources_handler(
    State(state): State<SharedState>,
    Query(params): Query<public::SourcesQuery>,
) -> Result<Json<public::SourcesResponse>, crate::api::public::ApiError> {
    let store = state
        .read()
        .expect("Unable to read share state")
        .factory
        .store()
        .cloned();

    let k = params.k.unwrap_or(DEFAULT_K);
    let sources = match store {
        Some(store) => store.similarity_search(&params.query, k).await?,
        None => Vec::new(),
    };

    Ok(Json(public::SourcesResponse {
        query: params.query,
        sources,
    }))
}

/// Create the sources router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", get(sources_handler))
}
