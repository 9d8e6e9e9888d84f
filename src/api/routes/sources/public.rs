//! Public types for the sources API
use serde::{Deserialize, Serialize};

use crate::rag::Chunk;

#[derive(Deserialize)]
pub struct SourcesQuery {
    pub query: String,
    pub k: Option<usize>,
}

#[derive(Deserialize, Serialize)]
pub struct SourcesResponse {
    pub query: String,
    pub sources: Vec<Chunk>,
}
