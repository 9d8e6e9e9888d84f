//! Public types for the chat API
use serde::{Deserialize, Serialize};

use crate::rag::Chunk;

#[derive(Deserialize, Serialize)]
pub struct ChatRequest {
    pub session_id: String,
    pub message: String,
}

#[derive(Deserialize, Serialize)]
pub struct ChatResponse {
    pub message: String,
    // Always empty for the plain chatbot
    pub sources: Vec<Chunk>,
}
