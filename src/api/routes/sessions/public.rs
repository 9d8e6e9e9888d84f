//! Public types for the sessions API
use serde::{Deserialize, Serialize};

use crate::ai::chat::Variant;
use crate::openai::Message;

#[derive(Deserialize, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: String,
    pub variant: Variant,
}

#[derive(Deserialize, Serialize)]
pub struct TranscriptResponse {
    pub transcript: Vec<Message>,
}
