//! Per-user chat sessions for the web UI.
use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use uuid::Uuid;

use crate::ai::chat::{BoxedChatbot, Chat, RagChat, Variant};
use crate::openai::SharedChatModel;
use crate::rag::VectorStore;

/// A session's chatbot. The mutex serializes turns so two requests
/// for the same session can't interleave transcript updates.
pub type SharedChatbot = Arc<Mutex<BoxedChatbot>>;

/// Creates a new chatbot for each session. The vector store is
/// shared by every RAG session.
#[derive(Clone)]
pub struct BotFactory {
    model: SharedChatModel,
    store: Option<VectorStore>,
}

impl BotFactory {
    pub fn plain(model: SharedChatModel) -> Self {
        Self { model, store: None }
    }

    pub fn rag(model: SharedChatModel, store: VectorStore) -> Self {
        Self {
            model,
            store: Some(store),
        }
    }

    pub fn variant(&self) -> Variant {
        if self.store.is_some() {
            Variant::Rag
        } else {
            Variant::Plain
        }
    }

    pub fn store(&self) -> Option<&VectorStore> {
        self.store.as_ref()
    }

    pub fn create(&self) -> BoxedChatbot {
        match &self.store {
            Some(store) => Box::new(RagChat::builder(self.model.clone(), store.clone()).build()),
            None => Box::new(Chat::builder(self.model.clone()).build()),
        }
    }
}

/// Chat sessions keyed by session ID with explicit create, get, and
/// destroy.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: HashMap<String, SharedChatbot>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `bot` under a newly generated session ID.
    pub fn create(&mut self, bot: BoxedChatbot) -> String {
        let session_id = Uuid::new_v4().to_string();
        self.sessions
            .insert(session_id.clone(), Arc::new(Mutex::new(bot)));
        tracing::debug!("Created chat session {}", session_id);
        session_id
    }

    pub fn get(&self, session_id: &str) -> Option<SharedChatbot> {
        self.sessions.get(session_id).cloned()
    }

    /// Removes the session. Returns false if it didn't exist.
    pub fn destroy(&mut self, session_id: &str) -> bool {
        let removed = self.sessions.remove(session_id).is_some();
        if removed {
            tracing::debug!("Destroyed chat session {}", session_id);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
