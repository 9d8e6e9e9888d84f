use std::path::Path;
use std::sync::Arc;

use anyhow::{Error, Result};
use async_trait::async_trait;

use super::core::{Chatbot, Variant};
use super::models::Transcript;
use crate::ai::prompt::{self, RAG_SYSTEM_MESSAGE};
use crate::core::AppConfig;
use crate::openai::{Message, OpenAIChatModel, Role, SharedChatModel};
use crate::rag::{Chunk, StoreState, VectorStore, embedder_from_config};

/// Number of chunks retrieved for each question.
pub const DEFAULT_K: usize = 3;

/// Chatbot that grounds every answer in chunks retrieved for the
/// current question.
///
/// The transcript stores the literal question. The model instead sees
/// the prior history followed by a system message carrying freshly
/// retrieved context and then the question.
pub struct RagChat {
    model: SharedChatModel,
    store: VectorStore,
    transcript: Transcript,
    k: usize,
}

impl RagChat {
    pub fn builder(model: SharedChatModel, store: VectorStore) -> RagChatBuilder {
        RagChatBuilder::new(model, store)
    }

    /// Opens the vector store, building it from the configured
    /// documents on the first run.
    pub async fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let store = open_store(config).await?;
        let model = OpenAIChatModel::new(
            &config.openai_api_hostname,
            &config.openai_api_key,
            &config.openai_model,
            config.openai_temperature,
        );
        Ok(RagChatBuilder::new(Arc::new(model), store).build())
    }

    pub fn store(&self) -> &VectorStore {
        &self.store
    }

    /// Chunks most similar to `query`. Doesn't touch the transcript.
    pub async fn get_sources(&self, query: &str, k: usize) -> Result<Vec<Chunk>, Error> {
        self.store.similarity_search(query, k).await
    }

    async fn relevant_context(&self, query: &str) -> Result<String, Error> {
        let chunks = self.get_sources(query, self.k).await?;
        let context = chunks
            .iter()
            .map(|c| c.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        Ok(context)
    }
}

/// Brings the vector store for `config` to the ready state.
pub async fn open_store(config: &AppConfig) -> Result<VectorStore, Error> {
    let embedder = embedder_from_config(config)?;
    let mut state = StoreState::default();
    let store = state
        .ensure_ready(
            Path::new(&config.data_dir),
            Path::new(&config.persist_dir),
            embedder,
        )
        .await?;
    Ok(store.clone())
}

#[async_trait]
impl Chatbot for RagChat {
    async fn chat(&mut self, user_input: &str) -> Result<String, Error> {
        let context = self.relevant_context(user_input).await?;
        let context_msg = Message::new(Role::System, &prompt::rag_context(&context)?);

        self.transcript.push(Message::new(Role::User, user_input));

        let mut messages = self.transcript.history().to_vec();
        messages.push(context_msg);
        messages.push(Message::new(Role::User, user_input));

        let reply = self.model.complete(&messages).await?;

        self.transcript.push(Message::new(Role::Assistant, &reply));
        Ok(reply)
    }

    fn reset(&mut self) {
        self.transcript.reset();
    }

    fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    async fn sources(&self, query: &str, k: usize) -> Result<Vec<Chunk>, Error> {
        self.get_sources(query, k).await
    }

    fn variant(&self) -> Variant {
        Variant::Rag
    }
}

pub struct RagChatBuilder {
    model: SharedChatModel,
    store: VectorStore,
    system_message: String,
    k: usize,
}

impl RagChatBuilder {
    pub fn new(model: SharedChatModel, store: VectorStore) -> Self {
        Self {
            model,
            store,
            system_message: RAG_SYSTEM_MESSAGE.to_string(),
            k: DEFAULT_K,
        }
    }

    pub fn system_message(mut self, system_message: &str) -> Self {
        self.system_message = system_message.to_string();
        self
    }

    pub fn k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    pub fn build(self) -> RagChat {
        RagChat {
            model: self.model,
            store: self.store,
            transcript: Transcript::new(&self.system_message),
            k: self.k,
        }
    }
}
