//! Test utilities for integration tests
#![allow(dead_code)]

use std::sync::{Arc, RwLock};

use anyhow::{Error, Result};
use async_trait::async_trait;
use axum::{Router, body::Body};
use tempfile::TempDir;

use chatbots::api::{AppState, BotFactory, app};
use chatbots::core::{AppConfig, EmbeddingBackend};
use chatbots::openai::{ChatModel, Message, Role};
use chatbots::rag::{Document, Embedder, VectorStore};

/// Replies with the number of messages it was sent followed by the
/// last user message, so tests can see exactly what reached the model.
pub struct EchoModel;

#[async_trait]
impl ChatModel for EchoModel {
    async fn complete(&self, messages: &[Message]) -> Result<String, Error> {
        let last_user = messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.clone())
            .unwrap_or_default();
        Ok(format!("{}: {}", messages.len(), last_user))
    }
}

/// Buckets characters into a small normalized vector.
pub struct CharEmbedder;

impl CharEmbedder {
    fn vector(text: &str) -> Vec<f32> {
        let mut v = vec![0.0; 16];
        for c in text.chars() {
            v[(c as usize) % 16] += 1.0;
        }
        let norm = v.iter().map(|x: &f32| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            v.iter_mut().for_each(|x| *x /= norm);
        }
        v
    }
}

#[async_trait]
impl Embedder for CharEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, Error> {
        Ok(texts.iter().map(|t| Self::vector(t)).collect())
    }

    fn name(&self) -> String {
        String::from("test/char")
    }
}

pub fn test_config(dir: &TempDir) -> AppConfig {
    AppConfig {
        data_dir: dir.path().join("data").display().to_string(),
        persist_dir: dir.path().join(".vector_db").display().to_string(),
        openai_model: String::from("gpt-4.1-mini"),
        openai_temperature: 0.7,
        openai_api_hostname: String::from("http://localhost:1"),
        openai_api_key: String::from("test-api-key"),
        embedding_backend: EmbeddingBackend::OpenAI,
        embedding_model: String::from("text-embedding-ada-002"),
    }
}

/// Creates a test application serving the plain chatbot.
///
/// The returned `TempDir` must outlive the router.
pub async fn test_app() -> (Router, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let factory = BotFactory::plain(Arc::new(EchoModel));
    let app_state = AppState::new(factory);
    (app(Arc::new(RwLock::new(app_state))), dir)
}

/// Creates a test application serving the RAG chatbot over a small
/// store built in a temporary directory.
pub async fn test_rag_app() -> (Router, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = test_config(&dir);

    let chunks = vec![
        Document {
            source: String::from("rag.html"),
            text: String::from("RAGは検索拡張生成の略です。外部知識を検索して回答を生成します。"),
        },
        Document {
            source: String::from("vector.html"),
            text: String::from("ベクトルデータベースの例: Chroma, Pinecone, Weaviate"),
        },
        Document {
            source: String::from("llm.html"),
            text: String::from("LLMは文章の要約や翻訳ができます。"),
        },
    ];
    let store = VectorStore::build(
        chunks,
        Arc::new(CharEmbedder),
        std::path::Path::new(&config.persist_dir),
    )
    .await
    .expect("Failed to build vector store");

    let factory = BotFactory::rag(Arc::new(EchoModel), store);
    let app_state = AppState::new(factory);
    (app(Arc::new(RwLock::new(app_state))), dir)
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Failed to read body");
    String::from_utf8(bytes.to_vec()).expect("Body is not utf8")
}

pub async fn body_to_json(body: Body) -> serde_json::Value {
    serde_json::from_str(&body_to_string(body).await).expect("Body is not json")
}
