use std::sync::Arc;

use anyhow::{Error, Result, anyhow};
use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

use crate::core::{AppConfig, EmbeddingBackend};
use crate::openai;

// OpenAI accepts up to 2048 inputs per request but smaller batches
// keep each request well under the token limit for 500 char chunks
const OPENAI_BATCH_SIZE: usize = 100;

/// Maps text to fixed-length vectors. The same embedder must be used
/// to build a store and to query it.
#[async_trait]
pub trait Embedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, Error>;

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, Error> {
        self.embed(&[text.to_string()])
            .await?
            .pop()
            .ok_or(anyhow!("Embedder returned no vector for query"))
    }

    /// Identifies the embedding model so a store can tell if it is
    /// being opened with a different one.
    fn name(&self) -> String;
}

pub type SharedEmbedder = Arc<dyn Embedder + Send + Sync + 'static>;

pub fn embedder_from_config(config: &AppConfig) -> Result<SharedEmbedder, Error> {
    let embedder: SharedEmbedder = match config.embedding_backend {
        EmbeddingBackend::OpenAI => Arc::new(OpenAIEmbedder::new(
            &config.openai_api_hostname,
            &config.openai_api_key,
            &config.embedding_model,
        )),
        EmbeddingBackend::Local => Arc::new(LocalEmbedder::new()?),
    };
    Ok(embedder)
}

/// Embeddings from an OpenAI compatible `/v1/embeddings` endpoint.
#[derive(Clone, Debug)]
pub struct OpenAIEmbedder {
    api_hostname: String,
    api_key: String,
    model: String,
}

impl OpenAIEmbedder {
    pub fn new(api_hostname: &str, api_key: &str, model: &str) -> Self {
        Self {
            api_hostname: api_hostname.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl Embedder for OpenAIEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, Error> {
        let mut vectors = Vec::with_capacity(texts.len());
        for batch in texts.chunks(OPENAI_BATCH_SIZE) {
            tracing::debug!("Embedding batch of {} texts with {}", batch.len(), self.model);
            let batch_vectors =
                openai::embeddings(batch, &self.api_hostname, &self.api_key, &self.model).await?;
            vectors.extend(batch_vectors);
        }
        Ok(vectors)
    }

    fn name(&self) -> String {
        format!("openai/{}", self.model)
    }
}

/// Embeddings computed in process with fastembed. The model is
/// downloaded on first use.
#[derive(Clone)]
pub struct LocalEmbedder {
    model: Arc<TextEmbedding>,
}

impl LocalEmbedder {
    pub fn new() -> Result<Self, Error> {
        let model = TextEmbedding::try_new(
            InitOptions::new(EmbeddingModel::BGESmallENV15).with_show_download_progress(true),
        )?;
        Ok(Self {
            model: Arc::new(model),
        })
    }
}

#[async_trait]
impl Embedder for LocalEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, Error> {
        let model = Arc::clone(&self.model);
        let texts = texts.to_vec();
        // Inference is CPU bound
        let vectors = tokio::task::spawn_blocking(move || model.embed(texts, None)).await??;
        Ok(vectors)
    }

    fn name(&self) -> String {
        String::from("fastembed/BGESmallENV15")
    }
}
