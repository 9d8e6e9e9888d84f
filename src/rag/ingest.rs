//! Builds the vector store on first run and reuses it afterwards.
use std::fs;
use std::path::Path;

use anyhow::{Error, Result, bail};

use super::embeddings::SharedEmbedder;
use super::loader::load_html_documents;
use super::splitter::{CHUNK_OVERLAP, CHUNK_SIZE, split_documents};
use super::store::VectorStore;

/// Readiness of the vector store. It only ever moves from
/// `Uninitialized` to `Ready`.
#[derive(Default)]
pub enum StoreState {
    #[default]
    Uninitialized,
    Ready(VectorStore),
}

impl StoreState {
    pub fn is_ready(&self) -> bool {
        matches!(self, StoreState::Ready(_))
    }

    /// Opens or builds the store the first time it's called and
    /// returns the same store on every call after that.
    pub async fn ensure_ready(
        &mut self,
        source_dir: &Path,
        persist_dir: &Path,
        embedder: SharedEmbedder,
    ) -> Result<&VectorStore, Error> {
        if let StoreState::Uninitialized = self {
            let store = build_or_open(source_dir, persist_dir, embedder).await?;
            *self = StoreState::Ready(store);
        }

        match self {
            StoreState::Ready(store) => Ok(store),
            StoreState::Uninitialized => bail!("Vector store failed to initialize"),
        }
    }
}

/// True when `persist_dir` exists and has at least one entry.
pub fn has_persisted_store(persist_dir: &Path) -> bool {
    fs::read_dir(persist_dir)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false)
}

/// Returns the existing store if anything has been persisted.
/// Otherwise loads, splits, and embeds every document in `source_dir`.
///
/// An existing store is reused as is even if the source documents
/// changed after it was built.
pub async fn build_or_open(
    source_dir: &Path,
    persist_dir: &Path,
    embedder: SharedEmbedder,
) -> Result<VectorStore, Error> {
    if has_persisted_store(persist_dir) {
        tracing::info!(
            "Reusing persisted vector store at {}",
            persist_dir.display()
        );
        return VectorStore::open(persist_dir, embedder).await;
    }

    tracing::info!("Indexing documents in {}", source_dir.display());
    let documents = load_html_documents(source_dir)?;
    let chunks = split_documents(&documents, CHUNK_SIZE, CHUNK_OVERLAP)?;
    tracing::info!(
        "Split {} documents into {} chunks",
        documents.len(),
        chunks.len()
    );

    VectorStore::build(chunks, embedder, persist_dir).await
}
