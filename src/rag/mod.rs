//! Retrieval for the RAG chatbot: loading HTML documents, splitting
//! them into chunks, and searching the embedded chunks.

pub mod embeddings;
pub use embeddings::{
    Embedder, LocalEmbedder, OpenAIEmbedder, SharedEmbedder, embedder_from_config,
};

pub mod ingest;
pub use ingest::{StoreState, build_or_open, has_persisted_store};

pub mod loader;
pub use loader::{Document, load_html_documents};

pub mod splitter;
pub use splitter::{CHUNK_OVERLAP, CHUNK_SIZE, split_documents};

pub mod store;
pub use store::{Chunk, VectorStore};
