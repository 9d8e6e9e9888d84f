use anyhow::{Error, Result};
use text_splitter::{ChunkConfig, TextSplitter};

use super::loader::Document;

/// Maximum characters per chunk.
pub const CHUNK_SIZE: usize = 500;
/// Characters shared between neighboring chunks.
pub const CHUNK_OVERLAP: usize = 50;

/// Splits each document into overlapping chunks that keep the source
/// of the document they came from.
pub fn split_documents(
    documents: &[Document],
    chunk_size: usize,
    chunk_overlap: usize,
) -> Result<Vec<Document>, Error> {
    let splitter = TextSplitter::new(ChunkConfig::new(chunk_size).with_overlap(chunk_overlap)?);

    let chunks = documents
        .iter()
        .flat_map(|doc| {
            splitter.chunks(&doc.text).map(move |text| Document {
                source: doc.source.clone(),
                text: text.to_string(),
            })
        })
        .collect();

    Ok(chunks)
}
