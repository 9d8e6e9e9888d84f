//! Persistent vector store backed by SQLite and sqlite-vec.
//!
//! Chunk text lives in the `chunk` table and its embedding in the
//! `vec_chunk` virtual table under the same rowid. The store is
//! written once when it is built and only read afterwards.

use std::fs;
use std::path::Path;

use anyhow::{Error, Result, anyhow, bail};
use serde::{Deserialize, Serialize};
use tokio_rusqlite::Connection;
use zerocopy::IntoBytes;

use super::embeddings::SharedEmbedder;
use super::loader::Document;
use crate::core::db::{async_db, initialize_db};

pub const STORE_FILE_NAME: &str = "store.db";

/// Largest `k` sqlite-vec accepts for a KNN query.
pub const MAX_K: usize = 4096;

/// A piece of a source document returned by a similarity search.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub id: i64,
    pub source: String,
    pub content: String,
}

#[derive(Clone)]
pub struct VectorStore {
    db: Connection,
    embedder: SharedEmbedder,
}

impl VectorStore {
    /// Embeds already split documents and writes the store to
    /// `persist_dir`. Each document becomes one stored `Chunk` with an
    /// id numbered from 1 in input order.
    pub async fn build(
        documents: Vec<Document>,
        embedder: SharedEmbedder,
        persist_dir: &Path,
    ) -> Result<Self, Error> {
        if documents.is_empty() {
            bail!("No chunks to build a vector store from");
        }

        let texts: Vec<String> = documents.iter().map(|d| d.text.clone()).collect();
        let vectors = embedder.embed(&texts).await?;
        if vectors.len() != documents.len() {
            bail!(
                "Expected {} embeddings but received {}",
                documents.len(),
                vectors.len()
            );
        }
        let dimensions = vectors[0].len();
        let embedder_name = embedder.name();

        fs::create_dir_all(persist_dir)?;
        let db = async_db(&store_path(persist_dir)?).await?;

        let count = documents.len();
        db.call(move |conn| {
            // Either the whole store is written or none of it
            let tx = conn.transaction()?;
            initialize_db(&tx, dimensions)?;
            tx.execute(
                "INSERT OR REPLACE INTO store_meta (key, value) VALUES ('embedder', ?1)",
                [&embedder_name],
            )?;
            tx.execute(
                "INSERT OR REPLACE INTO store_meta (key, value) VALUES ('dimensions', ?1)",
                [dimensions.to_string()],
            )?;
            {
                let mut chunk_stmt =
                    tx.prepare("INSERT INTO chunk (id, source, content) VALUES (?1, ?2, ?3)")?;
                let mut vec_stmt =
                    tx.prepare("INSERT INTO vec_chunk (rowid, embedding) VALUES (?1, ?2)")?;
                for (idx, (doc, vector)) in documents.iter().zip(vectors.iter()).enumerate() {
                    let id = idx as i64 + 1;
                    chunk_stmt.execute(rusqlite::params![id, doc.source, doc.text])?;
                    vec_stmt.execute(rusqlite::params![id, vector.as_bytes()])?;
                }
            }
            tx.commit()?;
            Ok(())
        })
        .await?;

        tracing::info!(
            "Built vector store with {} chunks at {}",
            count,
            persist_dir.display()
        );

        Ok(Self { db, embedder })
    }

    /// Opens a store previously written by `build`.
    pub async fn open(persist_dir: &Path, embedder: SharedEmbedder) -> Result<Self, Error> {
        let path = persist_dir.join(STORE_FILE_NAME);
        if !path.is_file() {
            bail!("No vector store found at {}", path.display());
        }
        let db = async_db(&store_path(persist_dir)?).await?;

        let stored_embedder: Option<String> = db
            .call(|conn| {
                let mut stmt = conn.prepare("SELECT value FROM store_meta WHERE key = 'embedder'")?;
                let mut rows = stmt.query_map([], |row| row.get(0))?;
                Ok(rows.next().transpose()?)
            })
            .await?;
        let embedder_name = embedder.name();
        match stored_embedder {
            Some(name) if name != embedder_name => tracing::warn!(
                "Vector store was built with {} but is being queried with {}",
                name,
                embedder_name
            ),
            _ => {}
        }

        tracing::info!("Opened vector store at {}", persist_dir.display());
        Ok(Self { db, embedder })
    }

    /// Returns up to `k` chunks most similar to `query`, closest first.
    /// `k` above `MAX_K` is treated as `MAX_K`.
    pub async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<Chunk>, Error> {
        if k == 0 {
            return Ok(Vec::new());
        }

        let query_vector = self.embedder.embed_query(query).await?;
        let limit = k.min(MAX_K) as i64;
        let chunks = self
            .db
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "WITH knn AS (
                         SELECT rowid, distance
                         FROM vec_chunk
                         WHERE embedding MATCH ?1 AND k = ?2
                     )
                     SELECT chunk.id, chunk.source, chunk.content
                     FROM knn
                     JOIN chunk ON chunk.id = knn.rowid
                     ORDER BY knn.distance, chunk.id",
                )?;
                let rows = stmt
                    .query_map(rusqlite::params![query_vector.as_bytes(), limit], |row| {
                        Ok(Chunk {
                            id: row.get(0)?,
                            source: row.get(1)?,
                            content: row.get(2)?,
                        })
                    })?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await?;

        tracing::debug!("Found {} chunks for query \"{}\"", chunks.len(), query);
        Ok(chunks)
    }

    pub async fn count(&self) -> Result<usize, Error> {
        let count: i64 = self
            .db
            .call(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM chunk", [], |row| row.get(0))?))
            .await?;
        Ok(count as usize)
    }
}

fn store_path(persist_dir: &Path) -> Result<String, Error> {
    let path = persist_dir.join(STORE_FILE_NAME);
    path.to_str()
        .map(String::from)
        .ok_or(anyhow!("Store path is not valid UTF-8: {}", path.display()))
}
