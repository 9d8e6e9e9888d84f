use std::sync::Once;

use anyhow::{Error, Result};
use rusqlite::ffi::sqlite3_auto_extension;
use sqlite_vec::sqlite3_vec_init;
use tokio_rusqlite::Connection;

static VEC_EXTENSION: Once = Once::new();

/// Registers sqlite-vec so every connection opened afterwards has the
/// `vec0` virtual table available.
pub fn register_vec_extension() {
    VEC_EXTENSION.call_once(|| unsafe {
        sqlite3_auto_extension(Some(std::mem::transmute(sqlite3_vec_init as *const ())));
    });
}

pub async fn async_db(db_path: &str) -> Result<Connection, Error> {
    register_vec_extension();
    let db = Connection::open(db_path).await?;
    Ok(db)
}

/// Creates the tables backing the vector store. The embedding width
/// is fixed per store since `vec0` columns are declared with a size.
pub fn initialize_db(conn: &rusqlite::Connection, dimensions: usize) -> rusqlite::Result<()> {
    conn.execute_batch(&format!(
        "
        CREATE TABLE IF NOT EXISTS store_meta (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS chunk (
            id INTEGER PRIMARY KEY,
            source TEXT NOT NULL,
            content TEXT NOT NULL
        );
        CREATE VIRTUAL TABLE IF NOT EXISTS vec_chunk USING vec0(
            embedding float[{}]
        );
        ",
        dimensions
    ))
}
