use anyhow::Result;
use serde_json::json;

use crate::ai::chat::open_store;
use crate::core::AppConfig;

pub async fn run(config: &AppConfig) -> Result<()> {
    let store = open_store(config).await?;
    let chunks = store.count().await?;
    tracing::info!("Vector store at {} holds {} chunks", config.persist_dir, chunks);
    println!(
        "{}",
        json!({
            "persist_dir": config.persist_dir,
            "chunks": chunks,
        })
    );
    Ok(())
}
