use anyhow::Result;
use serde_json::json;

use crate::ai::chat::open_store;
use crate::core::AppConfig;

pub async fn run(config: &AppConfig, term: String, k: usize) -> Result<()> {
    let store = open_store(config).await?;
    let results = store.similarity_search(&term, k).await?;
    println!(
        "{}",
        json!({
            "query": term,
            "results": results,
        })
    );
    Ok(())
}
