use anyhow::Result;

use super::chat::chatbot;
use crate::ai::chat::Variant;
use crate::core::AppConfig;
use crate::evals;

pub async fn run(config: &AppConfig, variant: Variant, output: Option<String>) -> Result<()> {
    let mut bot = chatbot(config, variant).await?;
    let report = evals::run(bot.as_mut()).await?;
    let body = serde_json::to_string_pretty(&report)?;

    match output {
        Some(path) => {
            tokio::fs::write(&path, body).await?;
            tracing::info!(
                "Wrote {} test cases for {:?} to {}",
                report.test_cases.len(),
                variant,
                path
            );
        }
        None => println!("{}", body),
    }
    Ok(())
}
