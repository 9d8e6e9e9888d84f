use anyhow::Result;

use crate::ai::chat::Variant;
use crate::api;
use crate::core::AppConfig;

pub async fn run(host: String, port: String, config: AppConfig, variant: Variant) -> Result<()> {
    api::serve(host, port, config, variant).await
}
