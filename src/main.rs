use anyhow::Result;
use chatbots::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
