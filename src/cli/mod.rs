use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod chat;
pub mod eval;
pub mod index;
pub mod query;
pub mod serve;

use crate::ai::chat::{DEFAULT_K, Variant};
use crate::core::AppConfig;

#[derive(Subcommand)]
enum Command {
    /// Run the API server and chat page
    Serve {
        /// Set the server host address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Set the server port
        #[arg(long, default_value = "2222")]
        port: String,

        /// Which chatbot new sessions get
        #[arg(long, value_enum, default_value = "plain")]
        variant: Variant,
    },
    /// Start a chat session in the terminal
    Chat {
        /// Answer from the indexed documents
        #[arg(long, default_value = "false")]
        rag: bool,
    },
    /// Build the vector store from the documents directory
    Index {},
    /// Query the vector store
    Query {
        #[arg(long)]
        term: String,
        #[arg(long, default_value_t = DEFAULT_K)]
        k: usize,
    },
    /// Run the evaluation questions and write the labeled test cases
    Eval {
        #[arg(long, default_value = "false")]
        rag: bool,

        /// Write the report to a file instead of stdout
        #[arg(long)]
        output: Option<String>,
    },
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

fn variant(rag: bool) -> Variant {
    if rag { Variant::Rag } else { Variant::Plain }
}

/// Filter used when `RUST_LOG` isn't set. The server logs requests,
/// CLI commands only log progress.
fn default_filter(command: &Option<Command>) -> String {
    match command {
        // axum logs rejections from built-in extractors with the `axum::rejection`
        // target, at `TRACE` level. `axum::rejection=trace` enables showing those events
        Some(Command::Serve { .. }) => format!(
            "{}=debug,tower_http=debug,axum::rejection=trace",
            env!("CARGO_CRATE_NAME")
        ),
        _ => format!("{}=info", env!("CARGO_CRATE_NAME")),
    }
}

/// Logs go to stderr so command output on stdout stays parseable
fn init_tracing(default_filter: String) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();

    // Set up before reading config so fallback warnings are printed
    init_tracing(default_filter(&args.command));
    let config = AppConfig::default();

    // Handle each sub command
    match args.command {
        Some(Command::Serve {
            host,
            port,
            variant,
        }) => {
            serve::run(host, port, config, variant).await?;
        }
        Some(Command::Chat { rag }) => {
            chat::run(&config, variant(rag)).await?;
        }
        Some(Command::Index {}) => {
            index::run(&config).await?;
        }
        Some(Command::Query { term, k }) => {
            query::run(&config, term, k).await?;
        }
        Some(Command::Eval { rag, output }) => {
            eval::run(&config, variant(rag), output).await?;
        }
        None => {}
    }

    Ok(())
}
