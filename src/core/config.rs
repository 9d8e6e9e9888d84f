use std::env;
use std::str::FromStr;

use anyhow::{Error, anyhow};

/// Which backend computes embeddings for the vector store.
#[derive(Clone, Debug, PartialEq)]
pub enum EmbeddingBackend {
    OpenAI,
    Local,
}

impl FromStr for EmbeddingBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "local" => Ok(Self::Local),
            other => Err(anyhow!("Unknown embedding backend: {}", other)),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub data_dir: String,
    pub persist_dir: String,
    pub openai_model: String,
    pub openai_temperature: f64,
    pub openai_api_hostname: String,
    pub openai_api_key: String,
    pub embedding_backend: EmbeddingBackend,
    pub embedding_model: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        // A missing .env is fine, the process environment still applies
        let _ = dotenv::dotenv();

        let data_dir =
            env::var("CHATBOTS_DATA_DIR").unwrap_or_else(|_| "simple_rag_chatbot/data".to_string());
        let persist_dir = env::var("CHATBOTS_PERSIST_DIR")
            .unwrap_or_else(|_| "simple_rag_chatbot/.vector_db".to_string());
        let openai_api_hostname = env::var("CHATBOTS_LLM_HOST")
            .unwrap_or_else(|_| "https://api.openai.com".to_string());
        let openai_api_key =
            env::var("OPENAI_API_KEY").unwrap_or_else(|_| "thiswontworkforopenai".to_string());
        let openai_model =
            env::var("CHATBOTS_MODEL").unwrap_or_else(|_| "gpt-4.1-mini".to_string());
        let openai_temperature = env::var("CHATBOTS_TEMPERATURE")
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(0.7);
        let embedding_backend = env::var("CHATBOTS_EMBEDDINGS")
            .ok()
            .and_then(|b| {
                b.parse()
                    .inspect_err(|e| tracing::warn!("{}, falling back to openai", e))
                    .ok()
            })
            .unwrap_or(EmbeddingBackend::OpenAI);
        let embedding_model = env::var("CHATBOTS_EMBEDDING_MODEL")
            .unwrap_or_else(|_| "text-embedding-ada-002".to_string());

        Self {
            data_dir,
            persist_dir,
            openai_model,
            openai_temperature,
            openai_api_hostname,
            openai_api_key,
            embedding_backend,
            embedding_model,
        }
    }
}
