pub mod config;
pub use config::{AppConfig, EmbeddingBackend};
pub mod db;
