use std::sync::Arc;
use std::time::Duration;

use anyhow::{Error, Result, anyhow, bail};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub enum Role {
    #[serde(rename = "system")]
    System,
    #[serde(rename = "assistant")]
    Assistant,
    #[serde(rename = "user")]
    User,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: &str) -> Self {
        Message {
            role,
            content: content.to_string(),
        }
    }
}

/// Anything that can produce the next reply for a transcript. The
/// OpenAI implementation is the only one used outside of tests.
#[async_trait]
pub trait ChatModel {
    async fn complete(&self, messages: &[Message]) -> Result<String, Error>;
}

pub type SharedChatModel = Arc<dyn ChatModel + Send + Sync + 'static>;

pub async fn completion(
    messages: &[Message],
    api_hostname: &str,
    api_key: &str,
    model: &str,
    temperature: f64,
) -> Result<Value, Error> {
    let payload = json!({
        "model": model,
        "temperature": temperature,
        "messages": messages,
    });
    let url = format!("{}/v1/chat/completions", api_hostname.trim_end_matches("/"));
    let response = reqwest::Client::new()
        .post(url)
        .bearer_auth(api_key)
        .header("Content-Type", "application/json")
        .timeout(Duration::from_secs(60 * 10))
        .json(&payload)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        bail!("Chat completion failed with status {}: {}", status, body);
    }

    Ok(response.json().await?)
}

/// Chat model backed by an OpenAI compatible chat completions API.
#[derive(Clone, Debug)]
pub struct OpenAIChatModel {
    api_hostname: String,
    api_key: String,
    model: String,
    temperature: f64,
}

impl OpenAIChatModel {
    pub fn new(api_hostname: &str, api_key: &str, model: &str, temperature: f64) -> Self {
        Self {
            api_hostname: api_hostname.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            temperature,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ChatModel for OpenAIChatModel {
    async fn complete(&self, messages: &[Message]) -> Result<String, Error> {
        tracing::debug!(
            "Requesting completion from {} with {} messages",
            self.model,
            messages.len()
        );
        let resp = completion(
            messages,
            &self.api_hostname,
            &self.api_key,
            &self.model,
            self.temperature,
        )
        .await?;

        resp["choices"][0]["message"]["content"]
            .as_str()
            .map(String::from)
            .ok_or(anyhow!("No message received. Resp:\n\n {}", resp))
    }
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

/// Embeds a batch of inputs. The results are returned in the same
/// order as `inputs` regardless of the order the API lists them.
pub async fn embeddings(
    inputs: &[String],
    api_hostname: &str,
    api_key: &str,
    model: &str,
) -> Result<Vec<Vec<f32>>, Error> {
    let payload = json!({
        "model": model,
        "input": inputs,
    });
    let url = format!("{}/v1/embeddings", api_hostname.trim_end_matches("/"));
    let response = reqwest::Client::new()
        .post(url)
        .bearer_auth(api_key)
        .header("Content-Type", "application/json")
        .timeout(Duration::from_secs(60 * 5))
        .json(&payload)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        bail!("Embedding request failed with status {}: {}", status, body);
    }

    let mut resp: EmbeddingResponse = response.json().await?;
    if resp.data.len() != inputs.len() {
        bail!(
            "Expected {} embeddings but received {}",
            inputs.len(),
            resp.data.len()
        );
    }
    resp.data.sort_by_key(|d| d.index);

    Ok(resp.data.into_iter().map(|d| d.embedding).collect())
}
