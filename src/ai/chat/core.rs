use std::sync::Arc;

use anyhow::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::models::Transcript;
use crate::ai::prompt::CHAT_SYSTEM_MESSAGE;
use crate::core::AppConfig;
use crate::openai::{Message, OpenAIChatModel, Role, SharedChatModel};
use crate::rag::Chunk;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Plain,
    Rag,
}

/// A chat session the UI, CLI, and evaluation harness can drive
/// without knowing which kind of bot is behind it.
#[async_trait]
pub trait Chatbot {
    /// Runs one turn and returns the assistant's reply.
    async fn chat(&mut self, user_input: &str) -> Result<String, Error>;

    /// Restores the transcript to just the system message.
    fn reset(&mut self);

    fn transcript(&self) -> &Transcript;

    /// Documents backing an answer. Bots without retrieval have none.
    async fn sources(&self, _query: &str, _k: usize) -> Result<Vec<Chunk>, Error> {
        Ok(Vec::new())
    }

    fn variant(&self) -> Variant;
}

pub type BoxedChatbot = Box<dyn Chatbot + Send + Sync + 'static>;

/// Plain conversational chatbot. Every turn sends the full transcript
/// to the model.
///
/// Use `Chat::builder()` to construct a valid `Chat`.
pub struct Chat {
    model: SharedChatModel,
    transcript: Transcript,
}

impl Chat {
    pub fn builder(model: SharedChatModel) -> ChatBuilder {
        ChatBuilder::new(model)
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let model = OpenAIChatModel::new(
            &config.openai_api_hostname,
            &config.openai_api_key,
            &config.openai_model,
            config.openai_temperature,
        );
        ChatBuilder::new(Arc::new(model)).build()
    }
}

#[async_trait]
impl Chatbot for Chat {
    async fn chat(&mut self, user_input: &str) -> Result<String, Error> {
        self.transcript.push(Message::new(Role::User, user_input));

        // On failure the user message stays in the transcript without
        // a reply
        let reply = self.model.complete(self.transcript.messages()).await?;

        self.transcript.push(Message::new(Role::Assistant, &reply));
        Ok(reply)
    }

    fn reset(&mut self) {
        self.transcript.reset();
    }

    fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    fn variant(&self) -> Variant {
        Variant::Plain
    }
}

pub struct ChatBuilder {
    model: SharedChatModel,
    system_message: String,
}

impl ChatBuilder {
    pub fn new(model: SharedChatModel) -> Self {
        Self {
            model,
            system_message: CHAT_SYSTEM_MESSAGE.to_string(),
        }
    }

    pub fn system_message(mut self, system_message: &str) -> Self {
        self.system_message = system_message.to_string();
        self
    }

    pub fn build(self) -> Chat {
        Chat {
            model: self.model,
            transcript: Transcript::new(&self.system_message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::chat::testing::{FailingModel, RecordingModel};

    #[test]
    fn test_builder_defaults_to_chat_system_message() {
        let chat = ChatBuilder::new(Arc::new(RecordingModel::default())).build();
        assert_eq!(chat.transcript().len(), 1);
        assert_eq!(chat.transcript().system_message().content, CHAT_SYSTEM_MESSAGE);
        assert_eq!(chat.variant(), Variant::Plain);
    }

    #[test]
    fn test_builder_system_message() {
        let chat = ChatBuilder::new(Arc::new(RecordingModel::default()))
            .system_message("You are a helpful assistant.")
            .build();
        assert_eq!(
            chat.transcript().system_message().content,
            "You are a helpful assistant."
        );
    }

    #[tokio::test]
    async fn test_chat_returns_reply_and_grows_transcript() {
        let model = Arc::new(RecordingModel::default());
        let mut chat = Chat::builder(model.clone()).build();

        for n in 1..=3 {
            let reply = chat.chat("こんにちは").await.unwrap();
            assert!(!reply.is_empty());
            assert_eq!(chat.transcript().len(), 1 + 2 * n);
        }

        let last = chat.transcript().messages().last().unwrap();
        assert_eq!(last.role, Role::Assistant);
    }

    #[tokio::test]
    async fn test_chat_sends_prior_turns_to_model() {
        let model = Arc::new(RecordingModel::default());
        let mut chat = Chat::builder(model.clone()).build();

        // The recording model replies with the transcript length it saw
        assert_eq!(chat.chat("こんにちは").await.unwrap(), "2");
        assert_eq!(chat.chat("さっき何て言った？").await.unwrap(), "4");

        let calls = model.calls();
        let second = &calls[1];
        assert_eq!(second[1], Message::new(Role::User, "こんにちは"));
        assert_eq!(second[2], Message::new(Role::Assistant, "2"));
        assert_eq!(second[3], Message::new(Role::User, "さっき何て言った？"));
    }

    #[tokio::test]
    async fn test_reset_restores_system_message() {
        let mut chat = Chat::builder(Arc::new(RecordingModel::default())).build();
        chat.chat("Hello").await.unwrap();
        chat.chat("Again").await.unwrap();

        chat.reset();

        assert_eq!(chat.transcript().len(), 1);
        assert_eq!(
            chat.transcript().messages()[0],
            Message::new(Role::System, CHAT_SYSTEM_MESSAGE)
        );
    }

    #[tokio::test]
    async fn test_failed_turn_leaves_user_message_pending() {
        let mut chat = Chat::builder(Arc::new(FailingModel)).build();

        assert!(chat.chat("Hello").await.is_err());
        assert_eq!(chat.transcript().len(), 2);
        assert_eq!(
            chat.transcript().messages()[1],
            Message::new(Role::User, "Hello")
        );
    }

    #[tokio::test]
    async fn test_plain_chat_has_no_sources() {
        let chat = Chat::builder(Arc::new(RecordingModel::default())).build();
        assert!(chat.sources("anything", 3).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_chat_against_mock_openai_server() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"choices":[{"index":0,"message":{"role":"assistant","content":"こんにちは！"},"finish_reason":"stop"}]}"#,
            )
            .create_async()
            .await;

        let model = OpenAIChatModel::new(&server.url(), "test-key", "gpt-4.1-mini", 0.7);
        let mut chat = Chat::builder(Arc::new(model)).build();
        let reply = chat.chat("こんにちは").await.unwrap();

        assert_eq!(reply, "こんにちは！");
        assert_eq!(chat.transcript().len(), 3);
    }
}
