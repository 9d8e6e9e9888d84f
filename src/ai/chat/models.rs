//! The core models for managing a stateful chat with an LLM.
use crate::openai::{Message, Role};

/// Ordered conversation history. The first message is always the
/// system message the transcript was created with.
#[derive(Clone, Debug)]
pub struct Transcript(Vec<Message>);

impl Transcript {
    pub fn new(system_message: &str) -> Self {
        Self(vec![Message::new(Role::System, system_message)])
    }

    pub fn messages(&self) -> &[Message] {
        &self.0
    }

    /// Everything except the most recent message.
    pub fn history(&self) -> &[Message] {
        &self.0[..self.0.len().saturating_sub(1)]
    }

    pub fn system_message(&self) -> &Message {
        &self.0[0]
    }

    pub fn push(&mut self, msg: Message) {
        self.0.push(msg)
    }

    /// Drops every turn and keeps only the system message.
    pub fn reset(&mut self) {
        self.0.truncate(1);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.0.iter()
    }
}
