//! Reusable prompts using Handlebars for templating. Retrieved
//! document text is untrusted so templates only get the variables
//! they name and strict mode rejects anything missing.

use std::fmt;

use anyhow::{Error, Result};
use handlebars::Handlebars;
use serde_json::json;

/// System message for the plain chatbot.
pub const CHAT_SYSTEM_MESSAGE: &str = concat!(
    "あなたは親切で友好的なAIアシスタントです。",
    "明確で正確、かつ簡潔な回答を提供してください。",
    "質問に答える際は、情報量がありながらも会話的な口調を心がけてください。",
    "不確かなことがある場合は、正直にそう伝えてください。",
);

/// System message for the retrieval augmented chatbot.
pub const RAG_SYSTEM_MESSAGE: &str = concat!(
    "あなたは親切で知識豊富なAIアシスタントです。",
    "提供された文脈情報を使用して、正確で詳細な回答を提供してください。",
    "文脈に情報がない場合は、その旨を正直に伝えてください。",
    "回答は明確で簡潔にまとめてください。",
);

#[derive(Debug)]
pub enum Prompt {
    RagContext,
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl From<Prompt> for String {
    fn from(item: Prompt) -> String {
        format!("{:?}", item)
    }
}

const RAG_CONTEXT_PROMPT: &str = "以下の文脈情報を使用して質問に答えてください:\n\n{{context}}";

pub fn templates<'a>() -> Handlebars<'a> {
    let mut registry = Handlebars::new();
    registry.set_strict_mode(true);
    // Output goes to a model, not a browser
    registry.register_escape_fn(handlebars::no_escape);
    registry
        .register_template_string(&Prompt::RagContext.to_string(), RAG_CONTEXT_PROMPT)
        .expect("Failed to register template");
    registry
}

/// Renders the system instruction that wraps retrieved context for a
/// single question.
pub fn rag_context(context: &str) -> Result<String, Error> {
    let rendered = templates().render(
        &Prompt::RagContext.to_string(),
        &json!({ "context": context }),
    )?;
    Ok(rendered)
}
