use anyhow::{Error, Result};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::ai::chat::{BoxedChatbot, Chat, Chatbot, DEFAULT_K, RagChat, Variant};
use crate::core::AppConfig;

const SOURCE_PREVIEW_CHARS: usize = 300;

pub async fn chatbot(config: &AppConfig, variant: Variant) -> Result<BoxedChatbot, Error> {
    let bot: BoxedChatbot = match variant {
        Variant::Plain => Box::new(Chat::from_config(config)),
        Variant::Rag => Box::new(RagChat::from_config(config).await?),
    };
    Ok(bot)
}

fn preview(content: &str) -> String {
    if content.chars().count() > SOURCE_PREVIEW_CHARS {
        let head: String = content.chars().take(SOURCE_PREVIEW_CHARS).collect();
        format!("{}...", head)
    } else {
        content.to_string()
    }
}

async fn print_sources(bot: &(dyn Chatbot + Send + Sync), query: &str) -> Result<()> {
    let sources = bot.sources(query, DEFAULT_K).await?;
    if sources.is_empty() {
        println!("(no sources)");
    }
    for (i, chunk) in sources.iter().enumerate() {
        println!("ソース {} ({}):\n{}\n", i + 1, chunk.source, preview(&chunk.content));
    }
    Ok(())
}

pub async fn run(config: &AppConfig, variant: Variant) -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    let mut bot = chatbot(config, variant).await?;
    let mut last_question: Option<String> = None;

    loop {
        let readline = rl.readline(">>> ");
        match readline {
            Ok(line) => {
                let line = line.trim();
                match line {
                    "" => continue,
                    "/reset" => {
                        bot.reset();
                        last_question = None;
                        println!("Conversation cleared");
                    }
                    "/sources" => match &last_question {
                        Some(q) => print_sources(bot.as_ref(), q).await?,
                        None => println!("Ask a question first"),
                    },
                    _ => {
                        let _ = rl.add_history_entry(line);
                        match bot.chat(line).await {
                            Ok(reply) => println!("{}", reply),
                            // A failed turn is reported and the session keeps going
                            Err(e) => eprintln!("Error: {:#}", e),
                        }
                        last_question = Some(line.to_string());
                    }
                }
            }
            Err(ReadlineError::Interrupted) => break,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }

    Ok(())
}
