mod core;
pub use self::core::{BoxedChatbot, Chat, ChatBuilder, Chatbot, Variant};

pub mod models;
pub use models::Transcript;

mod rag;
pub use rag::{DEFAULT_K, RagChat, RagChatBuilder, open_store};
