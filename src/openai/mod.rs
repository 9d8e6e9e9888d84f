mod core;
pub use self::core::{
    ChatModel, Message, OpenAIChatModel, Role, SharedChatModel, completion, embeddings,
};
