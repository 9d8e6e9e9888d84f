pub mod routes;
mod server;
pub use server::{app, bot_factory, serve};
pub mod public;
pub mod sessions;
mod state;
pub use sessions::{BotFactory, SessionRegistry};
pub use state::AppState;
