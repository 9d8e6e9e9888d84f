use super::sessions::{BotFactory, SessionRegistry};

pub struct AppState {
    pub sessions: SessionRegistry,
    pub factory: BotFactory,
}

impl AppState {
    pub fn new(factory: BotFactory) -> Self {
        Self {
            sessions: SessionRegistry::new(),
            factory,
        }
    }
}
