use std::sync::Arc;

use axum::extract::FromRef;

use crate::{config::Config, repository::Storage, services::sessions::SessionRegistry};

#[derive(Clone)]
pub struct AppState {
    pub storage: Storage,
    pub config: Config,
    pub sessions: Arc<SessionRegistry>,
}

impl AppState {
    pub fn new(storage: Storage, config: Config) -> Self {
        let sessions = Arc::new(SessionRegistry::from_config(&config));
        Self {
            storage,
            config,
            sessions,
        }
    }
}

impl FromRef<AppState> for Storage {
    fn from_ref(state: &AppState) -> Self {
        state.storage.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Arc<SessionRegistry> {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}
