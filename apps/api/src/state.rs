use crate::config::Config;
use crate::gateway::LlmGateway;
use crate::wizard::store::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub gateway: LlmGateway,
    pub sessions: SessionStore,
    pub config: Config,
}
