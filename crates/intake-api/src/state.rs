use intake_pipeline::IntakeOrchestrator;
use std::sync::Arc;

use crate::config::Config;

/// Shared application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub orchestrator: Arc<IntakeOrchestrator>,
}

impl AppState {
    pub fn new(config: Config, orchestrator: IntakeOrchestrator) -> Self {
        Self {
            config: Arc::new(config),
            orchestrator: Arc::new(orchestrator),
        }
    }
}
