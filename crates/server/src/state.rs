use std::sync::Arc;

use spoor_core::{Config, HistoryStore, SanitizedConfig, ScanBroadcaster, ScanOrchestrator};

/// Shared application state
pub struct AppState {
    config: Config,
    orchestrator: Arc<ScanOrchestrator>,
    history: Arc<dyn HistoryStore>,
    events: ScanBroadcaster,
}

impl AppState {
    pub fn new(
        config: Config,
        orchestrator: Arc<ScanOrchestrator>,
        history: Arc<dyn HistoryStore>,
        events: ScanBroadcaster,
    ) -> Self {
        Self {
            config,
            orchestrator,
            history,
            events,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn orchestrator(&self) -> &Arc<ScanOrchestrator> {
        &self.orchestrator
    }

    pub fn history(&self) -> &dyn HistoryStore {
        self.history.as_ref()
    }

    pub fn events(&self) -> &ScanBroadcaster {
        &self.events
    }
}
