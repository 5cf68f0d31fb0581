//! Scan state events for presentation collaborators.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// State of one scan run's state machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ScanState {
    /// Fresh run, nothing started yet.
    Initial,
    /// Consulting the feature flag collaborator.
    Gating,
    /// Awaiting the analysis service.
    Analyzing,
    /// Summary lookups in flight.
    Enriching { candidates: usize },
    /// Terminal: report persisted.
    Completed,
    /// Terminal: run failed.
    Failed { kind: String, message: String },
}

/// One state transition of one scan run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanEvent {
    pub scan_id: Uuid,
    #[serde(flatten)]
    pub state: ScanState,
}

/// Broadcaster for scan events using a tokio broadcast channel.
///
/// Cheap to clone; the server's WebSocket layer subscribes, the
/// orchestrator publishes. Events for superseded runs still carry their own
/// scan id, so consumers can ignore stale runs by id.
#[derive(Debug, Clone)]
pub struct ScanBroadcaster {
    sender: broadcast::Sender<ScanEvent>,
}

impl ScanBroadcaster {
    /// Create a new broadcaster with the given channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Broadcast an event to all subscribers.
    /// Send errors just mean no one is listening.
    pub fn broadcast(&self, event: ScanEvent) {
        let _ = self.sender.send(event);
    }

    /// Subscribe to receive events.
    pub fn subscribe(&self) -> broadcast::Receiver<ScanEvent> {
        self.sender.subscribe()
    }

    /// Convenience method to broadcast a state change.
    pub fn state_changed(&self, scan_id: Uuid, state: ScanState) {
        self.broadcast(ScanEvent { scan_id, state });
    }
}

impl Default for ScanBroadcaster {
    fn default() -> Self {
        Self::new(64)
    }
}
