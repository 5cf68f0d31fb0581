//! Scan orchestration.
//!
//! Drives one identification run through its state machine:
//! gate on the feature flag, analyze the image once, fan out one summary
//! lookup per candidate, merge and persist the result. Terminal states are
//! `Completed` and `Failed`; every run is an independent state machine
//! instance.

mod events;
mod runner;
mod types;

pub use events::{ScanBroadcaster, ScanEvent, ScanState};
pub use runner::ScanOrchestrator;
pub use types::{ScanError, ScanReport};
