//! Core pipeline for camera-driven wildlife scat identification.
//!
//! The flow: a captured image goes to the [`scan::ScanOrchestrator`], which
//! gates on a feature flag, asks the [`analysis`] collaborator for a
//! description plus candidate species, fans out one [`wiki`] summary lookup
//! per candidate, and persists the merged [`scan::ScanReport`] into
//! [`history`]. Outbound calls are described declaratively by the
//! [`network`] layer's request descriptors.

pub mod analysis;
pub mod config;
pub mod flags;
pub mod history;
pub mod metrics;
pub mod network;
pub mod scan;
pub mod testing;
pub mod wiki;

pub use analysis::{AnalysisError, CandidateSpecies, GeminiAnalyzer, ScatAnalysis, ScatAnalyzer};
pub use config::{
    load_config, load_config_from_str, validate_config, AnalysisConfig, Config, ConfigError,
    FlagsBackend, FlagsConfig, SanitizedConfig,
};
pub use flags::{FeatureFlags, FixedFlags, FlagsmithFlags, LLM_SERVICE_FLAG};
pub use history::{HistoryEntry, HistoryError, HistoryFilter, HistoryStore, SqliteHistoryStore};
pub use network::{
    build_request, ApiError, HttpClient, ReqwestHttpClient, RequestData, RequestMethod,
};
pub use scan::{ScanBroadcaster, ScanError, ScanEvent, ScanOrchestrator, ScanReport, ScanState};
pub use wiki::{RestWikiService, WikiError, WikiImage, WikiService, WikiSummary};
