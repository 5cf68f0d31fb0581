//! Scan orchestrator implementation.

use std::sync::Arc;

use futures::future;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::analysis::{CandidateSpecies, ScatAnalyzer};
use crate::flags::{FeatureFlags, LLM_SERVICE_FLAG};
use crate::history::HistoryStore;
use crate::metrics;
use crate::wiki::{WikiError, WikiService, WikiSummary};

use super::{ScanBroadcaster, ScanError, ScanReport, ScanState};

/// Drives one identification run per captured image.
///
/// All collaborators are injected; the orchestrator owns no network or
/// storage behavior of its own. Runs are independent: a new capture starts
/// a fresh state machine under a fresh scan id, and a superseded run is not
/// cancelled — its events and report stay keyed to its own id.
pub struct ScanOrchestrator {
    analyzer: Arc<dyn ScatAnalyzer>,
    wiki: Arc<dyn WikiService>,
    flags: Arc<dyn FeatureFlags>,
    history: Arc<dyn HistoryStore>,
    events: ScanBroadcaster,
}

impl ScanOrchestrator {
    pub fn new(
        analyzer: Arc<dyn ScatAnalyzer>,
        wiki: Arc<dyn WikiService>,
        flags: Arc<dyn FeatureFlags>,
        history: Arc<dyn HistoryStore>,
        events: ScanBroadcaster,
    ) -> Self {
        Self {
            analyzer,
            wiki,
            flags,
            history,
            events,
        }
    }

    /// The event channel this orchestrator publishes to.
    pub fn events(&self) -> &ScanBroadcaster {
        &self.events
    }

    /// Run one identification scan under a fresh id.
    pub async fn identify(&self, image: Vec<u8>) -> Result<ScanReport, ScanError> {
        self.identify_as(Uuid::new_v4(), image).await
    }

    /// Run one identification scan under a caller-chosen id.
    ///
    /// The id is used for all emitted events and becomes the report id, so
    /// callers that respond before the run finishes can hand the same id to
    /// their clients.
    pub async fn identify_as(
        &self,
        scan_id: Uuid,
        image: Vec<u8>,
    ) -> Result<ScanReport, ScanError> {
        metrics::SCANS_STARTED.inc();
        self.events.state_changed(scan_id, ScanState::Initial);

        self.events.state_changed(scan_id, ScanState::Gating);
        if !self.flags.is_enabled(LLM_SERVICE_FLAG).await {
            info!(%scan_id, "scan rejected, llm service flag disabled");
            return Err(self.fail(scan_id, ScanError::FeatureDisabled));
        }

        self.events.state_changed(scan_id, ScanState::Analyzing);
        let analysis = match self.analyzer.analyze_image(&image).await {
            Ok(analysis) => analysis,
            Err(e) => {
                warn!(%scan_id, error = %e, "analysis failed");
                return Err(self.fail(scan_id, ScanError::Analysis(e)));
            }
        };

        let candidates = analysis.matching_animals.clone();
        self.events.state_changed(
            scan_id,
            ScanState::Enriching {
                candidates: candidates.len(),
            },
        );
        let summaries = self.enrich(scan_id, &candidates).await;

        debug!(
            %scan_id,
            candidates = candidates.len(),
            summaries = summaries.len(),
            "scan enrichment finished"
        );

        let report = ScanReport::new(scan_id, Some(image), analysis, summaries);
        if let Err(e) = self.history.append(&report) {
            warn!(%scan_id, error = %e, "failed to persist scan report");
        }

        metrics::SCANS_COMPLETED.inc();
        self.events.state_changed(scan_id, ScanState::Completed);
        Ok(report)
    }

    /// Fan out one summary lookup per candidate and collect the successes
    /// in candidate order. A failed lookup drops its candidate and nothing
    /// else; the run itself never fails here.
    async fn enrich(&self, scan_id: Uuid, candidates: &[CandidateSpecies]) -> Vec<WikiSummary> {
        let lookups = candidates
            .iter()
            .map(|candidate| self.wiki.summary(&candidate.scientific_name));
        let outcomes = future::join_all(lookups).await;

        let mut summaries = Vec::with_capacity(candidates.len());
        for (candidate, outcome) in candidates.iter().zip(outcomes) {
            match outcome {
                Ok(summary) => {
                    metrics::WIKI_LOOKUPS.with_label_values(&["ok"]).inc();
                    summaries.push(summary);
                }
                Err(e) => {
                    metrics::WIKI_LOOKUPS
                        .with_label_values(&[wiki_outcome(&e)])
                        .inc();
                    warn!(
                        %scan_id,
                        species = %candidate.scientific_name,
                        error = %e,
                        "summary lookup failed, dropping candidate"
                    );
                }
            }
        }
        summaries
    }

    fn fail(&self, scan_id: Uuid, error: ScanError) -> ScanError {
        metrics::SCANS_FAILED.with_label_values(&[error.kind()]).inc();
        self.events.state_changed(
            scan_id,
            ScanState::Failed {
                kind: error.kind().to_string(),
                message: error.to_string(),
            },
        );
        error
    }
}

fn wiki_outcome(error: &WikiError) -> &'static str {
    match error {
        WikiError::NotFound(_) => "not_found",
        WikiError::Network(_) => "network",
        WikiError::Decode(_) => "decode",
    }
}
