//! Scan pipeline integration tests.
//!
//! These tests drive the orchestrator through complete runs with mock
//! collaborators: gating, analysis, the enrichment fan-out, persistence
//! and the emitted state transitions.

use std::sync::Arc;

use spoor_core::{
    testing::{fixtures, MockAnalyzer, MockFeatureFlags, MockHttpClient, MockWikiService},
    AnalysisError, HistoryFilter, HistoryStore, RestWikiService, ScanBroadcaster, ScanError,
    ScanOrchestrator, ScanState, SqliteHistoryStore, WikiService, LLM_SERVICE_FLAG,
};

/// Test helper bundling the orchestrator's mock collaborators.
struct TestHarness {
    analyzer: Arc<MockAnalyzer>,
    wiki: Arc<MockWikiService>,
    flags: Arc<MockFeatureFlags>,
    history: Arc<SqliteHistoryStore>,
    events: ScanBroadcaster,
}

impl TestHarness {
    fn new() -> Self {
        Self {
            analyzer: Arc::new(MockAnalyzer::new()),
            wiki: Arc::new(MockWikiService::new()),
            flags: Arc::new(MockFeatureFlags::new()),
            history: Arc::new(SqliteHistoryStore::in_memory().expect("in-memory store")),
            events: ScanBroadcaster::new(64),
        }
    }

    async fn with_flag_enabled() -> Self {
        let harness = Self::new();
        harness.flags.set_flag(LLM_SERVICE_FLAG, true).await;
        harness
    }

    fn orchestrator(&self) -> ScanOrchestrator {
        ScanOrchestrator::new(
            Arc::clone(&self.analyzer) as Arc<dyn spoor_core::ScatAnalyzer>,
            Arc::clone(&self.wiki) as Arc<dyn spoor_core::WikiService>,
            Arc::clone(&self.flags) as Arc<dyn spoor_core::FeatureFlags>,
            Arc::clone(&self.history) as Arc<dyn HistoryStore>,
            self.events.clone(),
        )
    }
}

/// Drain every event currently buffered on a receiver.
fn drain_events(
    rx: &mut tokio::sync::broadcast::Receiver<spoor_core::ScanEvent>,
) -> Vec<spoor_core::ScanEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[tokio::test]
async fn test_disabled_flag_fails_without_any_service_calls() {
    let harness = TestHarness::new();
    let orchestrator = harness.orchestrator();

    let result = orchestrator.identify(vec![1, 2, 3]).await;

    let err = result.unwrap_err();
    assert!(matches!(err, ScanError::FeatureDisabled));
    assert_eq!(
        err.to_string(),
        "This feature is not available now. Please contact support."
    );

    assert_eq!(harness.flags.queries().await, vec![LLM_SERVICE_FLAG]);
    assert_eq!(harness.analyzer.call_count().await, 0);
    assert_eq!(harness.wiki.lookup_count().await, 0);
}

#[tokio::test]
async fn test_successful_scan_enriches_all_candidates() {
    let harness = TestHarness::with_flag_enabled().await;
    harness.analyzer.set_response(fixtures::scat_analysis(2)).await;
    harness
        .wiki
        .add_summary(
            "Ursus americanus",
            fixtures::wiki_summary("American black bear"),
        )
        .await;
    harness
        .wiki
        .add_summary("Canis latrans", fixtures::wiki_summary("Coyote"))
        .await;

    let orchestrator = harness.orchestrator();
    let report = orchestrator.identify(vec![0xFF, 0xD8]).await.unwrap();

    assert_eq!(harness.analyzer.call_count().await, 1);
    assert_eq!(harness.analyzer.last_image().await, Some(vec![0xFF, 0xD8]));
    assert_eq!(report.summaries.len(), 2);
    assert_eq!(report.summaries[0].title, "American black bear");
    assert_eq!(report.summaries[1].title, "Coyote");
}

#[tokio::test]
async fn test_partial_enrichment_failure_keeps_candidate_order() {
    let harness = TestHarness::with_flag_enabled().await;
    // Three candidates; the middle one has no summary page.
    harness.analyzer.set_response(fixtures::scat_analysis(3)).await;
    harness
        .wiki
        .add_summary(
            "Ursus americanus",
            fixtures::wiki_summary("American black bear"),
        )
        .await;
    harness
        .wiki
        .add_summary("Vulpes vulpes", fixtures::wiki_summary("Red fox"))
        .await;

    let orchestrator = harness.orchestrator();
    let report = orchestrator.identify(vec![1]).await.unwrap();

    assert_eq!(report.analysis.matching_animals.len(), 3);
    assert_eq!(report.summaries.len(), 2);
    assert_eq!(report.summaries[0].title, "American black bear");
    assert_eq!(report.summaries[1].title, "Red fox");
    assert_eq!(harness.wiki.lookup_count().await, 3);
}

#[tokio::test]
async fn test_transport_failure_during_enrichment_is_swallowed() {
    let harness = TestHarness::with_flag_enabled().await;
    harness.analyzer.set_response(fixtures::scat_analysis(2)).await;
    harness
        .wiki
        .add_summary(
            "Ursus americanus",
            fixtures::wiki_summary("American black bear"),
        )
        .await;
    harness.wiki.fail_with_network("Canis latrans").await;

    let orchestrator = harness.orchestrator();
    let report = orchestrator.identify(vec![1]).await.unwrap();

    assert_eq!(report.summaries.len(), 1);
    assert_eq!(report.summaries[0].title, "American black bear");
}

#[tokio::test]
async fn test_zero_candidates_completes_without_lookups() {
    let harness = TestHarness::with_flag_enabled().await;
    harness.analyzer.set_response(fixtures::scat_analysis(0)).await;

    let orchestrator = harness.orchestrator();
    let mut rx = harness.events.subscribe();
    let report = orchestrator.identify(vec![1]).await.unwrap();

    assert!(report.summaries.is_empty());
    assert_eq!(harness.wiki.lookup_count().await, 0);

    let states: Vec<ScanState> = drain_events(&mut rx).into_iter().map(|e| e.state).collect();
    assert_eq!(states.last(), Some(&ScanState::Completed));
}

#[tokio::test]
async fn test_analysis_error_surfaces_verbatim() {
    let harness = TestHarness::with_flag_enabled().await;
    harness
        .analyzer
        .set_next_error(AnalysisError::Api("x".to_string()))
        .await;

    let orchestrator = harness.orchestrator();
    let result = orchestrator.identify(vec![1]).await;

    match result.unwrap_err() {
        ScanError::Analysis(AnalysisError::Api(message)) => assert_eq!(message, "x"),
        other => panic!("expected pass-through api error, got {:?}", other),
    }
    assert_eq!(harness.wiki.lookup_count().await, 0);
}

#[tokio::test]
async fn test_state_transitions_for_a_successful_run() {
    let harness = TestHarness::with_flag_enabled().await;
    harness.analyzer.set_response(fixtures::scat_analysis(1)).await;
    harness
        .wiki
        .add_summary(
            "Ursus americanus",
            fixtures::wiki_summary("American black bear"),
        )
        .await;

    let orchestrator = harness.orchestrator();
    let mut rx = harness.events.subscribe();
    let scan_id = uuid::Uuid::new_v4();
    orchestrator.identify_as(scan_id, vec![1]).await.unwrap();

    let events = drain_events(&mut rx);
    assert!(events.iter().all(|e| e.scan_id == scan_id));

    let states: Vec<ScanState> = events.into_iter().map(|e| e.state).collect();
    assert_eq!(
        states,
        vec![
            ScanState::Initial,
            ScanState::Gating,
            ScanState::Analyzing,
            ScanState::Enriching { candidates: 1 },
            ScanState::Completed,
        ]
    );
}

#[tokio::test]
async fn test_failed_run_emits_failure_state() {
    let harness = TestHarness::new();
    let orchestrator = harness.orchestrator();
    let mut rx = harness.events.subscribe();

    let _ = orchestrator.identify(vec![1]).await;

    let states: Vec<ScanState> = drain_events(&mut rx).into_iter().map(|e| e.state).collect();
    assert_eq!(
        states.last(),
        Some(&ScanState::Failed {
            kind: "feature_disabled".to_string(),
            message: "This feature is not available now. Please contact support.".to_string(),
        })
    );
}

#[tokio::test]
async fn test_completed_report_is_persisted() {
    let harness = TestHarness::with_flag_enabled().await;
    harness.analyzer.set_response(fixtures::scat_analysis(1)).await;
    harness
        .wiki
        .add_summary(
            "Ursus americanus",
            fixtures::wiki_summary("American black bear"),
        )
        .await;

    let orchestrator = harness.orchestrator();
    let report = orchestrator.identify(vec![9, 9, 9]).await.unwrap();

    let stored = harness.history.get(&report.id).unwrap().unwrap();
    assert_eq!(stored.analysis, report.analysis);
    assert_eq!(stored.summaries, report.summaries);
    assert_eq!(stored.image, Some(vec![9, 9, 9]));

    let entries = harness.history.list(&HistoryFilter::new()).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id, report.id);
}

#[tokio::test]
async fn test_failed_run_is_not_persisted() {
    let harness = TestHarness::new();
    let orchestrator = harness.orchestrator();

    let _ = orchestrator.identify(vec![1]).await;

    assert_eq!(harness.history.count().unwrap(), 0);
}

#[tokio::test]
async fn test_wiki_lookup_issues_expected_wire_request() {
    let http_client = Arc::new(MockHttpClient::new());
    let summary_body = serde_json::to_vec(&fixtures::wiki_summary("American black bear")).unwrap();
    http_client.push_response(summary_body).await;

    let wiki = RestWikiService::new(http_client.clone());
    let summary = wiki.summary("Ursus americanus").await.unwrap();
    assert_eq!(summary.title, "American black bear");

    let requests = http_client.requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "GET");
    assert_eq!(
        requests[0].url,
        "https://en.wikipedia.org/api/rest_v1/page/summary/Ursus%20americanus"
    );
    assert!(requests[0].body.is_none());
    assert!(requests[0].headers.is_empty());
}

#[tokio::test]
async fn test_wiki_404_maps_to_not_found() {
    let http_client = Arc::new(MockHttpClient::new());
    http_client
        .push_error(spoor_core::ApiError::ErrorResponse { status: 404 })
        .await;

    let wiki = RestWikiService::new(http_client);
    let result = wiki.summary("Nonexistent species").await;
    assert!(matches!(result, Err(spoor_core::WikiError::NotFound(_))));
}
