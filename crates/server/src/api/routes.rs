use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::{handlers, scans, ws};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // API routes
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Scans
        .route("/scans", post(scans::create_scan))
        .route("/scans", get(scans::list_scans))
        .route("/scans/{id}", get(scans::get_scan))
        .route("/scans/{id}/image", get(scans::get_scan_image))
        // Real-time scan state updates
        .route("/ws", get(ws::ws_handler))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/metrics", get(handlers::metrics))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use spoor_core::testing::{MockAnalyzer, MockFeatureFlags, MockWikiService};
    use spoor_core::{
        load_config_from_str, HistoryStore, ScanBroadcaster, ScanOrchestrator, SqliteHistoryStore,
    };

    fn test_state() -> Arc<AppState> {
        let config = load_config_from_str(
            r#"
[analysis]
api_key = "test-key"

[flags]
backend = "fixed"
"#,
        )
        .unwrap();

        let history = Arc::new(SqliteHistoryStore::in_memory().unwrap());
        let events = ScanBroadcaster::new(16);
        let orchestrator = Arc::new(ScanOrchestrator::new(
            Arc::new(MockAnalyzer::new()),
            Arc::new(MockWikiService::new()),
            Arc::new(MockFeatureFlags::new()),
            Arc::clone(&history) as Arc<dyn HistoryStore>,
            events.clone(),
        ));

        Arc::new(AppState::new(config, orchestrator, history, events))
    }

    async fn get_json(
        app: Router,
        uri: &str,
    ) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_health_route() {
        let (status, json) = get_json(create_router(test_state()), "/api/v1/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_config_route_redacts_secrets() {
        let (status, json) = get_json(create_router(test_state()), "/api/v1/config").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["analysis"]["api_key_configured"], true);
        assert!(json["analysis"].get("api_key").is_none());
    }

    #[tokio::test]
    async fn test_list_scans_starts_empty() {
        let (status, json) = get_json(create_router(test_state()), "/api/v1/scans").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["total"], 0);
    }

    #[tokio::test]
    async fn test_unknown_scan_is_not_found() {
        let (status, json) = get_json(
            create_router(test_state()),
            "/api/v1/scans/00000000-0000-0000-0000-000000000000",
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(json["error"].as_str().unwrap().contains("scan not found"));
    }

    #[tokio::test]
    async fn test_scan_without_multipart_body_is_rejected() {
        let app = create_router(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/scans")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
