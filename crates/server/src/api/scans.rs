//! Scan API handlers.

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use spoor_core::{HistoryEntry, HistoryError, HistoryFilter, ScanReport};

use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct CreateScanResponse {
    pub scan_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct ListScansParams {
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ListScansResponse {
    pub scans: Vec<HistoryEntry>,
    pub total: i64,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(message: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

fn not_found(message: impl Into<String>) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

fn internal_error(error: HistoryError) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/scans
///
/// Accept a captured image (multipart field `image`) and start an
/// identification run. Responds immediately with the scan id; state
/// transitions reach clients through the WebSocket channel and the stored
/// report through the scan endpoints.
pub async fn create_scan(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<CreateScanResponse>), ApiError> {
    let mut image: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(format!("invalid multipart body: {}", e)))?
    {
        if field.name() == Some("image") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| bad_request(format!("failed to read image field: {}", e)))?;
            image = Some(bytes.to_vec());
        }
    }

    let Some(image) = image else {
        return Err(bad_request("missing multipart field: image"));
    };
    if image.is_empty() {
        return Err(bad_request("image field is empty"));
    }

    let scan_id = Uuid::new_v4();
    debug!(%scan_id, image_bytes = image.len(), "accepted scan upload");

    let orchestrator = Arc::clone(state.orchestrator());
    tokio::spawn(async move {
        // The terminal state reaches clients through the event channel, and
        // the report through the history endpoints.
        let _ = orchestrator.identify_as(scan_id, image).await;
    });

    Ok((StatusCode::ACCEPTED, Json(CreateScanResponse { scan_id })))
}

/// GET /api/v1/scans
///
/// List stored scans, newest first.
pub async fn list_scans(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListScansParams>,
) -> Result<Json<ListScansResponse>, ApiError> {
    let mut filter = HistoryFilter::new();
    if let Some(limit) = params.limit {
        filter = filter.with_limit(limit);
    }
    if let Some(offset) = params.offset {
        filter = filter.with_offset(offset);
    }

    let scans = state.history().list(&filter).map_err(internal_error)?;
    let total = state.history().count().map_err(internal_error)?;

    Ok(Json(ListScansResponse { scans, total }))
}

/// GET /api/v1/scans/{id}
///
/// Fetch one stored scan report. The captured image is not part of the
/// JSON body; it has its own endpoint.
pub async fn get_scan(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ScanReport>, ApiError> {
    match state.history().get(&id).map_err(internal_error)? {
        Some(report) => Ok(Json(report)),
        None => Err(not_found(format!("scan not found: {}", id))),
    }
}

/// GET /api/v1/scans/{id}/image
///
/// Fetch the captured image for one stored scan.
pub async fn get_scan_image(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let report = state
        .history()
        .get(&id)
        .map_err(internal_error)?
        .ok_or_else(|| not_found(format!("scan not found: {}", id)))?;

    match report.image {
        Some(image) => Ok(([(header::CONTENT_TYPE, "image/jpeg")], image)),
        None => Err(not_found(format!("scan {} has no stored image", id))),
    }
}
