//! Scan result and error types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::analysis::{AnalysisError, ScatAnalysis};
use crate::wiki::WikiSummary;

/// Errors that terminate a scan run.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The gating flag declined the run. Carries the fixed user-facing
    /// message; no network activity happened.
    #[error("This feature is not available now. Please contact support.")]
    FeatureDisabled,

    /// The analysis service failed. The underlying error is surfaced
    /// unchanged.
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

impl ScanError {
    /// Stable kind tag for state events and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ScanError::FeatureDisabled => "feature_disabled",
            ScanError::Analysis(AnalysisError::InvalidResponse) => "invalid_response",
            ScanError::Analysis(AnalysisError::Api(_)) => "api_error",
        }
    }
}

/// The merged result of one completed scan run.
///
/// `summaries` is a subsequence of `analysis.matching_animals` in original
/// order: candidates whose lookup failed are omitted, never replaced by a
/// placeholder. Created once per run and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanReport {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    /// Captured image bytes. Not part of the JSON representation; the
    /// server exposes it through a dedicated endpoint.
    #[serde(skip)]
    pub image: Option<Vec<u8>>,
    pub analysis: ScatAnalysis,
    pub summaries: Vec<WikiSummary>,
}

impl ScanReport {
    pub fn new(
        id: Uuid,
        image: Option<Vec<u8>>,
        analysis: ScatAnalysis,
        summaries: Vec<WikiSummary>,
    ) -> Self {
        Self {
            id,
            created_at: Utc::now(),
            image,
            analysis,
            summaries,
        }
    }
}
