//! Mock analysis service for testing.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::analysis::{AnalysisError, ScatAnalysis, ScatAnalyzer};

/// Mock implementation of the [`ScatAnalyzer`] trait.
///
/// Provides controllable behavior for testing:
/// - Return a configurable analysis result
/// - Fail the next call with an injected error
/// - Track invocations for assertions
pub struct MockAnalyzer {
    response: Arc<RwLock<Option<ScatAnalysis>>>,
    /// If set, the next call fails with this error (taken once).
    next_error: Arc<RwLock<Option<AnalysisError>>>,
    /// Recorded image payloads, one per invocation.
    calls: Arc<RwLock<Vec<Vec<u8>>>>,
}

impl Default for MockAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAnalyzer {
    pub fn new() -> Self {
        Self {
            response: Arc::new(RwLock::new(None)),
            next_error: Arc::new(RwLock::new(None)),
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Set the analysis returned by subsequent calls.
    pub async fn set_response(&self, analysis: ScatAnalysis) {
        *self.response.write().await = Some(analysis);
    }

    /// Fail the next call with the given error.
    pub async fn set_next_error(&self, error: AnalysisError) {
        *self.next_error.write().await = Some(error);
    }

    /// Number of times the analyzer was invoked.
    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }

    /// The image bytes passed to the most recent invocation.
    pub async fn last_image(&self) -> Option<Vec<u8>> {
        self.calls.read().await.last().cloned()
    }
}

#[async_trait]
impl ScatAnalyzer for MockAnalyzer {
    async fn analyze_image(&self, image: &[u8]) -> Result<ScatAnalysis, AnalysisError> {
        self.calls.write().await.push(image.to_vec());

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        match self.response.read().await.clone() {
            Some(analysis) => Ok(analysis),
            None => Err(AnalysisError::InvalidResponse),
        }
    }
}
