//! Scat image analysis via an LLM collaborator.
//!
//! The analyzer receives raw image bytes and returns a structured
//! description plus a ranked list of candidate species. The LLM itself is
//! opaque; only the input/output contract matters to the rest of the crate.

mod gemini;
mod types;

pub use gemini::GeminiAnalyzer;
pub use types::{CandidateSpecies, ScatAnalysis};

use async_trait::async_trait;
use thiserror::Error;

/// Errors reported by the analysis service.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The service responded with content that holds no usable result.
    #[error("analysis service returned an unusable response")]
    InvalidResponse,

    /// The service reported a processing error.
    #[error("analysis service error: {0}")]
    Api(String),
}

/// Collaborator that analyzes a scat image.
#[async_trait]
pub trait ScatAnalyzer: Send + Sync {
    /// Analyze the captured image and return the description plus candidate
    /// species, most likely first.
    async fn analyze_image(&self, image: &[u8]) -> Result<ScatAnalysis, AnalysisError>;
}
