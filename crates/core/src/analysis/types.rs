//! Analysis result types.
//!
//! Field names map to the camelCase JSON the analysis prompt asks the model
//! to produce, so these types decode the LLM output directly.

use serde::{Deserialize, Serialize};

/// Structured result of one image analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScatAnalysis {
    /// Free-text description of the scat's characteristics.
    pub scat_description: String,
    /// Candidate species, most likely first. May be empty.
    pub matching_animals: Vec<CandidateSpecies>,
}

/// One species suggested by the analysis service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateSpecies {
    /// Common name, e.g. "Black Bear".
    pub animal_name: String,
    /// Scientific name, e.g. "Ursus americanus".
    pub scientific_name: String,
}
