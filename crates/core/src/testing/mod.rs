//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the crate's collaborator
//! traits, allowing pipeline tests without real infrastructure.
//!
//! # Example
//!
//! ```rust,ignore
//! use spoor_core::testing::{fixtures, MockAnalyzer, MockFeatureFlags, MockWikiService};
//!
//! let analyzer = MockAnalyzer::new();
//! analyzer.set_response(fixtures::scat_analysis(2)).await;
//!
//! let wiki = MockWikiService::new();
//! wiki.add_summary("Ursus americanus", fixtures::wiki_summary("American black bear")).await;
//!
//! let flags = MockFeatureFlags::llm_enabled();
//! // Wire into a ScanOrchestrator...
//! ```

mod mock_analyzer;
mod mock_flags;
mod mock_http;
mod mock_wiki;

pub use mock_analyzer::MockAnalyzer;
pub use mock_flags::MockFeatureFlags;
pub use mock_http::{MockHttpClient, RecordedRequest};
pub use mock_wiki::MockWikiService;

/// Test fixtures and helper functions.
pub mod fixtures {
    use uuid::Uuid;

    use crate::analysis::{CandidateSpecies, ScatAnalysis};
    use crate::scan::ScanReport;
    use crate::wiki::{WikiContentUrls, WikiImage, WikiReference, WikiSummary};

    const SPECIES: &[(&str, &str)] = &[
        ("Black Bear", "Ursus americanus"),
        ("Coyote", "Canis latrans"),
        ("Red Fox", "Vulpes vulpes"),
        ("Raccoon", "Procyon lotor"),
        ("White-tailed Deer", "Odocoileus virginianus"),
    ];

    /// Create a candidate species.
    pub fn candidate(animal_name: &str, scientific_name: &str) -> CandidateSpecies {
        CandidateSpecies {
            animal_name: animal_name.to_string(),
            scientific_name: scientific_name.to_string(),
        }
    }

    /// Create an analysis result with `count` candidates drawn from a fixed
    /// species list (cycling when count exceeds it).
    pub fn scat_analysis(count: usize) -> ScatAnalysis {
        ScatAnalysis {
            scat_description: "Tubular scat, 2cm diameter, berry seeds visible".to_string(),
            matching_animals: (0..count)
                .map(|i| {
                    let (name, scientific) = SPECIES[i % SPECIES.len()];
                    candidate(name, scientific)
                })
                .collect(),
        }
    }

    /// Create a wiki summary for a title.
    pub fn wiki_summary(title: &str) -> WikiSummary {
        let slug = title.replace(' ', "_");
        WikiSummary {
            title: title.to_string(),
            extract: format!("{} is a North American mammal.", title),
            thumbnail: WikiImage {
                source: format!("https://upload.wikimedia.org/{}-thumb.jpg", slug),
                width: 320,
                height: 213,
            },
            original_image: WikiImage {
                source: format!("https://upload.wikimedia.org/{}.jpg", slug),
                width: 1280,
                height: 853,
            },
            content_urls: WikiContentUrls {
                mobile: WikiReference {
                    page: format!("https://en.m.wikipedia.org/wiki/{}", slug),
                },
            },
        }
    }

    /// Create a stored scan report with the given candidate and summary
    /// counts.
    pub fn scan_report(candidates: usize, summaries: usize) -> ScanReport {
        let analysis = scat_analysis(candidates);
        let summaries = analysis
            .matching_animals
            .iter()
            .take(summaries)
            .map(|c| wiki_summary(&c.scientific_name))
            .collect();

        ScanReport::new(
            Uuid::new_v4(),
            Some(vec![0xFF, 0xD8, 0xFF, 0xE0]),
            analysis,
            summaries,
        )
    }
}
