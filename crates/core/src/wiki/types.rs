//! Wikipedia REST API summary types.

use serde::{Deserialize, Serialize};

/// Summary page for one species, as returned by the page/summary endpoint.
///
/// Thumbnail and original image are required: a page without imagery fails
/// decoding and the candidate is dropped from the scan's enrichment list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WikiSummary {
    pub title: String,
    pub extract: String,
    pub thumbnail: WikiImage,
    #[serde(rename = "originalimage")]
    pub original_image: WikiImage,
    #[serde(rename = "content_urls")]
    pub content_urls: WikiContentUrls,
}

/// One image reference within a summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WikiImage {
    pub source: String,
    pub width: u32,
    pub height: u32,
}

/// Links to the rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WikiContentUrls {
    pub mobile: WikiReference,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WikiReference {
    pub page: String,
}
