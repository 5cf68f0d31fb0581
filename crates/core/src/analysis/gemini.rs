//! Gemini API client for scat image analysis.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{AnalysisError, ScatAnalysis, ScatAnalyzer};

const PROMPT: &str = r#"You are an expert in wildlife biology and animal tracking. Given an image of scat, analyze its characteristics such as size, shape, color, consistency, and contents (e.g., fur, seeds, bones). Then, return a JSON object following this structure:
{
  "scatDescription": "<A detailed description of the scat, including size, shape, color, consistency, and any identifiable contents>",
  "matchingAnimals": [
    {
      "animalName": "<Common name of the most likely animal>",
      "scientificName": "<Scientific name of the most likely animal>"
    }
  ]
}

Consider regional wildlife when suggesting animals. Provide the most accurate matches based on known scat identification principles."#;

/// Gemini-backed [`ScatAnalyzer`].
///
/// Sends the identification prompt together with the image as inline data
/// and asks for a JSON-typed response, then parses the returned text into a
/// [`ScatAnalysis`].
pub struct GeminiAnalyzer {
    client: reqwest::Client,
    api_key: String,
    model: String,
    api_base: String,
}

impl GeminiAnalyzer {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            api_base: "https://generativelanguage.googleapis.com".to_string(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiRequestPart>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequestPart {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<GeminiInlineData>,
}

impl GeminiRequestPart {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    fn image(mime_type: &str, data: String) -> Self {
        Self {
            text: None,
            inline_data: Some(GeminiInlineData {
                mime_type: mime_type.to_string(),
                data,
            }),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiInlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    response_mime_type: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiResponseContent,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    message: String,
}

#[async_trait]
impl ScatAnalyzer for GeminiAnalyzer {
    async fn analyze_image(&self, image: &[u8]) -> Result<ScatAnalysis, AnalysisError> {
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![
                    GeminiRequestPart::text(PROMPT),
                    GeminiRequestPart::image("image/jpeg", BASE64.encode(image)),
                ],
            }],
            generation_config: GeminiGenerationConfig {
                response_mime_type: "application/json".to_string(),
            },
        };

        debug!(model = %self.model, image_bytes = image.len(), "requesting scat analysis");

        let response = self
            .client
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.api_base, self.model
            ))
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| AnalysisError::Api(e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            let error_text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiError>(&error_text)
                .map(|e| e.error.message)
                .unwrap_or(error_text);
            return Err(AnalysisError::Api(format!("{}: {}", status, message)));
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(|_| AnalysisError::InvalidResponse)?;

        let text = gemini_response
            .candidates
            .into_iter()
            .next()
            .map(|c| {
                c.content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .filter(|text| !text.is_empty())
            .ok_or(AnalysisError::InvalidResponse)?;

        serde_json::from_str(&text)
            .map_err(|e| AnalysisError::Api(format!("failed to parse response: {}", e)))
    }
}
