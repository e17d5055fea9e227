//! Gemini provider implementation for Visor
//!
//! This module implements the Provider trait against the Generative
//! Language REST API (`generateContent`). Each call is stateless and makes
//! exactly one attempt: one POST per turn for completions, one GET for
//! model discovery. Text-only turns send a single text part; turns with an
//! image attachment send the text part followed by an inline data part.

use crate::config::GeminiConfig;
use crate::error::{Result, VisorError};
use crate::providers::{InlineData, ModelInfo, Provider};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Public Generative Language API endpoint
const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini API provider
///
/// Connects to the Generative Language API to generate completions for
/// text and vision prompts. The API key is required at construction; a
/// missing key fails here rather than on first use.
///
/// # Examples
///
/// ```no_run
/// use visor::config::GeminiConfig;
/// use visor::providers::{GeminiProvider, Provider};
///
/// # async fn example() -> visor::error::Result<()> {
/// let config = GeminiConfig {
///     api_key: Some("your-key".to_string()),
///     ..Default::default()
/// };
/// let provider = GeminiProvider::new(config)?;
/// let reply = provider.generate("Hello!", None).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
    api_key: String,
}

/// Request structure for generateContent
#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

/// One content block in a request or response
#[derive(Debug, Serialize, Deserialize)]
struct Content {
    role: String,
    #[serde(default)]
    parts: Vec<Part>,
}

/// One part of a content block: text or inline binary data
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineDataPart>,
}

/// Inline binary payload in wire format
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineDataPart {
    mime_type: String,
    data: String,
}

/// Response structure from generateContent
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

/// One candidate completion
#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

/// Response structure from the models listing endpoint
#[derive(Debug, Deserialize)]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<GeminiModel>,
}

/// Model metadata in wire format
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiModel {
    name: String,
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    input_token_limit: usize,
    #[serde(default)]
    output_token_limit: usize,
}

impl GeminiProvider {
    /// Create a new Gemini provider instance
    ///
    /// # Arguments
    ///
    /// * `config` - Gemini configuration; `api_key` must be present
    ///
    /// # Returns
    ///
    /// Returns a new GeminiProvider instance
    ///
    /// # Errors
    ///
    /// Returns `VisorError::Config` if the API key is missing or blank, or
    /// if HTTP client initialization fails.
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                VisorError::Config(
                    "Gemini API key is not set. Provide provider.gemini.api_key or the \
                     GEMINI_API_KEY environment variable"
                        .to_string(),
                )
            })?;

        let mut builder = Client::builder().user_agent(concat!("visor/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(timeout));
        }
        let client = builder
            .build()
            .map_err(|e| VisorError::Config(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!("Initialized Gemini provider: model={}", config.model);

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    /// The API base this provider targets
    fn api_base(&self) -> &str {
        self.config
            .api_base
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE)
            .trim_end_matches('/')
    }

    /// Build the single-turn request body
    ///
    /// The text part always comes first; an inline data part follows when
    /// the turn carries an image attachment.
    fn build_request(&self, prompt: &str, attachment: Option<&InlineData>) -> GenerateContentRequest {
        let mut parts = vec![Part {
            text: Some(prompt.to_string()),
            inline_data: None,
        }];

        if let Some(inline) = attachment {
            parts.push(Part {
                text: None,
                inline_data: Some(InlineDataPart {
                    mime_type: inline.mime_type.clone(),
                    data: inline.data.clone(),
                }),
            });
        }

        GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts,
            }],
        }
    }
}

/// Extract the reply text from a generateContent response
///
/// Concatenates the text of every part in the first candidate. A response
/// with no candidates, no content, or no text is malformed and surfaces as
/// an error rather than an empty success.
fn extract_text(response: GenerateContentResponse) -> Result<String> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| VisorError::Remote("Gemini response contained no candidates".to_string()))?;

    let content = candidate
        .content
        .ok_or_else(|| VisorError::Remote("Gemini response contained no content".to_string()))?;

    let text: String = content
        .parts
        .into_iter()
        .filter_map(|part| part.text)
        .collect();

    if text.is_empty() {
        return Err(VisorError::Remote("Gemini response contained no text".to_string()).into());
    }

    Ok(text)
}

/// Strip the `models/` prefix Gemini uses in wire-format model names
fn strip_model_prefix(name: &str) -> &str {
    name.strip_prefix("models/").unwrap_or(name)
}

#[async_trait]
impl Provider for GeminiProvider {
    async fn generate(&self, prompt: &str, attachment: Option<&InlineData>) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.api_base(),
            self.config.model
        );
        let request = self.build_request(prompt, attachment);

        tracing::debug!(
            "Sending Gemini request: model={}, prompt_chars={}, inline={}",
            self.config.model,
            prompt.len(),
            attachment.is_some()
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Gemini request failed: {}", e);
                VisorError::Remote(format!("Gemini request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Gemini returned error {}: {}", status, error_text);
            return Err(VisorError::Remote(format!(
                "Gemini returned error {}: {}",
                status, error_text
            ))
            .into());
        }

        let gemini_response: GenerateContentResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Gemini response: {}", e);
            VisorError::Remote(format!("Failed to parse Gemini response: {}", e))
        })?;

        let text = extract_text(gemini_response)?;
        tracing::debug!("Gemini reply: {} chars", text.len());
        Ok(text)
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let url = format!("{}/models", self.api_base());
        tracing::debug!("Fetching models from Gemini: {}", url);

        let response = self
            .client
            .get(&url)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Failed to fetch Gemini models: {}", e);
                VisorError::Remote(format!("Failed to fetch Gemini models: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Gemini returned error {}: {}", status, error_text);
            return Err(VisorError::Remote(format!(
                "Gemini returned error {}: {}",
                status, error_text
            ))
            .into());
        }

        let list_response: ListModelsResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Gemini models response: {}", e);
            VisorError::Remote(format!("Failed to parse Gemini models response: {}", e))
        })?;

        let models = list_response
            .models
            .into_iter()
            .map(|model| {
                let name = strip_model_prefix(&model.name).to_string();
                let display_name = if model.display_name.is_empty() {
                    name.clone()
                } else {
                    model.display_name
                };
                ModelInfo {
                    name,
                    display_name,
                    description: model.description,
                    input_token_limit: model.input_token_limit,
                    output_token_limit: model.output_token_limit,
                }
            })
            .collect::<Vec<_>>();

        tracing::debug!("Fetched {} models from Gemini", models.len());
        Ok(models)
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_provider() -> GeminiProvider {
        GeminiProvider::new(GeminiConfig {
            api_key: Some("test-key".to_string()),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_gemini_provider_creation() {
        let provider = test_provider();
        assert_eq!(provider.model(), "gemini-2.5-flash");
    }

    #[test]
    fn test_gemini_provider_missing_key_returns_error() {
        let result = GeminiProvider::new(GeminiConfig::default());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_gemini_provider_blank_key_returns_error() {
        let result = GeminiProvider::new(GeminiConfig {
            api_key: Some("   ".to_string()),
            ..Default::default()
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_api_base_defaults_to_public_endpoint() {
        let provider = test_provider();
        assert_eq!(
            provider.api_base(),
            "https://generativelanguage.googleapis.com/v1beta"
        );
    }

    #[test]
    fn test_api_base_override_trims_trailing_slash() {
        let provider = GeminiProvider::new(GeminiConfig {
            api_key: Some("test-key".to_string()),
            api_base: Some("http://localhost:9090/".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(provider.api_base(), "http://localhost:9090");
    }

    #[test]
    fn test_build_request_text_only() {
        let provider = test_provider();
        let request = provider.build_request("Hello!", None);
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "contents": [{
                    "role": "user",
                    "parts": [{"text": "Hello!"}]
                }]
            })
        );
    }

    #[test]
    fn test_build_request_with_inline_data() {
        let provider = test_provider();
        let inline = InlineData {
            mime_type: "image/png".to_string(),
            data: "aGVsbG8=".to_string(),
        };
        let request = provider.build_request("describe", Some(&inline));
        let value = serde_json::to_value(&request).unwrap();

        let parts = &value["contents"][0]["parts"];
        assert_eq!(parts.as_array().unwrap().len(), 2);
        // Text part first, inline part second, camelCase wire names.
        assert_eq!(parts[0]["text"], "describe");
        assert_eq!(parts[1]["inlineData"]["mimeType"], "image/png");
        assert_eq!(parts[1]["inlineData"]["data"], "aGVsbG8=");
        assert!(parts[1].get("inline_data").is_none());
    }

    #[test]
    fn test_extract_text_concatenates_parts() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{"text": "Hello"}, {"text": ", world"}]
                }
            }]
        }))
        .unwrap();

        assert_eq!(extract_text(response).unwrap(), "Hello, world");
    }

    #[test]
    fn test_extract_text_no_candidates_returns_error() {
        let response: GenerateContentResponse =
            serde_json::from_value(serde_json::json!({"candidates": []})).unwrap();
        let err = extract_text(response).unwrap_err().to_string();
        assert!(err.contains("no candidates"));
    }

    #[test]
    fn test_extract_text_missing_content_returns_error() {
        let response: GenerateContentResponse =
            serde_json::from_value(serde_json::json!({"candidates": [{}]})).unwrap();
        let err = extract_text(response).unwrap_err().to_string();
        assert!(err.contains("no content"));
    }

    #[test]
    fn test_extract_text_empty_parts_returns_error() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{
                "content": {"role": "model", "parts": []}
            }]
        }))
        .unwrap();
        let err = extract_text(response).unwrap_err().to_string();
        assert!(err.contains("no text"));
    }

    #[test]
    fn test_strip_model_prefix() {
        assert_eq!(strip_model_prefix("models/gemini-2.5-flash"), "gemini-2.5-flash");
        assert_eq!(strip_model_prefix("gemini-2.5-flash"), "gemini-2.5-flash");
    }

    #[test]
    fn test_list_models_response_parses_wire_format() {
        let response: ListModelsResponse = serde_json::from_value(serde_json::json!({
            "models": [{
                "name": "models/gemini-2.5-flash",
                "displayName": "Gemini 2.5 Flash",
                "description": "Fast multimodal model",
                "inputTokenLimit": 1048576,
                "outputTokenLimit": 65536
            }]
        }))
        .unwrap();

        assert_eq!(response.models.len(), 1);
        assert_eq!(response.models[0].display_name, "Gemini 2.5 Flash");
        assert_eq!(response.models[0].input_token_limit, 1_048_576);
    }
}
