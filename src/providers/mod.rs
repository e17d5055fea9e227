//! Provider module for Visor
//!
//! This module contains the completion provider abstraction and the Gemini
//! implementation. A provider wraps exactly one outbound call per turn; it
//! never retries, caches, or fabricates reply text.

pub mod gemini;

pub use gemini::GeminiProvider;

use crate::error::{Result, VisorError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Inline binary payload for a vision request
///
/// `data` is the standard padded base64 encoding of the attachment bytes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InlineData {
    /// MIME type of the encoded bytes, e.g. `image/png`
    pub mime_type: String,
    /// Base64-encoded payload
    pub data: String,
}

/// Basic metadata about a model available to the configured credential
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelInfo {
    /// Model identifier, e.g. `gemini-2.5-flash`
    pub name: String,

    /// Human-readable model name
    pub display_name: String,

    /// Short description of the model
    #[serde(default)]
    pub description: String,

    /// Maximum input tokens accepted in one request
    #[serde(default)]
    pub input_token_limit: usize,

    /// Maximum output tokens produced by one request
    #[serde(default)]
    pub output_token_limit: usize,
}

/// Completion provider abstraction
///
/// Implementations perform a single stateless request per call; prior
/// conversation turns are never resent. Every failure is a tagged error,
/// so callers own all user-facing failure text.
#[async_trait]
pub trait Provider: Send + Sync + std::fmt::Debug {
    /// Generate a completion for one turn
    ///
    /// # Arguments
    ///
    /// * `prompt` - The full prompt text for this turn
    /// * `attachment` - Optional inline binary payload (image branch)
    ///
    /// # Returns
    ///
    /// Returns the reply text
    ///
    /// # Errors
    ///
    /// Returns `VisorError::Remote` for network failures, non-success
    /// statuses, and malformed or empty responses.
    async fn generate(&self, prompt: &str, attachment: Option<&InlineData>) -> Result<String>;

    /// List models available to the configured credential
    async fn list_models(&self) -> Result<Vec<ModelInfo>>;

    /// The model identifier `generate` targets
    fn model(&self) -> &str;
}

/// Create a provider instance based on configuration
///
/// # Arguments
///
/// * `provider_type` - Type of provider ("gemini")
/// * `config` - Provider configuration
///
/// # Returns
///
/// Returns a boxed provider instance
///
/// # Errors
///
/// Returns error if the provider type is unknown or construction fails
/// (for Gemini, a missing API key fails here, before any turn runs).
pub fn create_provider(
    provider_type: &str,
    config: &crate::config::ProviderConfig,
) -> Result<Box<dyn Provider>> {
    match provider_type {
        "gemini" => Ok(Box::new(gemini::GeminiProvider::new(config.gemini.clone())?)),
        _ => Err(VisorError::Config(format!("Unknown provider type: {}", provider_type)).into()),
    }
}
