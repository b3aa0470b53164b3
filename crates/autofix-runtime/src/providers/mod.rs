//! Vision provider abstractions for autofix-runtime.
//!
//! This module defines the trait for hosted vision models and the Gemini
//! implementation used in production.
//!
//! ## Security
//!
//! Providers hold their API keys as [`ApiCredential`]s; see [`secrets`].

use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

pub mod secrets;

#[cfg(feature = "gemini")]
mod gemini;

pub use secrets::{ApiCredential, CredentialSource};

#[cfg(feature = "gemini")]
pub use gemini::{GeminiProvider, GEMINI_BASE_URL};

/// Errors from vision providers.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    #[error("Rate limit exceeded, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    ParseError(String),

    #[error("Empty response from vision model")]
    EmptyResponse,

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),
}

/// Configuration for a single classification call.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    /// Model to use
    pub model: String,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// Temperature (0.0 for deterministic)
    pub temperature: f32,

    /// Request timeout
    pub timeout: Duration,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            model: "gemini-1.5-flash".to_string(),
            max_tokens: 500,
            temperature: 0.0,
            timeout: Duration::from_secs(120),
        }
    }
}

/// An image sent inline with the prompt.
#[derive(Clone)]
pub struct ImageInput {
    pub data: Vec<u8>,
    pub mime_type: &'static str,
}

impl ImageInput {
    /// Wrap image bytes, deriving the MIME type from `filename`.
    pub fn new(data: Vec<u8>, filename: &str) -> Self {
        Self {
            data,
            mime_type: detect_mime(filename),
        }
    }
}

impl std::fmt::Debug for ImageInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageInput")
            .field("bytes", &self.data.len())
            .field("mime_type", &self.mime_type)
            .finish()
    }
}

/// MIME type for an uploaded photo: PNG by extension, JPEG otherwise.
pub fn detect_mime(filename: &str) -> &'static str {
    let is_png = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));

    if is_png {
        "image/png"
    } else {
        "image/jpeg"
    }
}

/// Response from a vision model.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Generated text; expected to embed a JSON object
    pub content: String,

    /// Token usage
    pub usage: TokenUsage,

    /// Model used
    pub model: String,

    /// Finish reason reported by the provider
    pub stop_reason: Option<String>,
}

/// Token usage from a completion.
#[derive(Debug, Clone, Default)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl TokenUsage {
    /// Total tokens used.
    pub fn total(&self) -> u32 {
        self.prompt_tokens + self.completion_tokens
    }
}

/// Provider abstraction for hosted vision models.
///
/// This is the only place the system talks to a model. The engine in
/// `autofix-core` only ever sees the returned text.
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Send one image and a prompt, returning the model's text.
    async fn classify(
        &self,
        image: &ImageInput,
        prompt: &str,
        config: &CompletionConfig,
    ) -> Result<CompletionResponse, ProviderError>;

    /// Check if provider is usable.
    async fn health_check(&self) -> bool;

    /// Get provider name for logs.
    fn name(&self) -> &str;
}

/// Stand-in used when no API key is configured. Every call fails, which
/// sends the interior leg down the fallback path.
#[derive(Debug, Clone)]
pub struct UnconfiguredProvider {
    reason: String,
}

impl UnconfiguredProvider {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl VisionProvider for UnconfiguredProvider {
    async fn classify(
        &self,
        _image: &ImageInput,
        _prompt: &str,
        _config: &CompletionConfig,
    ) -> Result<CompletionResponse, ProviderError> {
        Err(ProviderError::NotConfigured(self.reason.clone()))
    }

    async fn health_check(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        "unconfigured"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_mime() {
        assert_eq!(detect_mime("interior.png"), "image/png");
        assert_eq!(detect_mime("INTERIOR.PNG"), "image/png");
        assert_eq!(detect_mime("front.jpg"), "image/jpeg");
        assert_eq!(detect_mime("rear.webp"), "image/jpeg");
        assert_eq!(detect_mime("no-extension"), "image/jpeg");
    }

    #[test]
    fn test_image_input_debug_hides_bytes() {
        let image = ImageInput::new(vec![0u8; 2048], "seat.png");
        let debug = format!("{:?}", image);
        assert!(debug.contains("2048"));
        assert!(debug.contains("image/png"));
    }

    #[test]
    fn test_token_usage_total() {
        let usage = TokenUsage {
            prompt_tokens: 100,
            completion_tokens: 50,
        };
        assert_eq!(usage.total(), 150);
    }

    #[tokio::test]
    async fn test_unconfigured_provider_always_fails() {
        let provider = UnconfiguredProvider::new("GEMINI_API_KEY not configured");
        let image = ImageInput::new(vec![1, 2, 3], "seat.jpg");

        let result = provider
            .classify(&image, "prompt", &CompletionConfig::default())
            .await;

        assert!(matches!(result, Err(ProviderError::NotConfigured(_))));
        assert!(!provider.health_check().await);
    }
}
