//! Runtime configuration loaded from the environment.
//!
//! | variable | default |
//! |---|---|
//! | `GEMINI_API_KEY` | unset: interior leg always falls back |
//! | `GEMINI_VISION_MODEL`, then `GEMINI_MODEL` | `gemini-1.5-flash` |
//! | `GEMINI_BASE_URL` | public endpoint |
//! | `AUTOFIX_UPLOADS_DIR` | `uploads` |
//! | `AUTOFIX_REQUEST_TIMEOUT` | `120s` |
//! | `AUTOFIX_LOG_LEVEL` | `info` |

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::providers::{
    ApiCredential, CompletionConfig, CredentialSource, UnconfiguredProvider, VisionProvider,
};

pub const DEFAULT_VISION_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_UPLOADS_DIR: &str = "uploads";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Errors from configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid duration in {var}: '{value}' ({source})")]
    InvalidDuration {
        var: &'static str,
        value: String,
        #[source]
        source: humantime::DurationError,
    },
}

/// Configuration for the valuation runtime.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Vision API key; `None` when not configured
    pub api_key: Option<ApiCredential>,

    /// Override for the vision API endpoint
    pub base_url: Option<String>,

    /// Model, timeout and sampling settings for classification calls
    pub completion: CompletionConfig,

    /// Directory uploaded photos are read from
    pub uploads_dir: PathBuf,

    /// Fallback tracing filter when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            completion: CompletionConfig {
                model: DEFAULT_VISION_MODEL.to_string(),
                timeout: DEFAULT_REQUEST_TIMEOUT,
                ..CompletionConfig::default()
            },
            uploads_dir: PathBuf::from(DEFAULT_UPLOADS_DIR),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Load from the process environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "Loaded .env file");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let api_key = get("GEMINI_API_KEY")
            .map(|key| ApiCredential::new(key, CredentialSource::Environment, "Gemini API key"));

        let model = get("GEMINI_VISION_MODEL")
            .or_else(|| get("GEMINI_MODEL"))
            .unwrap_or_else(|| DEFAULT_VISION_MODEL.to_string());

        let timeout = match get("AUTOFIX_REQUEST_TIMEOUT") {
            Some(value) => humantime::parse_duration(value.trim()).map_err(|source| {
                ConfigError::InvalidDuration {
                    var: "AUTOFIX_REQUEST_TIMEOUT",
                    value,
                    source,
                }
            })?,
            None => DEFAULT_REQUEST_TIMEOUT,
        };

        Ok(Self {
            api_key,
            base_url: get("GEMINI_BASE_URL"),
            completion: CompletionConfig {
                model,
                timeout,
                ..defaults.completion
            },
            uploads_dir: get("AUTOFIX_UPLOADS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.uploads_dir),
            log_level: get("AUTOFIX_LOG_LEVEL").unwrap_or(defaults.log_level),
        })
    }

    /// Build the configured vision provider.
    ///
    /// Without an API key this is an [`UnconfiguredProvider`], so every
    /// interior classification degrades to the fallback row.
    pub fn vision_provider(&self) -> Arc<dyn VisionProvider> {
        let Some(credential) = self.api_key.clone() else {
            return Arc::new(UnconfiguredProvider::new("GEMINI_API_KEY not configured"));
        };

        self.build_provider(credential)
    }

    #[cfg(feature = "gemini")]
    fn build_provider(&self, credential: ApiCredential) -> Arc<dyn VisionProvider> {
        let provider = crate::providers::GeminiProvider::with_credential(credential);
        match &self.base_url {
            Some(url) => Arc::new(provider.with_base_url(url.clone())),
            None => Arc::new(provider),
        }
    }

    #[cfg(not(feature = "gemini"))]
    fn build_provider(&self, _credential: ApiCredential) -> Arc<dyn VisionProvider> {
        Arc::new(UnconfiguredProvider::new(
            "Gemini provider requires the 'gemini' feature",
        ))
    }
}
