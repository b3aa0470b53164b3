//! # autofix-runtime
//!
//! Vision-model collaborators and the end-to-end valuation pipeline.
//!
//! The engine in `autofix-core` is fully deterministic and never calls a
//! model. This crate supplies what it needs from the outside world:
//! photos from an uploads directory, interior wear classification from a
//! hosted vision model, and a base price for the vehicle.
//!
//! ## Degradation
//!
//! A valuation always completes. A failed classification becomes the
//! `moderate` fallback row; a failed price lookup becomes the default
//! price. Missing inputs are reported per leg in
//! [`ValuationReport::failures`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use autofix_runtime::{RuntimeConfig, ValuationPipeline, ValuationRequest};
//!
//! let config = RuntimeConfig::from_env()?;
//! let pipeline = ValuationPipeline::builder()
//!     .provider(config.vision_provider())
//!     .config(config)
//!     .build()?;
//!
//! let report = pipeline.run(&request).await;
//! println!("{}", report.valuation.preliminary_value);
//! ```

use thiserror::Error;

pub mod config;
pub mod interior;
pub mod pipeline;
pub mod pricing;
pub mod prompts;
pub mod providers;

pub use config::{ConfigError, RuntimeConfig};
pub use interior::InteriorAnalyzer;
pub use pipeline::{
    Leg, LegFailure, ValuationPipeline, ValuationPipelineBuilder, ValuationReport,
    ValuationRequest, VehicleDetails,
};
pub use pricing::{BasePriceSource, FixedBasePrice, PriceTable};
pub use providers::{
    CompletionConfig, CompletionResponse, ImageInput, ProviderError, UnconfiguredProvider,
    VisionProvider,
};

#[cfg(feature = "gemini")]
pub use providers::GeminiProvider;

/// Errors from the runtime.
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Provider not configured: {0}")]
    ProviderNotConfigured(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}
