//! End-to-end valuation pipeline.
//!
//! The pipeline resolves the base price, runs the interior leg against the
//! vision provider, and hands everything to the deterministic engine. It
//! implements:
//! - Lenient parsing of mileage and price at the boundary
//! - Per-leg failure reporting (a failed leg never aborts the valuation)
//! - Deterministic fan-in through `autofix_core::value_vehicle`

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use autofix_core::{
    parse_km_or_zero, parse_price_or_default, value_vehicle, Angle, ConditionLabel,
    ConditionSummary, Coverage, InteriorAssessment, Money, RepairCost, Valuation,
    ValuationInputs, DEFAULT_BASE_PRICE,
};

use crate::config::RuntimeConfig;
use crate::interior::InteriorAnalyzer;
use crate::pricing::{BasePriceSource, FixedBasePrice};
use crate::providers::VisionProvider;
use crate::RuntimeError;

/// Vehicle identity as entered by the owner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDetails {
    #[serde(default)]
    pub owner_name: String,

    #[serde(default)]
    pub model: String,

    #[serde(default, deserialize_with = "string_or_number")]
    pub year: String,
}

/// One valuation request.
///
/// Numbers the owner types (`year`, `mileage`, `basePrice`) are accepted as
/// strings or plain numbers and parsed leniently later.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationRequest {
    #[serde(default)]
    pub vehicle: VehicleDetails,

    /// Uploaded photo filename per capture slot
    #[serde(default)]
    pub captures: BTreeMap<Angle, String>,

    /// Damaged parts reported by the exterior detector
    #[serde(default)]
    pub detected_parts: Vec<String>,

    /// Repair estimate lines for the detected parts
    #[serde(default)]
    pub repairs: Vec<RepairCost>,

    #[serde(default, deserialize_with = "string_or_number")]
    pub mileage: String,

    /// Explicit base price; when absent the price source is asked
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub base_price: Option<String>,
}

impl ValuationRequest {
    /// Capture slots with a non-blank filename.
    pub fn filled_angles(&self) -> Vec<Angle> {
        self.captures
            .iter()
            .filter(|(_, name)| !name.trim().is_empty())
            .map(|(angle, _)| *angle)
            .collect()
    }
}

/// A leg of the pipeline that can fail on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Leg {
    BasePrice,
    Interior,
}

impl fmt::Display for Leg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Leg::BasePrice => write!(f, "base_price"),
            Leg::Interior => write!(f, "interior"),
        }
    }
}

/// A recorded failure for one leg.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegFailure {
    pub leg: Leg,
    pub error: String,
}

/// Everything the pipeline returns for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationReport {
    /// `session-<epoch millis>`
    pub session_id: String,

    pub valuation: Valuation,

    /// Interior leg result; `None` when there was no interior photo or the
    /// leg failed on its inputs
    pub interior: Option<InteriorAssessment>,

    pub coverage: Coverage,

    pub summary: ConditionSummary,

    /// Legs that could not run; empty on a clean run
    pub failures: Vec<LegFailure>,
}

impl ValuationReport {
    /// True when any leg failed or ran on fallback data.
    pub fn is_degraded(&self) -> bool {
        !self.failures.is_empty() || self.interior.as_ref().is_some_and(|i| i.degraded)
    }
}

/// The valuation pipeline.
///
/// # Execution Flow
/// 1. Resolve the base price (explicit, looked up, or the default)
/// 2. Classify the interior photo if one was captured (fallback on any
///    model failure)
/// 3. Parse mileage leniently
/// 4. Aggregate repairs, mileage and interior in that order
/// 5. Attach coverage and summary scores
pub struct ValuationPipeline {
    analyzer: InteriorAnalyzer,
    price_source: Arc<dyn BasePriceSource>,
}

impl ValuationPipeline {
    pub fn new(
        provider: Arc<dyn VisionProvider>,
        price_source: Arc<dyn BasePriceSource>,
        config: RuntimeConfig,
    ) -> Self {
        Self {
            analyzer: InteriorAnalyzer::new(provider, config.uploads_dir, config.completion),
            price_source,
        }
    }

    pub fn builder() -> ValuationPipelineBuilder {
        ValuationPipelineBuilder::new()
    }

    /// Run one valuation. Never fails; see [`ValuationReport::failures`].
    pub async fn run(&self, request: &ValuationRequest) -> ValuationReport {
        let session_id = format!("session-{}", chrono::Utc::now().timestamp_millis());
        let mut failures = Vec::new();

        let base_price = self.resolve_base_price(request, &mut failures).await;

        // A failed interior leg still scores as moderate in the summary.
        let (interior, interior_condition) = match request.captures.get(&Angle::Interior) {
            None => {
                tracing::debug!(session = %session_id, "No interior capture, skipping leg");
                (None, None)
            }
            Some(file) => match self.analyzer.analyze_priced(Some(file.as_str()), base_price).await {
                Ok(assessment) => {
                    let condition = assessment.condition;
                    (Some(assessment), Some(condition))
                }
                Err(e) => {
                    tracing::warn!(session = %session_id, leg = %Leg::Interior, error = %e, "Leg failed");
                    failures.push(LegFailure {
                        leg: Leg::Interior,
                        error: e.to_string(),
                    });
                    (None, Some(ConditionLabel::Moderate))
                }
            },
        };

        let inputs = ValuationInputs {
            base_price,
            repairs: request.repairs.clone(),
            mileage_km: parse_km_or_zero(&request.mileage),
            interior,
        };
        let valuation = value_vehicle(&inputs);

        let coverage = Coverage::from_angles(&request.filled_angles());
        let summary =
            ConditionSummary::new(request.detected_parts.len(), interior_condition, &valuation);

        tracing::info!(
            session = %session_id,
            preliminary_value = valuation.preliminary_value,
            adjustments = valuation.adjustments.len(),
            failures = failures.len(),
            "Valuation complete"
        );

        ValuationReport {
            session_id,
            valuation,
            interior: inputs.interior,
            coverage,
            summary,
            failures,
        }
    }

    async fn resolve_base_price(
        &self,
        request: &ValuationRequest,
        failures: &mut Vec<LegFailure>,
    ) -> Money {
        if let Some(raw) = &request.base_price {
            return parse_price_or_default(raw);
        }

        let vehicle = &request.vehicle;
        let lookup = self
            .price_source
            .base_price(&vehicle.model, &vehicle.year)
            .await
            .map_err(|e| e.to_string());

        match lookup {
            Ok(price) if price > 0 => price,
            Ok(price) => {
                self.record_price_failure(failures, format!("non-positive base price {price}"))
            }
            Err(error) => self.record_price_failure(failures, error),
        }
    }

    fn record_price_failure(&self, failures: &mut Vec<LegFailure>, error: String) -> Money {
        tracing::warn!(
            leg = %Leg::BasePrice,
            source = self.price_source.name(),
            error = %error,
            default = DEFAULT_BASE_PRICE,
            "Base price lookup failed, using default"
        );
        failures.push(LegFailure {
            leg: Leg::BasePrice,
            error,
        });
        DEFAULT_BASE_PRICE
    }
}

/// Builder for [`ValuationPipeline`].
pub struct ValuationPipelineBuilder {
    provider: Option<Arc<dyn VisionProvider>>,
    price_source: Option<Arc<dyn BasePriceSource>>,
    config: RuntimeConfig,
}

impl ValuationPipelineBuilder {
    pub fn new() -> Self {
        Self {
            provider: None,
            price_source: None,
            config: RuntimeConfig::default(),
        }
    }

    /// Set the vision provider.
    pub fn provider(mut self, provider: Arc<dyn VisionProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the base-price source. Defaults to [`FixedBasePrice`].
    pub fn price_source(mut self, source: Arc<dyn BasePriceSource>) -> Self {
        self.price_source = Some(source);
        self
    }

    /// Set the configuration.
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the pipeline.
    pub fn build(self) -> Result<ValuationPipeline, RuntimeError> {
        let provider = self
            .provider
            .ok_or_else(|| RuntimeError::ProviderNotConfigured("No provider set".to_string()))?;
        let price_source = self
            .price_source
            .unwrap_or_else(|| Arc::new(FixedBasePrice::default()));

        Ok(ValuationPipeline::new(provider, price_source, self.config))
    }
}

impl Default for ValuationPipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Integer(i64),
    Float(f64),
}

impl From<StringOrNumber> for String {
    fn from(value: StringOrNumber) -> Self {
        match value {
            StringOrNumber::String(s) => s,
            StringOrNumber::Integer(n) => n.to_string(),
            StringOrNumber::Float(n) => n.to_string(),
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    StringOrNumber::deserialize(deserializer).map(String::from)
}

fn optional_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<StringOrNumber>::deserialize(deserializer).map(|v| v.map(String::from))
}
