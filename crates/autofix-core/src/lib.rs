//! # autofix-core
//!
//! Deterministic vehicle valuation adjustment engine.
//!
//! This crate turns heterogeneous, possibly malformed AI outputs into a
//! bounded, explainable price adjustment:
//! - What is the car worth before adjustments?
//! - What does each observed factor take off?
//! - What range do we show the customer?
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: Same input always produces same output
//! 2. **No model calls**: Classifier text comes in; nothing goes out
//! 3. **Explainable**: Every deduction is a labelled [`Adjustment`]
//! 4. **Always completes**: Bad numbers and bad classifier text degrade,
//!    they never abort a valuation
//!
//! ## Example
//!
//! ```rust
//! use autofix_core::{value_vehicle, RepairCost, ValuationInputs};
//!
//! let inputs = ValuationInputs {
//!     base_price: 500_000,
//!     repairs: vec![RepairCost::new("bumper", 12_000)],
//!     mileage_km: 45_000,
//!     interior: None,
//! };
//!
//! let valuation = value_vehicle(&inputs);
//! assert_eq!(valuation.preliminary_value, 500_000 - 12_000 - 25_000);
//! ```

pub mod adjustment;
pub mod extract;
pub mod input;
pub mod interior;
pub mod mapping;
pub mod summary;
pub mod types;
pub mod valuation;

// Re-export main types at crate root
pub use adjustment::{Adjustment, Category};
pub use extract::{parse_json_object, ClassifierOutput, ParseError};
pub use input::{parse_km_or_zero, parse_price_or_default, InputError, DEFAULT_BASE_PRICE};
pub use interior::{assess_interior, assess_interior_or_fallback, InteriorAssessment};
pub use mapping::{map_condition, map_mileage, ConditionAdjustment, ConditionLabel, MileageBracket};
pub use summary::{ConditionSummary, Coverage};
pub use types::{Angle, Money, RepairCost, Valuation, ValueRange};
pub use valuation::{aggregate, Aggregator, VALUE_RANGE_HALF_WIDTH};

/// Everything the engine needs for one valuation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValuationInputs {
    /// Base price for the model/year
    pub base_price: Money,

    /// Exterior repair estimate lines
    pub repairs: Vec<RepairCost>,

    /// Odometer reading, already parsed
    pub mileage_km: i64,

    /// Interior leg result; `None` when no interior photo was analyzed
    pub interior: Option<InteriorAssessment>,
}

/// Build the ordered adjustment list: repairs, then mileage, then interior.
pub fn build_adjustments(inputs: &ValuationInputs) -> Vec<Adjustment> {
    let mut adjustments: Vec<Adjustment> = inputs.repairs.iter().map(Adjustment::repair).collect();

    if let Some(mileage) = map_mileage(inputs.mileage_km, inputs.base_price) {
        adjustments.push(mileage);
    }

    if let Some(interior) = &inputs.interior {
        adjustments.push(interior.to_adjustment());
    }

    adjustments
}

/// Value a vehicle.
///
/// This is the main entry point for the engine.
pub fn value_vehicle(inputs: &ValuationInputs) -> Valuation {
    aggregate(inputs.base_price, build_adjustments(inputs))
}
