//! Shared value types for the valuation engine.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::adjustment::Adjustment;

/// Whole currency units. Negative amounts are deductions.
pub type Money = i64;

/// Capture slot for an uploaded photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Angle {
    Front,
    Rear,
    Left,
    Right,
    Interior,
}

impl Angle {
    /// Every capture slot, in display order.
    pub const ALL: [Angle; 5] = [
        Angle::Front,
        Angle::Rear,
        Angle::Left,
        Angle::Right,
        Angle::Interior,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Angle::Front => "front",
            Angle::Rear => "rear",
            Angle::Left => "left",
            Angle::Right => "right",
            Angle::Interior => "interior",
        }
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of an external repair estimate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairCost {
    /// Damaged part (e.g., "bumper")
    pub part: String,

    /// Estimated repair cost, in whole currency units
    pub cost: Money,
}

impl RepairCost {
    pub fn new(part: impl Into<String>, cost: Money) -> Self {
        Self {
            part: part.into(),
            cost,
        }
    }
}

/// Fixed-width band shown to the user around the preliminary value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: Money,
    pub max: Money,
}

/// The engine's output.
///
/// `preliminary_value` always equals `base_price` plus the sum of every
/// adjustment's `value_delta`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Valuation {
    /// Pre-adjustment value for the model/year
    pub base_price: Money,

    /// Adjustments in the order they were supplied
    pub adjustments: Vec<Adjustment>,

    /// Base price plus every adjustment
    pub preliminary_value: Money,

    /// Band around the preliminary value
    pub value_range: ValueRange,
}

impl Valuation {
    /// Sum of every adjustment's value delta.
    pub fn total_delta(&self) -> Money {
        self.adjustments
            .iter()
            .fold(0, |acc: Money, a| acc.saturating_add(a.value_delta))
    }

    /// Sum of every adjustment's score delta.
    pub fn total_score_delta(&self) -> i32 {
        self.adjustments.iter().map(|a| a.score_delta).sum()
    }
}
