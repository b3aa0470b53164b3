//! Adjustments: signed currency deltas attributed to one evaluated factor.
//!
//! Labels are read by the display layer and must keep their format:
//! `Repair: <part>`, `Mileage Adjustment (<km> km)`, `Interior: <condition>`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::mapping::ConditionLabel;
use crate::types::{Money, RepairCost};

/// Score penalty applied per repaired exterior part.
pub const REPAIR_SCORE_DELTA: i32 = -10;

/// Which factor an adjustment is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Exterior,
    Mileage,
    Interior,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Exterior => write!(f, "exterior"),
            Category::Mileage => write!(f, "mileage"),
            Category::Interior => write!(f, "interior"),
        }
    }
}

/// A single line of the valuation breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Adjustment {
    /// Human-readable label shown in the breakdown table
    pub label: String,

    /// Factor this adjustment belongs to
    pub category: Category,

    /// Change to the condition score
    pub score_delta: i32,

    /// Change to the value, in absolute currency units
    pub value_delta: Money,
}

impl Adjustment {
    /// Exterior repair deduction: the full estimated cost comes off the value.
    pub fn repair(repair: &RepairCost) -> Self {
        Self {
            label: format!("Repair: {}", repair.part),
            category: Category::Exterior,
            score_delta: REPAIR_SCORE_DELTA,
            value_delta: repair.cost.saturating_neg(),
        }
    }

    pub fn mileage(km: i64, score_delta: i32, value_delta: Money) -> Self {
        Self {
            label: format!("Mileage Adjustment ({} km)", group_thousands(km)),
            category: Category::Mileage,
            score_delta,
            value_delta,
        }
    }

    pub fn interior(condition: ConditionLabel, score_delta: i32, value_delta: Money) -> Self {
        Self {
            label: format!("Interior: {}", condition),
            category: Category::Interior,
            score_delta,
            value_delta,
        }
    }
}

/// Render an integer with comma thousands separators (`45000` -> `45,000`).
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    if value < 0 {
        grouped.push('-');
    }

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repair_label_and_delta() {
        let adj = Adjustment::repair(&RepairCost::new("bumper", 12_500));
        assert_eq!(adj.label, "Repair: bumper");
        assert_eq!(adj.category, Category::Exterior);
        assert_eq!(adj.score_delta, -10);
        assert_eq!(adj.value_delta, -12_500);
    }

    #[test]
    fn test_mileage_label_groups_digits() {
        let adj = Adjustment::mileage(45_000, -7, -25_000);
        assert_eq!(adj.label, "Mileage Adjustment (45,000 km)");
        assert_eq!(adj.category, Category::Mileage);
    }

    #[test]
    fn test_interior_label() {
        let adj = Adjustment::interior(ConditionLabel::Poor, -12, -35_000);
        assert_eq!(adj.label, "Interior: poor");
        assert_eq!(adj.category, Category::Interior);
    }

    #[test]
    fn test_repair_cost_negation_saturates() {
        let adj = Adjustment::repair(&RepairCost::new("hood", Money::MIN));
        assert_eq!(adj.value_delta, Money::MAX);
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_000), "1,000");
        assert_eq!(group_thousands(123_456_789), "123,456,789");
        assert_eq!(group_thousands(-20_001), "-20,001");
    }

    #[test]
    fn test_adjustment_json_shape() {
        let adj = Adjustment::repair(&RepairCost::new("door", 8_000));
        let json = serde_json::to_value(&adj).unwrap();
        assert_eq!(json["label"], "Repair: door");
        assert_eq!(json["category"], "exterior");
        assert_eq!(json["scoreDelta"], -10);
        assert_eq!(json["valueDelta"], -8_000);
    }
}
