//! Interior wear condition table.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::round_currency;
use crate::types::Money;

/// Interior wear level reported by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionLabel {
    Good,
    Moderate,
    Poor,
}

impl ConditionLabel {
    /// Resolve a free-form label. Case and surrounding whitespace are
    /// ignored; anything outside the vocabulary resolves to `Moderate`.
    pub fn resolve(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "good" => Self::Good,
            "moderate" => Self::Moderate,
            "poor" => Self::Poor,
            other => {
                tracing::debug!(label = other, "Unrecognized interior condition, using moderate");
                Self::Moderate
            }
        }
    }

    /// Resolve an optional label; a missing label is `Moderate`.
    pub fn resolve_or_default(label: Option<&str>) -> Self {
        label.map(Self::resolve).unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Moderate => "moderate",
            Self::Poor => "poor",
        }
    }

    /// Table row for this label.
    pub fn adjustment(&self) -> ConditionAdjustment {
        CONDITION_TABLE
            .iter()
            .find(|(label, _)| label == self)
            .map(|(_, adjustment)| *adjustment)
            .unwrap_or(MODERATE)
    }
}

impl Default for ConditionLabel {
    fn default() -> Self {
        Self::Moderate
    }
}

impl fmt::Display for ConditionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score and value effect of one interior condition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionAdjustment {
    pub score_delta: i32,

    /// Signed fraction of the base price (e.g., -0.03)
    pub value_percent: f64,
}

impl ConditionAdjustment {
    /// Value delta against `base_price`, rounded to whole units.
    pub fn value_delta(&self, base_price: Money) -> Money {
        round_currency(base_price as f64 * self.value_percent)
    }
}

const MODERATE: ConditionAdjustment = ConditionAdjustment {
    score_delta: -5,
    value_percent: -0.03,
};

/// Interior condition rules.
pub const CONDITION_TABLE: [(ConditionLabel, ConditionAdjustment); 3] = [
    (
        ConditionLabel::Good,
        ConditionAdjustment {
            score_delta: 0,
            value_percent: 0.0,
        },
    ),
    (ConditionLabel::Moderate, MODERATE),
    (
        ConditionLabel::Poor,
        ConditionAdjustment {
            score_delta: -12,
            value_percent: -0.07,
        },
    ),
];

/// Map a classifier label to its table row. Total over all strings.
pub fn map_condition(label: &str) -> ConditionAdjustment {
    ConditionLabel::resolve(label).adjustment()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_table_values() {
        assert_eq!(
            map_condition("good"),
            ConditionAdjustment {
                score_delta: 0,
                value_percent: 0.0
            }
        );
        assert_eq!(
            map_condition("moderate"),
            ConditionAdjustment {
                score_delta: -5,
                value_percent: -0.03
            }
        );
        assert_eq!(
            map_condition("poor"),
            ConditionAdjustment {
                score_delta: -12,
                value_percent: -0.07
            }
        );
    }

    #[test]
    fn test_case_is_normalized() {
        assert_eq!(ConditionLabel::resolve("POOR"), ConditionLabel::Poor);
        assert_eq!(ConditionLabel::resolve("  Good "), ConditionLabel::Good);
    }

    #[test]
    fn test_unknown_labels_fall_back_to_moderate() {
        for label in ["", "excellent", "bad", "n/a", "goodish"] {
            assert_eq!(map_condition(label), MODERATE, "label {:?}", label);
        }
        assert_eq!(ConditionLabel::resolve_or_default(None), ConditionLabel::Moderate);
    }

    #[test]
    fn test_value_delta_against_base_price() {
        assert_eq!(ConditionLabel::Good.adjustment().value_delta(500_000), 0);
        assert_eq!(ConditionLabel::Moderate.adjustment().value_delta(500_000), -15_000);
        assert_eq!(ConditionLabel::Poor.adjustment().value_delta(500_000), -35_000);
    }

    #[test]
    fn test_value_delta_rounds_to_whole_units() {
        // 333_333 * -0.03 = -9999.99
        assert_eq!(ConditionLabel::Moderate.adjustment().value_delta(333_333), -10_000);
        // 123_456 * -0.07 = -8641.92
        assert_eq!(ConditionLabel::Poor.adjustment().value_delta(123_456), -8_642);
    }

    proptest! {
        #[test]
        fn prop_map_condition_is_total(label in ".*") {
            let row = map_condition(&label);
            prop_assert!(CONDITION_TABLE.iter().any(|(_, r)| *r == row));
        }

        #[test]
        fn prop_interior_never_adds_value(base in 0i64..100_000_000) {
            for (label, _) in CONDITION_TABLE {
                prop_assert!(label.adjustment().value_delta(base) <= 0);
            }
        }
    }
}
