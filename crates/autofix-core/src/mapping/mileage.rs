//! Odometer mileage brackets.

use serde::Serialize;

use super::round_currency;
use crate::adjustment::Adjustment;
use crate::types::Money;

/// At or below this reading no mileage adjustment is emitted.
pub const NO_PENALTY_MAX_KM: i64 = 20_000;

/// A half-open kilometer range `(lower_km, upper_km]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MileageBracket {
    /// Exclusive lower bound
    pub lower_km: i64,

    /// Inclusive upper bound; `None` for the open-ended top bracket
    pub upper_km: Option<i64>,

    pub score_delta: i32,

    /// Signed fraction of the base price (e.g., -0.05)
    pub value_percent: f64,
}

impl MileageBracket {
    pub fn contains(&self, km: i64) -> bool {
        km > self.lower_km && self.upper_km.map_or(true, |upper| km <= upper)
    }

    /// Value delta against `base_price`. Never positive.
    pub fn value_delta(&self, base_price: Money) -> Money {
        -round_currency(base_price as f64 * self.value_percent.abs())
    }
}

/// Mileage rules, ordered and disjoint.
pub const MILEAGE_BRACKETS: [MileageBracket; 3] = [
    MileageBracket {
        lower_km: NO_PENALTY_MAX_KM,
        upper_km: Some(40_000),
        score_delta: -3,
        value_percent: -0.02,
    },
    MileageBracket {
        lower_km: 40_000,
        upper_km: Some(80_000),
        score_delta: -7,
        value_percent: -0.05,
    },
    MileageBracket {
        lower_km: 80_000,
        upper_km: None,
        score_delta: -12,
        value_percent: -0.10,
    },
];

/// Map an odometer reading to a mileage adjustment.
///
/// Returns `None` for readings at or below [`NO_PENALTY_MAX_KM`]: low
/// mileage is the absence of an adjustment, not a zero-valued one.
pub fn map_mileage(km: i64, base_price: Money) -> Option<Adjustment> {
    let bracket = MILEAGE_BRACKETS.iter().find(|b| b.contains(km))?;

    Some(Adjustment::mileage(
        km,
        bracket.score_delta,
        bracket.value_delta(base_price),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adjustment::Category;
    use proptest::prelude::*;

    #[test]
    fn test_low_mileage_is_absent() {
        assert!(map_mileage(0, 500_000).is_none());
        assert!(map_mileage(15_000, 500_000).is_none());
        assert!(map_mileage(20_000, 500_000).is_none());
    }

    #[test]
    fn test_negative_mileage_is_absent() {
        assert!(map_mileage(-5, 500_000).is_none());
    }

    #[test]
    fn test_first_bracket() {
        let adj = map_mileage(20_001, 500_000).unwrap();
        assert_eq!(adj.score_delta, -3);
        assert_eq!(adj.value_delta, -10_000);
        assert_eq!(adj.category, Category::Mileage);
    }

    #[test]
    fn test_upper_bound_is_inclusive() {
        let at_boundary = map_mileage(40_000, 500_000).unwrap();
        assert_eq!(at_boundary.score_delta, -3);

        let past_boundary = map_mileage(40_001, 500_000).unwrap();
        assert_eq!(past_boundary.score_delta, -7);
        assert_eq!(past_boundary.value_delta, -25_000);

        assert_eq!(map_mileage(80_000, 500_000).unwrap().score_delta, -7);
        assert_eq!(map_mileage(80_001, 500_000).unwrap().score_delta, -12);
    }

    #[test]
    fn test_top_bracket_is_open_ended() {
        let adj = map_mileage(250_000, 500_000).unwrap();
        assert_eq!(adj.score_delta, -12);
        assert_eq!(adj.value_delta, -50_000);
        assert_eq!(adj.label, "Mileage Adjustment (250,000 km)");
    }

    #[test]
    fn test_brackets_are_ordered_and_contiguous() {
        for pair in MILEAGE_BRACKETS.windows(2) {
            assert_eq!(pair[0].upper_km, Some(pair[1].lower_km));
        }
        assert_eq!(MILEAGE_BRACKETS[0].lower_km, NO_PENALTY_MAX_KM);
    }

    proptest! {
        #[test]
        fn prop_mileage_never_adds_value(km in 0i64..1_000_000, base in 0i64..100_000_000) {
            if let Some(adj) = map_mileage(km, base) {
                prop_assert!(adj.value_delta <= 0);
                prop_assert!(adj.score_delta < 0);
            } else {
                prop_assert!(km <= NO_PENALTY_MAX_KM);
            }
        }
    }
}
