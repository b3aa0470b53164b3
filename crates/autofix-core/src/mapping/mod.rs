//! Condition-to-adjustment mapping.
//!
//! Two static rule tables turn classifier labels and odometer readings into
//! score and value deltas. The numeric constants are business decisions and
//! are kept exactly as published.

mod condition;
mod mileage;

pub use condition::{map_condition, ConditionAdjustment, ConditionLabel, CONDITION_TABLE};
pub use mileage::{map_mileage, MileageBracket, MILEAGE_BRACKETS, NO_PENALTY_MAX_KM};

use crate::types::Money;

/// Round to the nearest whole currency unit, halves toward positive infinity.
pub(crate) fn round_currency(amount: f64) -> Money {
    (amount + 0.5).floor() as Money
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_currency_halves_go_up() {
        assert_eq!(round_currency(2.5), 3);
        assert_eq!(round_currency(-2.5), -2);
        assert_eq!(round_currency(-2.6), -3);
        assert_eq!(round_currency(15_000.000_000_000_002), 15_000);
        assert_eq!(round_currency(-35_000.000_000_000_01), -35_000);
    }
}
