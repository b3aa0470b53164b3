//! Aggregator: folds a base price and adjustments into a valuation.
//!
//! The aggregator applies fixed rules:
//! 1. `preliminary_value = base_price + sum(value_delta)`
//! 2. `value_range = preliminary_value ± VALUE_RANGE_HALF_WIDTH`
//! 3. No floor at zero; large deductions can produce a negative value
//!
//! It reads no clock and no randomness, so identical inputs give identical
//! output.

use crate::adjustment::Adjustment;
use crate::types::{Money, Valuation, ValueRange};

/// Half-width of the band presented around the preliminary value.
pub const VALUE_RANGE_HALF_WIDTH: Money = 10_000;

/// Folds adjustments into a [`Valuation`].
#[derive(Debug, Clone, Copy)]
pub struct Aggregator {
    half_width: Money,
}

impl Aggregator {
    pub fn new() -> Self {
        Self {
            half_width: VALUE_RANGE_HALF_WIDTH,
        }
    }

    /// Aggregate adjustments against a base price.
    ///
    /// Adjustments are kept in the order given; the total does not depend
    /// on that order.
    pub fn aggregate(&self, base_price: Money, adjustments: Vec<Adjustment>) -> Valuation {
        let total_delta = adjustments
            .iter()
            .fold(0, |acc: Money, a| acc.saturating_add(a.value_delta));
        let preliminary_value = base_price.saturating_add(total_delta);

        tracing::trace!(
            base_price,
            total_delta,
            adjustments = adjustments.len(),
            "Aggregated valuation"
        );

        Valuation {
            base_price,
            adjustments,
            preliminary_value,
            value_range: ValueRange {
                min: preliminary_value.saturating_sub(self.half_width),
                max: preliminary_value.saturating_add(self.half_width),
            },
        }
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new()
    }
}

/// Aggregate with the standard band width.
pub fn aggregate(base_price: Money, adjustments: Vec<Adjustment>) -> Valuation {
    Aggregator::new().aggregate(base_price, adjustments)
}
