//! Base-price lookup for a model and year.

use async_trait::async_trait;
use std::collections::HashMap;

use autofix_core::{Money, DEFAULT_BASE_PRICE};

use crate::providers::ProviderError;

/// Source of the pre-adjustment price for a vehicle.
#[async_trait]
pub trait BasePriceSource: Send + Sync {
    async fn base_price(&self, model: &str, year: &str) -> Result<Money, ProviderError>;

    fn name(&self) -> &str;
}

/// Same price for every vehicle.
#[derive(Debug, Clone, Copy)]
pub struct FixedBasePrice(pub Money);

impl Default for FixedBasePrice {
    fn default() -> Self {
        Self(DEFAULT_BASE_PRICE)
    }
}

#[async_trait]
impl BasePriceSource for FixedBasePrice {
    async fn base_price(&self, _model: &str, _year: &str) -> Result<Money, ProviderError> {
        Ok(self.0)
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

/// In-memory price list keyed by normalized model and year.
///
/// Unknown vehicles are an error so the caller can record the miss.
#[derive(Debug, Clone, Default)]
pub struct PriceTable {
    prices: HashMap<(String, String), Money>,
}

impl PriceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_price(mut self, model: &str, year: &str, price: Money) -> Self {
        self.prices.insert(Self::key(model, year), price);
        self
    }

    fn key(model: &str, year: &str) -> (String, String) {
        (model.trim().to_lowercase(), year.trim().to_string())
    }
}

#[async_trait]
impl BasePriceSource for PriceTable {
    async fn base_price(&self, model: &str, year: &str) -> Result<Money, ProviderError> {
        self.prices
            .get(&Self::key(model, year))
            .copied()
            .ok_or_else(|| {
                ProviderError::NotConfigured(format!("no base price for {} {}", model.trim(), year.trim()))
            })
    }

    fn name(&self) -> &str {
        "table"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixed_price() {
        assert_eq!(
            FixedBasePrice::default().base_price("Civic", "2019").await.unwrap(),
            500_000
        );
        assert_eq!(FixedBasePrice(320_000).base_price("", "").await.unwrap(), 320_000);
    }

    #[tokio::test]
    async fn test_price_table_normalizes_keys() {
        let table = PriceTable::new().with_price("Honda Civic", "2019", 650_000);

        assert_eq!(table.base_price(" honda civic ", "2019").await.unwrap(), 650_000);
        assert!(matches!(
            table.base_price("Honda Civic", "2020").await,
            Err(ProviderError::NotConfigured(_))
        ));
    }
}
