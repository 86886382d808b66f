use log::warn;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::services::stay_service;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Fraction of the subtotal charged as tax (0.10 is 10%)
    pub tax_rate: Decimal,
    /// Flat fee added to every booking
    pub service_fee: Decimal,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            tax_rate: Decimal::new(10, 2),
            service_fee: Decimal::from(25),
        }
    }
}

impl PricingConfig {
    /// Read `BOOKING_TAX_RATE` and `BOOKING_SERVICE_FEE`, keeping the default
    /// for anything absent or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            tax_rate: decimal_from_env("BOOKING_TAX_RATE").unwrap_or(defaults.tax_rate),
            service_fee: decimal_from_env("BOOKING_SERVICE_FEE").unwrap_or(defaults.service_fee),
        }
    }
}

fn decimal_from_env(key: &str) -> Option<Decimal> {
    let raw = std::env::var(key).ok()?;
    match Decimal::from_str(raw.trim()) {
        Ok(value) if value >= Decimal::ZERO => Some(value),
        _ => {
            warn!("Ignoring invalid {}={:?}, using default", key, raw);
            None
        }
    }
}

/// Derived price of a stay. Values are exact; round only for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub nights: u32,
    pub nightly_rate: Decimal,
    pub subtotal: Decimal,
    pub service_fee: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayedPrice {
    pub nights: String,
    pub nightly_rate: String,
    pub subtotal: String,
    pub service_fee: String,
    pub tax: String,
    pub total: String,
}

impl PriceBreakdown {
    /// A stay without nights has no price to show yet.
    pub fn is_displayable(&self) -> bool {
        self.nights > 0
    }

    pub fn display(&self) -> DisplayedPrice {
        DisplayedPrice {
            nights: stay_service::nights_label(self.nights),
            nightly_rate: money(self.nightly_rate),
            subtotal: money(self.subtotal),
            service_fee: money(self.service_fee),
            tax: money(self.tax),
            total: money(self.total),
        }
    }
}

/// Two decimal places, halves rounded away from zero.
pub fn money(value: Decimal) -> String {
    format!(
        "{:.2}",
        value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PricingService {
    pub config: PricingConfig,
}

impl PricingService {
    pub fn new(config: PricingConfig) -> Self {
        Self { config }
    }

    /// Compose the price of `nights` at `nightly_rate`.
    ///
    /// The service fee is charged even for zero nights; callers hide the
    /// breakdown in that case through `is_displayable`.
    pub fn compose(&self, nightly_rate: Decimal, nights: u32) -> PriceBreakdown {
        let nightly_rate = nightly_rate.max(Decimal::ZERO);
        let subtotal = nightly_rate * Decimal::from(nights);
        let tax = subtotal * self.config.tax_rate;
        let service_fee = self.config.service_fee;

        PriceBreakdown {
            nights,
            nightly_rate,
            subtotal,
            service_fee,
            tax,
            total: subtotal + tax + service_fee,
        }
    }

    /// Nights from the typed dates, then the composed price.
    pub fn quote(
        &self,
        nightly_rate: Decimal,
        check_in: Option<&str>,
        check_out: Option<&str>,
    ) -> PriceBreakdown {
        self.compose(nightly_rate, stay_service::nights_between(check_in, check_out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_three_nights_at_one_hundred() {
        let pricing = PricingService::default();
        let price = pricing.compose(Decimal::from(100), 3);

        assert_eq!(price.subtotal, Decimal::from(300));
        assert_eq!(price.tax, Decimal::from(30));
        assert_eq!(price.service_fee, Decimal::from(25));
        assert_eq!(price.total, Decimal::from(355));
        assert!(price.is_displayable());
    }

    #[test]
    fn test_zero_nights_still_charges_service_fee() {
        let pricing = PricingService::default();
        let price = pricing.compose(Decimal::from(100), 0);

        assert_eq!(price.subtotal, Decimal::ZERO);
        assert_eq!(price.tax, Decimal::ZERO);
        assert_eq!(price.total, Decimal::from(25));
        assert!(!price.is_displayable());
    }

    #[test]
    fn test_total_is_sum_of_parts() {
        let pricing = PricingService::new(PricingConfig {
            tax_rate: Decimal::new(825, 4),
            service_fee: Decimal::new(1999, 2),
        });

        for nights in [1, 2, 7, 30] {
            let price = pricing.compose(Decimal::new(13333, 2), nights);
            assert_eq!(price.total, price.subtotal + price.tax + price.service_fee);
            assert_eq!(price.subtotal, Decimal::new(13333, 2) * Decimal::from(nights));
        }
    }

    #[test]
    fn test_rounding_only_for_display() {
        let pricing = PricingService::default();
        let price = pricing.compose(Decimal::new(3333, 2), 1);

        // 33.33 * 0.10 keeps its precision internally
        assert_eq!(price.tax, Decimal::new(33330, 4));
        let shown = price.display();
        assert_eq!(shown.tax, "3.33");
        assert_eq!(shown.total, "61.66");
        assert_eq!(shown.nights, "1 night");
    }

    #[test]
    fn test_quote_from_dates() {
        let pricing = PricingService::default();
        let price = pricing.quote(Decimal::from(100), Some("2025-06-01"), Some("2025-06-04"));
        assert_eq!(price.nights, 3);
        assert_eq!(price.total, Decimal::from(355));

        let price = pricing.quote(Decimal::from(100), Some("2025-06-04"), Some("2025-06-01"));
        assert_eq!(price.nights, 0);
        assert_eq!(price.total, Decimal::from(25));
    }

    #[test]
    #[serial]
    fn test_config_from_env() {
        std::env::set_var("BOOKING_TAX_RATE", "0.2");
        std::env::set_var("BOOKING_SERVICE_FEE", "not-a-number");

        let config = PricingConfig::from_env();
        assert_eq!(config.tax_rate, Decimal::new(2, 1));
        assert_eq!(config.service_fee, Decimal::from(25));

        std::env::remove_var("BOOKING_TAX_RATE");
        std::env::remove_var("BOOKING_SERVICE_FEE");
        assert_eq!(PricingConfig::from_env(), PricingConfig::default());
    }
}
