//! Pricing configuration.
//!
//! Every business number the engine uses (delivery postcodes, fee tiers, the
//! next-day cutoff) lives here rather than in the pricing code. Defaults match the
//! shop's reference deployment. A JSON file may override any subset:
//!
//! ```json
//! {
//!   "delivery": {
//!     "eligible_postcodes": ["3020", "3022"],
//!     "tiers": [
//!       { "min_subtotal": "50", "fee": "0" },
//!       { "min_subtotal": "30", "fee": "5" },
//!       { "min_subtotal": "0", "fee": "10" }
//!     ]
//!   },
//!   "cutoff": { "eligible_days": ["Sun", "Mon", "Tue", "Wed", "Thu"], "cutoff_hour": 20 }
//! }
//! ```

use crate::domain::money::Money;
use crate::error::{PricingError, Result};
use chrono::Weekday;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    pub delivery: DeliveryConfig,
    pub cutoff: CutoffConfig,
}

/// A delivery fee band: orders whose subtotal is at least `min_subtotal` pay `fee`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeliveryTier {
    pub min_subtotal: Money,
    pub fee: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliveryConfig {
    pub eligible_postcodes: BTreeSet<String>,
    pub tiers: Vec<DeliveryTier>,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            eligible_postcodes: ["3020", "3022"].into_iter().map(String::from).collect(),
            tiers: vec![
                DeliveryTier {
                    min_subtotal: Money::new(dec!(50)),
                    fee: Money::ZERO,
                },
                DeliveryTier {
                    min_subtotal: Money::new(dec!(30)),
                    fee: Money::new(dec!(5)),
                },
                DeliveryTier {
                    min_subtotal: Money::ZERO,
                    fee: Money::new(dec!(10)),
                },
            ],
        }
    }
}

impl DeliveryConfig {
    pub fn is_eligible(&self, postcode: &str) -> bool {
        self.eligible_postcodes.contains(postcode.trim())
    }

    /// Fee for a subtotal: the tier with the highest threshold not above it.
    pub fn tier_fee(&self, subtotal: Money) -> Money {
        self.tiers
            .iter()
            .filter(|t| t.min_subtotal <= subtotal)
            .max_by_key(|t| t.min_subtotal)
            .map(|t| t.fee)
            .unwrap_or(Money::ZERO)
    }

    /// Lowest subtotal that earns a zero tier fee, if any tier is free.
    pub fn free_threshold(&self) -> Option<Money> {
        self.tiers
            .iter()
            .filter(|t| t.fee.is_zero())
            .map(|t| t.min_subtotal)
            .min()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CutoffConfig {
    pub eligible_days: Vec<Weekday>,
    /// Local hour (0-23) at which next-day fulfilment closes.
    pub cutoff_hour: u32,
}

impl Default for CutoffConfig {
    fn default() -> Self {
        Self {
            eligible_days: vec![
                Weekday::Sun,
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
            ],
            cutoff_hour: 20,
        }
    }
}

impl PricingConfig {
    /// Reads a JSON config file and validates it.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        debug!(path = %path.display(), "loaded pricing config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.cutoff.cutoff_hour > 23 {
            return Err(PricingError::ConfigurationError(format!(
                "cutoff_hour must be between 0 and 23, got {}",
                self.cutoff.cutoff_hour
            )));
        }
        if self.delivery.tiers.iter().any(|t| {
            t.min_subtotal.value().is_sign_negative() || t.fee.value().is_sign_negative()
        }) {
            return Err(PricingError::ConfigurationError(
                "delivery tiers must not contain negative values".to_string(),
            ));
        }
        if !self
            .delivery
            .tiers
            .iter()
            .any(|t| t.min_subtotal.is_zero())
        {
            return Err(PricingError::ConfigurationError(
                "delivery tiers need a fallback tier with min_subtotal 0".to_string(),
            ));
        }
        Ok(())
    }
}
