use crate::config::DeliveryConfig;
use crate::domain::money::Money;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FulfilmentMethod {
    #[default]
    Pickup,
    Delivery,
}

impl FulfilmentMethod {
    pub fn toggled(self) -> Self {
        match self {
            Self::Pickup => Self::Delivery,
            Self::Delivery => Self::Pickup,
        }
    }
}

impl fmt::Display for FulfilmentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pickup => f.write_str("pickup"),
            Self::Delivery => f.write_str("delivery"),
        }
    }
}

impl FromStr for FulfilmentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pickup" => Ok(Self::Pickup),
            "delivery" => Ok(Self::Delivery),
            other => Err(format!("unknown fulfilment method '{other}'")),
        }
    }
}

/// The customer's fulfilment choice at the moment a summary is computed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeliveryContext {
    pub method: FulfilmentMethod,
    pub postcode: Option<String>,
    pub has_free_delivery_credit: bool,
}

impl DeliveryContext {
    pub fn pickup() -> Self {
        Self::default()
    }

    pub fn delivery(postcode: impl Into<String>) -> Self {
        Self {
            method: FulfilmentMethod::Delivery,
            postcode: Some(postcode.into()),
            has_free_delivery_credit: false,
        }
    }

    pub fn with_free_delivery_credit(mut self, available: bool) -> Self {
        self.has_free_delivery_credit = available;
        self
    }

    /// Changes the fulfilment mode. The postcode is kept so that switching back to
    /// delivery does not lose it.
    pub fn switch_to(&mut self, method: FulfilmentMethod) {
        self.method = method;
    }
}

/// Delivery fee outcome. `Unavailable` is distinct from a zero fee: the caller
/// must block delivery checkout rather than show `$0.00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryFee {
    Charged(Money),
    Unavailable,
}

impl DeliveryFee {
    pub fn amount(&self) -> Option<Money> {
        match self {
            Self::Charged(fee) => Some(*fee),
            Self::Unavailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Charged(_))
    }
}

impl fmt::Display for DeliveryFee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Charged(fee) => write!(f, "{fee}"),
            Self::Unavailable => f.write_str("unavailable"),
        }
    }
}

/// Result of fee evaluation, including whether a reward credit zeroed the fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeQuote {
    pub fee: DeliveryFee,
    pub free_delivery_applied: bool,
}

/// Computes the delivery fee for a subtotal.
///
/// Pickup is always free with no postcode check. Delivery to a postcode outside the
/// allow-list is unavailable; otherwise a free-delivery credit wins over the tiers.
pub fn quote_delivery_fee(
    config: &DeliveryConfig,
    subtotal: Money,
    ctx: &DeliveryContext,
) -> FeeQuote {
    if ctx.method == FulfilmentMethod::Pickup {
        return FeeQuote {
            fee: DeliveryFee::Charged(Money::ZERO),
            free_delivery_applied: false,
        };
    }

    let eligible = ctx
        .postcode
        .as_deref()
        .is_some_and(|pc| config.is_eligible(pc));
    if !eligible {
        return FeeQuote {
            fee: DeliveryFee::Unavailable,
            free_delivery_applied: false,
        };
    }

    if ctx.has_free_delivery_credit {
        return FeeQuote {
            fee: DeliveryFee::Charged(Money::ZERO),
            free_delivery_applied: true,
        };
    }

    FeeQuote {
        fee: DeliveryFee::Charged(config.tier_fee(subtotal)),
        free_delivery_applied: false,
    }
}
