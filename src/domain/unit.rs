use crate::domain::money::Money;
use crate::error::{PricingError, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::Serialize;

/// Step size selected by a product's `increment` when it is sold by the kilogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KgIncrement {
    HundredGram,
    HalfKilogram,
    Whole,
}

/// Units that are sold as whole items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CountUnit {
    Each,
    Bunch,
    Punnet,
    Ml300,
    Ml500,
}

/// How a product is measured and priced.
///
/// Resolved once from the catalog's `unit` / `increment` strings. The price of a
/// product is always denominated per kilogram for the weight kinds and per item
/// for [`UnitKind::Count`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    /// Quantity is a kilogram decimal (e.g. `0.3` for 300 g).
    Kilogram(KgIncrement),
    /// Quantity is a count of 100 g steps.
    HundredGram,
    /// Quantity is a count of 500 g steps.
    HalfKilogram,
    Count(CountUnit),
}

/// Step size and bounds for a product's quantity selector.
///
/// `step`, `min` and `max` are expressed in the product's external quantity
/// (kilograms for `kg`, step counts for `hundredg`/`halfkg`, items otherwise).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepRule {
    pub step: Decimal,
    pub min: Decimal,
    pub max: Decimal,
    min_steps: u32,
    max_steps: u32,
}

impl StepRule {
    fn new(step: Decimal, min_steps: u32, max_steps: u32) -> Self {
        Self {
            step,
            min: step * Decimal::from(min_steps),
            max: step * Decimal::from(max_steps),
            min_steps,
            max_steps,
        }
    }

    pub fn min_steps(&self) -> u32 {
        self.min_steps
    }

    pub fn max_steps(&self) -> u32 {
        self.max_steps
    }

    /// Converts an external quantity to a whole number of steps.
    ///
    /// Rounds to the nearest step and clamps to `[min, max]`. Negative quantities
    /// are rejected.
    pub fn snap(&self, quantity: Decimal) -> Result<u32> {
        if quantity.is_sign_negative() && !quantity.is_zero() {
            return Err(PricingError::DomainError(format!(
                "Quantity must not be negative, got {quantity}"
            )));
        }
        let steps = quantity
            .checked_div(self.step)
            .map(|s| s.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
            .and_then(|s| s.to_u32())
            .unwrap_or(self.max_steps)
            .clamp(self.min_steps, self.max_steps);
        Ok(steps)
    }

    /// Applies a ▲/▼ adjustment of `delta` steps and clamps the result.
    pub fn adjust(&self, steps: u32, delta: i32) -> u32 {
        let moved = i64::from(steps) + i64::from(delta);
        let clamped = moved.clamp(i64::from(self.min_steps), i64::from(self.max_steps));
        u32::try_from(clamped).unwrap_or(self.min_steps)
    }

    pub fn clamp_steps(&self, steps: u32) -> u32 {
        steps.clamp(self.min_steps, self.max_steps)
    }

    /// External quantity for a number of steps.
    pub fn quantity(&self, steps: u32) -> Decimal {
        self.step * Decimal::from(steps)
    }
}

impl UnitKind {
    /// Resolves the raw catalog strings.
    ///
    /// `increment` is only meaningful for `kg` but must still be one of the known
    /// values when present.
    pub fn resolve(unit: &str, increment: Option<&str>) -> Result<Self> {
        let increment = match increment.map(str::trim) {
            None | Some("") | Some("1") => KgIncrement::Whole,
            Some("100g") => KgIncrement::HundredGram,
            Some("500g") => KgIncrement::HalfKilogram,
            Some(other) => {
                return Err(PricingError::ConfigurationError(format!(
                    "Unknown increment '{other}'"
                )));
            }
        };

        let kind = match unit.trim() {
            "kg" => Self::Kilogram(increment),
            "hundredg" => Self::HundredGram,
            "halfkg" => Self::HalfKilogram,
            "each" => Self::Count(CountUnit::Each),
            "bunch" => Self::Count(CountUnit::Bunch),
            "punnet" => Self::Count(CountUnit::Punnet),
            "ml300" => Self::Count(CountUnit::Ml300),
            "ml500" => Self::Count(CountUnit::Ml500),
            other => {
                return Err(PricingError::ConfigurationError(format!(
                    "Unknown unit '{other}'"
                )));
            }
        };
        Ok(kind)
    }

    pub fn step_rule(&self) -> StepRule {
        match self {
            // 100 g steps up to 5 kg
            Self::Kilogram(KgIncrement::HundredGram) => StepRule::new(dec!(0.1), 1, 50),
            // 500 g steps up to 10 kg
            Self::Kilogram(KgIncrement::HalfKilogram) => StepRule::new(dec!(0.5), 1, 20),
            Self::HundredGram => StepRule::new(Decimal::ONE, 1, 50),
            Self::Kilogram(KgIncrement::Whole) | Self::HalfKilogram | Self::Count(_) => {
                StepRule::new(Decimal::ONE, 1, 20)
            }
        }
    }

    /// Multiplier applied to `price * quantity`.
    pub fn price_factor(&self) -> Decimal {
        match self {
            Self::HundredGram => dec!(0.1),
            Self::HalfKilogram => dec!(0.5),
            Self::Kilogram(_) | Self::Count(_) => Decimal::ONE,
        }
    }

    /// Exact, unrounded line total for an external quantity.
    ///
    /// Fails with a `DomainError` when the amount does not fit a `Decimal`.
    pub fn line_total(&self, price: Money, quantity: Decimal) -> Result<Money> {
        let scaled = quantity.checked_mul(self.price_factor()).ok_or_else(|| {
            PricingError::DomainError(format!("Quantity overflow: {quantity}"))
        })?;
        price.checked_mul(scaled)
    }

    /// Weight in grams for an external quantity, or `None` for count units.
    pub fn grams(&self, quantity: Decimal) -> Option<Decimal> {
        match self {
            Self::Kilogram(_) => Some(quantity.saturating_mul(dec!(1000))),
            Self::HundredGram => Some(quantity.saturating_mul(dec!(100))),
            Self::HalfKilogram => Some(quantity.saturating_mul(dec!(500))),
            Self::Count(_) => None,
        }
    }

    /// Short label used in order text.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Kilogram(_) => "kg",
            Self::HundredGram => "100g",
            Self::HalfKilogram => "500g",
            Self::Count(CountUnit::Each) => "each",
            Self::Count(CountUnit::Bunch) => "bunch",
            Self::Count(CountUnit::Punnet) => "punnet",
            Self::Count(CountUnit::Ml300) => "300ml",
            Self::Count(CountUnit::Ml500) => "500ml",
        }
    }

    /// Human readable quantity, e.g. `300g`, `1.5kg`, `3 items`.
    pub fn format_quantity(&self, quantity: Decimal) -> String {
        if let Some(grams) = self.grams(quantity) {
            let grams = grams.round();
            return if grams >= dec!(1000) {
                format!("{}kg", (grams / dec!(1000)).normalize())
            } else {
                format!("{}g", grams.normalize())
            };
        }

        let count = quantity.normalize();
        let singular = count == Decimal::ONE;
        match self {
            Self::Count(CountUnit::Each) => {
                format!("{count} {}", if singular { "item" } else { "items" })
            }
            Self::Count(CountUnit::Bunch) => {
                format!("{count} {}", if singular { "bunch" } else { "bunches" })
            }
            Self::Count(CountUnit::Punnet) => {
                format!("{count} {}", if singular { "punnet" } else { "punnets" })
            }
            _ => format!("{count} × {}", self.label()),
        }
    }
}
