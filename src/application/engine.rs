use crate::config::PricingConfig;
use crate::domain::cart::Cart;
use crate::domain::cutoff::{CutoffStatus, compute_cutoff_status};
use crate::domain::delivery::{DeliveryContext, DeliveryFee, FulfilmentMethod, quote_delivery_fee};
use crate::domain::money::Money;
use crate::domain::ports::RewardsLedger;
use crate::domain::product::Product;
use crate::domain::unit::StepRule;
use crate::error::{PricingError, Result};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use tracing::debug;

/// Totals for a cart under a given fulfilment choice. Amounts are unrounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartSummary {
    pub subtotal: Money,
    pub delivery_fee: DeliveryFee,
    pub grand_total: Money,
    pub free_delivery_applied: bool,
    /// How much more the customer must spend to reach the free delivery tier.
    pub amount_to_free_delivery: Option<Money>,
}

/// The pricing core.
///
/// `PricingEngine` owns the pricing configuration and computes line totals, cart
/// summaries and cutoff status. Apart from
/// [`consume_free_delivery_credit`](Self::consume_free_delivery_credit), every
/// method is a pure computation.
#[derive(Debug, Clone, Default)]
pub struct PricingEngine {
    config: PricingConfig,
}

impl PricingEngine {
    /// Creates an engine after validating `config`.
    pub fn new(config: PricingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// `price × quantity`, scaled for fixed-weight units. `quantity` is in the
    /// product's external unit and is not clamped; a product that overflows the
    /// amount range is a `DomainError`.
    pub fn compute_line_total(&self, product: &Product, quantity: Decimal) -> Result<Money> {
        if quantity.is_sign_negative() && !quantity.is_zero() {
            return Err(PricingError::DomainError(format!(
                "Quantity must not be negative, got {quantity}"
            )));
        }
        product.unit.line_total(product.price, quantity)
    }

    /// Step size and selector bounds for a product's unit.
    pub fn quantity_step_rules(&self, product: &Product) -> StepRule {
        product.unit.step_rule()
    }

    /// Subtotal, delivery fee and grand total. Never touches the rewards ledger.
    pub fn cart_summary(&self, cart: &Cart, ctx: &DeliveryContext) -> CartSummary {
        let subtotal = cart.subtotal();
        let quote = quote_delivery_fee(&self.config.delivery, subtotal, ctx);
        let grand_total = subtotal + quote.fee.amount().unwrap_or(Money::ZERO);

        let amount_to_free_delivery = match quote.fee {
            DeliveryFee::Charged(fee)
                if ctx.method == FulfilmentMethod::Delivery
                    && !quote.free_delivery_applied
                    && !fee.is_zero() =>
            {
                self.config
                    .delivery
                    .free_threshold()
                    .map(|threshold| (threshold - subtotal).max(Money::ZERO))
            }
            _ => None,
        };

        CartSummary {
            subtotal,
            delivery_fee: quote.fee,
            grand_total,
            free_delivery_applied: quote.free_delivery_applied,
            amount_to_free_delivery,
        }
    }

    /// Next-day fulfilment status at `now` under the configured cutoff.
    pub fn cutoff_status(&self, now: NaiveDateTime) -> CutoffStatus {
        compute_cutoff_status(now, &self.config.cutoff)
    }

    /// Spends one free-delivery credit. Only checkout finalization should call this.
    pub async fn consume_free_delivery_credit(&self, ledger: &dyn RewardsLedger) -> Result<bool> {
        let consumed = ledger.consume_free_delivery().await?;
        debug!(consumed, "free delivery credit consumption");
        Ok(consumed)
    }
}
