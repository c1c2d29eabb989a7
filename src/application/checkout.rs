use crate::application::engine::{CartSummary, PricingEngine};
use crate::domain::cart::{Cart, CartLineItem};
use crate::domain::cutoff::CutoffStatus;
use crate::domain::delivery::DeliveryContext;
use crate::domain::ports::{CatalogStoreBox, ClockBox, RewardsLedger, RewardsLedgerBox};
use crate::error::{PricingError, Result};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

/// What the checkout screen shows before the customer commits.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutPreview {
    pub context: DeliveryContext,
    pub summary: CartSummary,
    pub cutoff: CutoffStatus,
    pub free_delivery_credits: u32,
}

/// A finalized order, detached from the (now cleared) cart.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderReceipt {
    pub lines: Vec<CartLineItem>,
    pub context: DeliveryContext,
    pub summary: CartSummary,
    pub cutoff: CutoffStatus,
    pub credit_consumed: bool,
    pub placed_at: NaiveDateTime,
}

/// Two-phase checkout over the pricing engine.
///
/// `preview` reads the rewards ledger but never changes it. `finalize` is the only
/// operation that spends a free-delivery credit, and it clears the cart.
pub struct CheckoutService {
    engine: PricingEngine,
    catalog: CatalogStoreBox,
    ledger: RewardsLedgerBox,
    clock: ClockBox,
}

impl CheckoutService {
    pub fn new(
        engine: PricingEngine,
        catalog: CatalogStoreBox,
        ledger: RewardsLedgerBox,
        clock: ClockBox,
    ) -> Self {
        Self {
            engine,
            catalog,
            ledger,
            clock,
        }
    }

    pub fn engine(&self) -> &PricingEngine {
        &self.engine
    }

    pub fn ledger(&self) -> &dyn RewardsLedger {
        self.ledger.as_ref()
    }

    /// Looks a product up in the catalog and merges it into `cart`.
    pub async fn add_to_cart(
        &self,
        cart: &mut Cart,
        product_id: u32,
        quantity: Decimal,
    ) -> Result<CartLineItem> {
        let product = self
            .catalog
            .get(product_id)
            .await?
            .ok_or(PricingError::ProductNotFound(product_id))?;

        let existing = cart.get(product_id).map_or(Decimal::ZERO, |i| i.quantity());
        let item = cart.add_or_merge(&product, quantity)?;
        let requested = existing.checked_add(quantity);
        if requested != Some(item.quantity()) {
            debug!(
                product_id,
                %quantity,
                line_quantity = %item.quantity(),
                steps = item.steps(),
                "quantity snapped to step rules"
            );
        }
        Ok(item.clone())
    }

    async fn context_with_rewards(&self, ctx: &DeliveryContext) -> Result<DeliveryContext> {
        let has_credit = self.ledger.has_free_delivery().await?;
        Ok(ctx.clone().with_free_delivery_credit(has_credit))
    }

    /// Computes the summary and cutoff status without side effects.
    pub async fn preview(&self, cart: &Cart, ctx: &DeliveryContext) -> Result<CheckoutPreview> {
        let context = self.context_with_rewards(ctx).await?;
        let summary = self.engine.cart_summary(cart, &context);
        let cutoff = self.engine.cutoff_status(self.clock.now());
        let free_delivery_credits = self.ledger.free_delivery_count().await?;

        Ok(CheckoutPreview {
            context,
            summary,
            cutoff,
            free_delivery_credits,
        })
    }

    /// Commits the order: spends a free-delivery credit when one was applied and
    /// clears the cart.
    ///
    /// Fails without touching the cart or the ledger when the cart is empty or
    /// delivery is unavailable for the chosen postcode.
    pub async fn finalize(&self, cart: &mut Cart, ctx: &DeliveryContext) -> Result<OrderReceipt> {
        if cart.is_empty() {
            return Err(PricingError::DomainError(
                "Cannot check out an empty cart".to_string(),
            ));
        }

        let mut context = self.context_with_rewards(ctx).await?;
        let mut summary = self.engine.cart_summary(cart, &context);
        if !summary.delivery_fee.is_available() {
            return Err(PricingError::DeliveryUnavailable(
                context.postcode.clone().unwrap_or_default(),
            ));
        }

        let mut credit_consumed = false;
        if summary.free_delivery_applied {
            credit_consumed = self
                .engine
                .consume_free_delivery_credit(self.ledger.as_ref())
                .await?;
            if !credit_consumed {
                warn!("free delivery credit vanished before checkout, charging tier fee");
                context.has_free_delivery_credit = false;
                summary = self.engine.cart_summary(cart, &context);
            }
        }

        let placed_at = self.clock.now();
        let cutoff = self.engine.cutoff_status(placed_at);
        let lines = cart.items().to_vec();
        cart.clear();

        info!(
            lines = lines.len(),
            method = %context.method,
            total = %summary.grand_total,
            credit_consumed,
            "order finalized"
        );

        Ok(OrderReceipt {
            lines,
            context,
            summary,
            cutoff,
            credit_consumed,
            placed_at,
        })
    }
}
