use crate::domain::money::Money;
use crate::domain::product::Product;
use crate::domain::unit::UnitKind;
use crate::error::{PricingError, Result};
use rust_decimal::Decimal;

/// One product entry in a cart.
///
/// Name, price and unit are snapshotted when the line is created, so later catalog
/// price changes do not reprice items already in the cart. Quantity is held as a
/// whole number of steps and `total` is recomputed on every change.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLineItem {
    product_id: u32,
    name: String,
    category: String,
    price: Money,
    unit: UnitKind,
    steps: u32,
    total: Money,
}

impl CartLineItem {
    fn new(product: &Product, steps: u32) -> Result<Self> {
        let mut item = Self {
            product_id: product.id,
            name: product.name.clone(),
            category: product.category.clone(),
            price: product.price,
            unit: product.unit,
            steps: 0,
            total: Money::ZERO,
        };
        item.set_steps(steps)?;
        Ok(item)
    }

    /// Clamps `steps` and recomputes the total. On error the line is left unchanged.
    fn set_steps(&mut self, steps: u32) -> Result<()> {
        let rule = self.unit.step_rule();
        let steps = rule.clamp_steps(steps);
        self.total = self.unit.line_total(self.price, rule.quantity(steps))?;
        self.steps = steps;
        Ok(())
    }

    pub fn product_id(&self) -> u32 {
        self.product_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// Unit price captured at add time.
    pub fn price(&self) -> Money {
        self.price
    }

    pub fn unit(&self) -> UnitKind {
        self.unit
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Quantity in the product's external unit (kg decimal, step count or items).
    pub fn quantity(&self) -> Decimal {
        self.unit.step_rule().quantity(self.steps)
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn quantity_display(&self) -> String {
        self.unit.format_quantity(self.quantity())
    }
}

/// An ordered collection of line items, at most one per product.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    /// Creates a new, empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Line items in the order they were first added.
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn get(&self, product_id: u32) -> Option<&CartLineItem> {
        self.items.iter().find(|i| i.product_id == product_id)
    }

    /// Adds `quantity` of a product, merging into an existing line for the same id.
    ///
    /// The requested quantity is snapped to the product's step and the merged
    /// result is clamped to the step rule's bounds. An existing line keeps its
    /// original price snapshot.
    pub fn add_or_merge(&mut self, product: &Product, quantity: Decimal) -> Result<&CartLineItem> {
        if !product.is_purchasable() {
            return Err(PricingError::ProductUnavailable(product.id));
        }
        let steps = product.unit.step_rule().snap(quantity)?;

        let index = match self.items.iter().position(|i| i.product_id == product.id) {
            Some(index) => {
                let item = &mut self.items[index];
                item.set_steps(item.steps.saturating_add(steps))?;
                index
            }
            None => {
                self.items.push(CartLineItem::new(product, steps)?);
                self.items.len() - 1
            }
        };
        Ok(&self.items[index])
    }

    /// Replaces a line's quantity. Returns `None` if the product is not in the cart.
    pub fn update_quantity(
        &mut self,
        product_id: u32,
        quantity: Decimal,
    ) -> Result<Option<&CartLineItem>> {
        let Some(item) = self.items.iter_mut().find(|i| i.product_id == product_id) else {
            return Ok(None);
        };
        let steps = item.unit.step_rule().snap(quantity)?;
        item.set_steps(steps)?;
        Ok(Some(&*item))
    }

    /// Moves a line up or down by whole steps, clamping at the bounds. Returns
    /// `None` if the product is not in the cart.
    pub fn adjust_quantity(
        &mut self,
        product_id: u32,
        delta_steps: i32,
    ) -> Result<Option<&CartLineItem>> {
        let Some(item) = self.items.iter_mut().find(|i| i.product_id == product_id) else {
            return Ok(None);
        };
        let steps = item.unit.step_rule().adjust(item.steps, delta_steps);
        item.set_steps(steps)?;
        Ok(Some(&*item))
    }

    /// Removes a product's line and hands it back, or `None` if it was not in the cart.
    pub fn remove(&mut self, product_id: u32) -> Option<CartLineItem> {
        let index = self.items.iter().position(|i| i.product_id == product_id)?;
        Some(self.items.remove(index))
    }

    /// Empties the cart, as after a finalized order.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Unrounded sum of line totals.
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(CartLineItem::total).sum()
    }

    /// Sum of external quantities, as shown on the cart badge.
    pub fn item_count(&self) -> Decimal {
        self.items.iter().map(CartLineItem::quantity).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::unit::{CountUnit, KgIncrement};
    use rust_decimal_macros::dec;

    fn product(id: u32, price: Decimal, unit: UnitKind) -> Product {
        Product {
            id,
            name: format!("Product {id}"),
            category: "vegetables".to_string(),
            price: Money::new(price),
            unit,
            active: true,
        }
    }

    #[test]
    fn test_add_same_product_merges() {
        let apple = product(1, dec!(0.99), UnitKind::Count(CountUnit::Each));
        let mut cart = Cart::new();

        cart.add_or_merge(&apple, dec!(2)).unwrap();
        let item = cart.add_or_merge(&apple, dec!(3)).unwrap();
        assert_eq!(item.quantity(), dec!(5));
        assert_eq!(item.total().value(), dec!(4.95));
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_merge_clamps_to_max() {
        let beans = product(24, dec!(6.99), UnitKind::HundredGram);
        let mut cart = Cart::new();
        cart.add_or_merge(&beans, dec!(40)).unwrap();
        let item = cart.add_or_merge(&beans, dec!(40)).unwrap();
        assert_eq!(item.steps(), 50);
    }

    #[test]
    fn test_price_snapshot_survives_catalog_change() {
        let mut tomato = product(32, dec!(4.99), UnitKind::Kilogram(KgIncrement::HundredGram));
        let mut cart = Cart::new();
        cart.add_or_merge(&tomato, dec!(0.3)).unwrap();

        tomato.price = Money::new(dec!(9.99));
        let item = cart.add_or_merge(&tomato, dec!(0.2)).unwrap();
        assert_eq!(item.price().value(), dec!(4.99));
        assert_eq!(item.total().value(), dec!(2.495));
    }

    #[test]
    fn test_inactive_product_rejected() {
        let mut gone = product(5, dec!(1.0), UnitKind::Count(CountUnit::Each));
        gone.active = false;
        let mut cart = Cart::new();
        assert!(matches!(
            cart.add_or_merge(&gone, dec!(1)),
            Err(PricingError::ProductUnavailable(5))
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_negative_quantity_rejected() {
        let apple = product(1, dec!(0.99), UnitKind::Count(CountUnit::Each));
        let mut cart = Cart::new();
        assert!(matches!(
            cart.add_or_merge(&apple, dec!(-2)),
            Err(PricingError::DomainError(_))
        ));
    }

    #[test]
    fn test_update_and_adjust_recompute_total() {
        let garlic = product(31, dec!(3.99), UnitKind::HalfKilogram);
        let mut cart = Cart::new();
        cart.add_or_merge(&garlic, dec!(1)).unwrap();

        let item = cart.update_quantity(31, dec!(4)).unwrap().unwrap();
        assert_eq!(item.total().value(), dec!(7.98));

        let item = cart.adjust_quantity(31, -1).unwrap().unwrap();
        assert_eq!(item.steps(), 3);
        assert_eq!(item.total().value(), dec!(5.985));

        assert!(cart.update_quantity(99, dec!(1)).unwrap().is_none());
        assert!(cart.adjust_quantity(99, 1).unwrap().is_none());
    }

    #[test]
    fn test_overflowing_price_rejected_without_panic() {
        let gold = product(9, Decimal::MAX, UnitKind::Count(CountUnit::Each));
        let mut cart = Cart::new();
        assert!(matches!(
            cart.add_or_merge(&gold, dec!(2)),
            Err(PricingError::DomainError(_))
        ));
        assert!(cart.is_empty());

        // One unit fits, growing the line does not; the line keeps its last good state
        cart.add_or_merge(&gold, dec!(1)).unwrap();
        assert!(matches!(
            cart.adjust_quantity(9, 1),
            Err(PricingError::DomainError(_))
        ));
        assert!(matches!(
            cart.add_or_merge(&gold, dec!(1)),
            Err(PricingError::DomainError(_))
        ));
        let line = cart.get(9).unwrap();
        assert_eq!(line.steps(), 1);
        assert_eq!(line.total().value(), Decimal::MAX);
    }

    #[test]
    fn test_remove_and_clear() {
        let a = product(1, dec!(1), UnitKind::Count(CountUnit::Each));
        let b = product(2, dec!(2), UnitKind::Count(CountUnit::Bunch));
        let mut cart = Cart::new();
        cart.add_or_merge(&a, dec!(1)).unwrap();
        cart.add_or_merge(&b, dec!(2)).unwrap();

        let removed = cart.remove(1).unwrap();
        assert_eq!(removed.product_id(), 1);
        assert!(cart.remove(1).is_none());
        assert_eq!(cart.subtotal().value(), dec!(4));

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal(), Money::ZERO);
    }

    #[test]
    fn test_subtotal_is_unrounded() {
        let tomato = product(32, dec!(4.99), UnitKind::Kilogram(KgIncrement::HundredGram));
        let bag = product(2, dec!(1.99), UnitKind::Count(CountUnit::Each));
        let mut cart = Cart::new();
        cart.add_or_merge(&tomato, dec!(0.3)).unwrap();
        cart.add_or_merge(&bag, dec!(2)).unwrap();

        assert_eq!(cart.subtotal().value(), dec!(5.477));
        assert_eq!(cart.item_count(), dec!(2.3));
    }
}
