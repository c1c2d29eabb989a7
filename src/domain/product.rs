use crate::domain::money::Money;
use crate::domain::unit::UnitKind;
use crate::error::{PricingError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;

fn default_unit() -> String {
    "each".to_string()
}

fn default_active() -> bool {
    true
}

/// A catalog entry as it arrives from the products API or a JSON export.
///
/// Fields the pricing engine does not use (photos, specials, popularity) are
/// ignored during deserialization.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct ProductRecord {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    pub price: Decimal,
    #[serde(default = "default_unit")]
    pub unit: String,
    #[serde(default)]
    pub increment: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

impl ProductRecord {
    /// Slots with a blank name are unused placeholders in the catalog.
    pub fn is_placeholder(&self) -> bool {
        self.name.trim().is_empty()
    }
}

/// A validated product snapshot with its unit resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: u32,
    pub name: String,
    pub category: String,
    pub price: Money,
    pub unit: UnitKind,
    pub active: bool,
}

impl Product {
    /// Whether a customer may add this product to a cart.
    pub fn is_purchasable(&self) -> bool {
        self.active && !self.name.trim().is_empty()
    }
}

impl TryFrom<ProductRecord> for Product {
    type Error = PricingError;

    fn try_from(record: ProductRecord) -> Result<Self> {
        let unit = UnitKind::resolve(&record.unit, record.increment.as_deref()).map_err(
            |e| match e {
                PricingError::ConfigurationError(msg) => {
                    PricingError::ConfigurationError(format!("product {}: {msg}", record.id))
                }
                other => other,
            },
        )?;
        let price = Money::price(record.price)?;

        Ok(Self {
            id: record.id,
            name: record.name,
            category: record.category,
            price,
            unit,
            active: record.active,
        })
    }
}
