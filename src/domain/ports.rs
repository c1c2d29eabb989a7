use super::product::Product;
use crate::error::Result;
use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};

/// Read-only access to the product catalog.
///
/// Implementations hand out owned snapshots; callers never hold a reference into
/// the catalog itself.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn get(&self, product_id: u32) -> Result<Option<Product>>;
    /// Purchasable products in catalog order, placeholders excluded.
    async fn list_active(&self) -> Result<Vec<Product>>;
}

/// Free-delivery credits earned through rewards.
#[async_trait]
pub trait RewardsLedger: Send + Sync {
    async fn has_free_delivery(&self) -> Result<bool>;
    /// Uses one credit. Returns `false` and changes nothing when none is left.
    async fn consume_free_delivery(&self) -> Result<bool>;
    async fn free_delivery_count(&self) -> Result<u32>;
    async fn grant_free_delivery(&self, uses: u32) -> Result<()>;
}

/// Source of local wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

pub type CatalogStoreBox = Box<dyn CatalogStore>;
pub type RewardsLedgerBox = Box<dyn RewardsLedger>;
pub type ClockBox = Box<dyn Clock>;

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
