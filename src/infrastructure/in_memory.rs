use crate::domain::ports::{CatalogStore, RewardsLedger};
use crate::domain::product::{Product, ProductRecord};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// A thread-safe in-memory product catalog.
///
/// Placeholder slots (blank names) are dropped when loading, so they never show up
/// in listings or lookups. Insertion order is kept for listings.
#[derive(Default, Clone)]
pub struct InMemoryCatalogStore {
    products: Arc<RwLock<HashMap<u32, Product>>>,
    order: Arc<RwLock<Vec<u32>>>,
}

impl InMemoryCatalogStore {
    /// Creates a new, empty in-memory catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates raw records and builds a catalog from them.
    ///
    /// Fails on the first record with an unknown unit/increment or a negative price.
    pub fn from_records(records: Vec<ProductRecord>) -> Result<Self> {
        let mut products = HashMap::new();
        let mut order = Vec::new();
        for record in records {
            if record.is_placeholder() {
                debug!(id = record.id, "skipping placeholder product");
                continue;
            }
            let product = Product::try_from(record)?;
            if products.insert(product.id, product.clone()).is_none() {
                order.push(product.id);
            }
        }
        Ok(Self {
            products: Arc::new(RwLock::new(products)),
            order: Arc::new(RwLock::new(order)),
        })
    }

    /// Adds or replaces a product.
    pub async fn upsert(&self, product: Product) {
        let mut products = self.products.write().await;
        if products.insert(product.id, product.clone()).is_none() {
            self.order.write().await.push(product.id);
        }
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn get(&self, product_id: u32) -> Result<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.get(&product_id).cloned())
    }

    async fn list_active(&self) -> Result<Vec<Product>> {
        let products = self.products.read().await;
        let order = self.order.read().await;
        Ok(order
            .iter()
            .filter_map(|id| products.get(id))
            .filter(|p| p.is_purchasable())
            .cloned()
            .collect())
    }
}

/// A thread-safe in-memory rewards ledger.
///
/// Each grant carries a number of uses; consuming takes one use from the oldest
/// grant that still has any and drops grants once they reach zero.
#[derive(Default, Clone)]
pub struct InMemoryRewardsLedger {
    grants: Arc<RwLock<Vec<u32>>>,
}

impl InMemoryRewardsLedger {
    /// Creates a new, empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a ledger holding `uses` free deliveries in a single grant.
    pub fn with_credits(uses: u32) -> Self {
        let grants = if uses > 0 { vec![uses] } else { Vec::new() };
        Self {
            grants: Arc::new(RwLock::new(grants)),
        }
    }
}

#[async_trait]
impl RewardsLedger for InMemoryRewardsLedger {
    async fn has_free_delivery(&self) -> Result<bool> {
        let grants = self.grants.read().await;
        Ok(grants.iter().any(|uses| *uses > 0))
    }

    async fn consume_free_delivery(&self) -> Result<bool> {
        let mut grants = self.grants.write().await;
        let Some(index) = grants.iter().position(|uses| *uses > 0) else {
            return Ok(false);
        };
        grants[index] -= 1;
        if grants[index] == 0 {
            grants.remove(index);
        }
        Ok(true)
    }

    async fn free_delivery_count(&self) -> Result<u32> {
        let grants = self.grants.read().await;
        Ok(grants.iter().fold(0u32, |total, uses| total.saturating_add(*uses)))
    }

    async fn grant_free_delivery(&self, uses: u32) -> Result<()> {
        if uses > 0 {
            self.grants.write().await.push(uses);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn record(id: u32, name: &str, active: bool) -> ProductRecord {
        ProductRecord {
            id,
            name: name.to_string(),
            category: "fruits".to_string(),
            price: dec!(2.50),
            unit: "each".to_string(),
            increment: None,
            active,
        }
    }

    #[tokio::test]
    async fn test_catalog_skips_placeholders() {
        let store = InMemoryCatalogStore::from_records(vec![
            record(1, "Apple", true),
            record(2, "", false),
            record(3, "Pear", false),
            record(4, "Plum", true),
        ])
        .unwrap();

        assert!(store.get(2).await.unwrap().is_none());
        assert!(store.get(3).await.unwrap().is_some());

        let ids: Vec<u32> = store
            .list_active()
            .await
            .unwrap()
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![1, 4]);
    }

    #[tokio::test]
    async fn test_catalog_rejects_bad_unit() {
        let mut bad = record(9, "Odd", true);
        bad.unit = "crate".to_string();
        assert!(InMemoryCatalogStore::from_records(vec![bad]).is_err());
    }

    #[tokio::test]
    async fn test_upsert_replaces() {
        let store = InMemoryCatalogStore::new();
        let mut product = Product::try_from(record(1, "Apple", true)).unwrap();
        store.upsert(product.clone()).await;
        product.name = "Green apple".to_string();
        store.upsert(product).await;

        let listed = store.list_active().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Green apple");
    }

    #[tokio::test]
    async fn test_ledger_consumes_across_grants() {
        let ledger = InMemoryRewardsLedger::new();
        assert!(!ledger.has_free_delivery().await.unwrap());
        assert!(!ledger.consume_free_delivery().await.unwrap());

        ledger.grant_free_delivery(1).await.unwrap();
        ledger.grant_free_delivery(2).await.unwrap();
        assert_eq!(ledger.free_delivery_count().await.unwrap(), 3);

        assert!(ledger.consume_free_delivery().await.unwrap());
        assert!(ledger.consume_free_delivery().await.unwrap());
        assert!(ledger.consume_free_delivery().await.unwrap());
        assert!(!ledger.consume_free_delivery().await.unwrap());
        assert_eq!(ledger.free_delivery_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_ledger_count_saturates() {
        let ledger = InMemoryRewardsLedger::with_credits(u32::MAX);
        ledger.grant_free_delivery(1).await.unwrap();
        assert_eq!(ledger.free_delivery_count().await.unwrap(), u32::MAX);

        assert!(ledger.consume_free_delivery().await.unwrap());
        assert_eq!(ledger.free_delivery_count().await.unwrap(), u32::MAX);
    }

    #[tokio::test]
    async fn test_ledger_with_credits() {
        let ledger = InMemoryRewardsLedger::with_credits(2);
        assert!(ledger.has_free_delivery().await.unwrap());
        assert_eq!(ledger.free_delivery_count().await.unwrap(), 2);
        assert_eq!(
            InMemoryRewardsLedger::with_credits(0)
                .free_delivery_count()
                .await
                .unwrap(),
            0
        );
    }
}
