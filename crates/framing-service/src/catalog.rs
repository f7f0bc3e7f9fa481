//! # Material Catalog
//!
//! Read access to the inventory of frame profiles, glass, backing boards,
//! mats and labour rates.
//!
//! ## Snapshot Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  catalog (live)                      frame order (locked)               │
//! │  ┌──────────────────────┐  snapshot  ┌────────────────────────────┐     │
//! │  │ RAM-0001  250.00/m   │ ─────────► │ frame: RAM-0001 @ 250.00   │     │
//! │  └──────────────────────┘            └────────────────────────────┘     │
//! │           │                                                             │
//! │           ▼ price raised to 300.00                                      │
//! │  ┌──────────────────────┐            ┌────────────────────────────┐     │
//! │  │ RAM-0001  300.00/m   │            │ frame: RAM-0001 @ 250.00   │     │
//! │  └──────────────────────┘            └────────────────────────────┘     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Prices are read once, when a frame order is priced. Nothing here writes
//! back into orders.

use std::collections::HashMap;

use async_trait::async_trait;
use framing_core::validation::{format_sku, sku_prefix, validate_new_catalog_item, NewCatalogItem};
use framing_core::{MaterialSelection, Money, ValidationError};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::ServiceResult;

// =============================================================================
// Catalog Material
// =============================================================================

/// A sellable material as stored in inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogMaterial {
    pub id: String,
    pub name: String,
    pub sku: String,
    pub category: String,
    /// Unit of sale, e.g. `meter` or `sqm`.
    pub unit: String,
    /// Current sales price per unit.
    pub sales_price: Money,
}

impl CatalogMaterial {
    /// Freezes name, SKU and price for attaching to an order.
    pub fn snapshot(&self) -> MaterialSelection {
        MaterialSelection::new(
            self.id.clone(),
            self.name.clone(),
            self.sku.clone(),
            self.sales_price,
        )
    }
}

// =============================================================================
// Catalog Trait
// =============================================================================

/// Inventory lookups used while pricing.
#[async_trait]
pub trait MaterialCatalog: Send + Sync {
    /// Fetches a material by id. `Ok(None)` when it does not exist.
    async fn material_by_id(&self, id: &str) -> ServiceResult<Option<CatalogMaterial>>;
}

// =============================================================================
// In-Memory Catalog
// =============================================================================

#[derive(Debug, Default)]
struct CatalogState {
    items: HashMap<String, CatalogMaterial>,
    /// Last SKU number handed out, per prefix.
    sku_counters: HashMap<String, u32>,
    next_id: u64,
}

/// Catalog held in memory, for tests and single-process deployments.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    state: RwLock<CatalogState>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a material as-is.
    pub async fn insert(&self, material: CatalogMaterial) {
        let mut state = self.state.write().await;
        state.items.insert(material.id.clone(), material);
    }

    /// Creates a catalog item from form input.
    ///
    /// A blank SKU is generated from the category (`RAM-0001`, `RAM-0002`,
    /// ...). A missing sales price falls back to purchase price × markup.
    pub async fn create_item(
        &self,
        item: NewCatalogItem,
        markup_percentage: Option<f64>,
    ) -> ServiceResult<CatalogMaterial> {
        validate_new_catalog_item(&item)?;

        let sales_price = item.effective_sales_price(markup_percentage);
        let mut state = self.state.write().await;

        let sku = match item.sku.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(sku) => sku.to_string(),
            None => {
                let prefix = sku_prefix(&item.category);
                let counter = state.sku_counters.entry(prefix.clone()).or_insert(0);
                *counter += 1;
                format_sku(&prefix, *counter)
            }
        };

        if state.items.values().any(|existing| existing.sku == sku) {
            return Err(ValidationError::InvalidFormat {
                field: "sku".to_string(),
                reason: format!("{} is already in use", sku),
            }
            .into());
        }

        state.next_id += 1;
        let material = CatalogMaterial {
            id: state.next_id.to_string(),
            name: item.name.trim().to_string(),
            sku,
            category: item.category.trim().to_string(),
            unit: item.unit.unwrap_or_else(|| "st".to_string()),
            sales_price,
        };

        info!(id = %material.id, sku = %material.sku, price = %material.sales_price, "Catalog item created");
        state.items.insert(material.id.clone(), material.clone());
        Ok(material)
    }

    /// Changes the current sales price. Returns false for unknown ids.
    pub async fn set_sales_price(&self, id: &str, price: Money) -> bool {
        let mut state = self.state.write().await;
        match state.items.get_mut(id) {
            Some(material) => {
                debug!(id, old = %material.sales_price, new = %price, "Sales price changed");
                material.sales_price = price;
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl MaterialCatalog for InMemoryCatalog {
    async fn material_by_id(&self, id: &str) -> ServiceResult<Option<CatalogMaterial>> {
        let state = self.state.read().await;
        Ok(state.items.get(id).cloned())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use framing_core::CoreError;

    fn ram(name: &str) -> NewCatalogItem {
        NewCatalogItem {
            name: name.to_string(),
            category: "Ramlist".to_string(),
            sales_price: Some(Money::from_major_minor(250, 0)),
            unit: Some("meter".to_string()),
            ..NewCatalogItem::default()
        }
    }

    #[tokio::test]
    async fn test_generated_skus_count_per_prefix() {
        let catalog = InMemoryCatalog::new();

        let first = catalog.create_item(ram("Ek 20mm"), None).await.unwrap();
        let second = catalog.create_item(ram("Ek 30mm"), None).await.unwrap();
        let glass = catalog
            .create_item(
                NewCatalogItem {
                    name: "Floatglas".to_string(),
                    category: "Glas".to_string(),
                    ..NewCatalogItem::default()
                },
                None,
            )
            .await
            .unwrap();

        assert_eq!(first.sku, "RAM-0001");
        assert_eq!(second.sku, "RAM-0002");
        assert_eq!(glass.sku, "GLA-0001");
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_markup_fills_missing_sales_price() {
        let catalog = InMemoryCatalog::new();
        let item = NewCatalogItem {
            name: "Passepartout vit".to_string(),
            category: "Passepartout".to_string(),
            purchase_price: Some(Money::from_major_minor(100, 0)),
            ..NewCatalogItem::default()
        };

        let created = catalog.create_item(item, Some(250.0)).await.unwrap();
        assert_eq!(created.sales_price, Money::from_major_minor(250, 0));
    }

    #[tokio::test]
    async fn test_invalid_and_duplicate_items_rejected() {
        let catalog = InMemoryCatalog::new();

        let err = catalog.create_item(ram("   "), None).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Core(CoreError::Validation(ValidationError::Required { .. }))
        ));

        let mut explicit = ram("Ek");
        explicit.sku = Some("EK-1".to_string());
        catalog.create_item(explicit.clone(), None).await.unwrap();
        assert!(catalog.create_item(explicit, None).await.is_err());
    }

    #[tokio::test]
    async fn test_lookup_and_snapshot() {
        let catalog = InMemoryCatalog::new();
        let created = catalog.create_item(ram("Ek 20mm"), None).await.unwrap();

        let found = catalog.material_by_id(&created.id).await.unwrap().unwrap();
        let snapshot = found.snapshot();
        assert_eq!(snapshot.sku, "RAM-0001");
        assert_eq!(snapshot.unit_price, Money::from_major_minor(250, 0));

        assert!(catalog.set_sales_price(&created.id, Money::from_major_minor(300, 0)).await);
        assert!(!catalog.set_sales_price("missing", Money::zero()).await);
        assert_eq!(snapshot.unit_price, Money::from_major_minor(250, 0));

        assert!(catalog.material_by_id("missing").await.unwrap().is_none());
    }
}
