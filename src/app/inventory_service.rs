//! Stock adjustments. `units_sold` grows only through a successful decrease.

use crate::domain::model::{Product, StockChange, StockRejection};
use crate::domain::{StorefrontError, StorefrontResult};
use crate::storage::CatalogStore;
use std::sync::Arc;
use tracing::{debug, info};

pub const EXCEEDS_QUANTITY: &str = "Given value exceeds the quantity of the product";

pub struct InventoryService {
    catalog: Arc<dyn CatalogStore>,
}

impl InventoryService {
    pub fn new(catalog: Arc<dyn CatalogStore>) -> Self {
        Self { catalog }
    }

    /// quantity += amount.
    pub async fn increase(&self, name: &str, amount: i32) -> StorefrontResult<Product> {
        if amount < 1 {
            return Err(StorefrontError::validation(
                "Quantity can only be incremented by a positive integer",
            ));
        }
        self.apply(name, StockChange::Restock(amount)).await
    }

    /// quantity -= amount and units_sold += amount, or nothing at all.
    pub async fn decrease(&self, name: &str, amount: i32) -> StorefrontResult<Product> {
        if amount < 1 {
            return Err(StorefrontError::validation(
                "Quantity can only be decremented by a positive integer",
            ));
        }
        self.apply(name, StockChange::Sale(amount)).await
    }

    async fn apply(&self, name: &str, change: StockChange) -> StorefrontResult<Product> {
        match self.catalog.change_stock(name, change).await? {
            Ok(product) => {
                info!(
                    product = %product.name,
                    ?change,
                    quantity = product.quantity,
                    units_sold = product.units_sold,
                    "stock updated"
                );
                Ok(product)
            }
            Err(StockRejection::Insufficient { available }) => {
                debug!(
                    product = name,
                    requested = change.amount(),
                    available,
                    "sale exceeds stock"
                );
                Err(StorefrontError::validation(EXCEEDS_QUANTITY))
            }
            Err(StockRejection::Overflow) => Err(StorefrontError::validation(
                "Quantity change exceeds the supported stock range",
            )),
        }
    }
}
