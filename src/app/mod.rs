//! Capability services: the storefront's domain operations, independent of any API layer.

pub mod auth_service;
pub mod catalog_service;
pub mod inventory_service;
pub mod review_service;
pub mod services;

pub use auth_service::AuthService;
pub use catalog_service::CatalogService;
pub use inventory_service::InventoryService;
pub use review_service::ReviewService;
pub use services::Services;

use crate::domain::StorefrontError;
use crate::storage::StoreError;
use tracing::error;

impl From<StoreError> for StorefrontError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(msg) => StorefrontError::Validation(msg),
            StoreError::NotFound(what) => StorefrontError::NotFound(format!("{} not found", what)),
            other => {
                error!(error = %other, "store operation failed");
                StorefrontError::Validation("storage unavailable, try again later".to_string())
            }
        }
    }
}
