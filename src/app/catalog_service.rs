//! Read side of the catalog, plus catalog-add.

use crate::domain::model::{NewProduct, Product, Review};
use crate::domain::{StorefrontError, StorefrontResult};
use crate::storage::{CatalogStore, ReviewStore};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

pub struct CatalogService {
    catalog: Arc<dyn CatalogStore>,
    reviews: Arc<dyn ReviewStore>,
}

impl CatalogService {
    pub fn new(catalog: Arc<dyn CatalogStore>, reviews: Arc<dyn ReviewStore>) -> Self {
        Self { catalog, reviews }
    }

    pub async fn product_count(&self) -> StorefrontResult<i64> {
        Ok(self.catalog.count_products().await?)
    }

    /// Without a filter: every product, best sellers first (ties keep insertion order).
    /// With a filter: matching products in insertion order, not re-sorted.
    pub async fn list_products(&self, category: Option<&str>) -> StorefrontResult<Vec<Product>> {
        let mut products = self.catalog.list_products().await?;
        match category {
            None => {
                // Stable sort, so equal sellers stay in insertion order.
                products.sort_by(|a, b| b.units_sold.cmp(&a.units_sold));
            }
            Some(category) => products.retain(|p| p.has_category(category)),
        }
        Ok(products)
    }

    /// Every category in use, deduplicated, in first-seen order.
    pub async fn all_categories(&self) -> StorefrontResult<Vec<String>> {
        let products = self.catalog.list_products().await?;
        let mut categories: Vec<String> = Vec::new();
        for category in products.into_iter().flat_map(|p| p.categories) {
            if !categories.contains(&category) {
                categories.push(category);
            }
        }
        Ok(categories)
    }

    pub async fn find_product(&self, name: &str) -> StorefrontResult<Option<Product>> {
        Ok(self.catalog.find_product_by_name(name).await?)
    }

    pub async fn add_product(&self, product: NewProduct) -> StorefrontResult<Product> {
        product.validate().map_err(StorefrontError::Validation)?;
        let product = self.catalog.insert_product(product).await?;
        info!(product_id = %product.id, name = %product.name, "product added");
        Ok(product)
    }

    /// All reviews, or those of one product. An id that cannot exist matches nothing.
    pub async fn list_reviews(&self, product_id: Option<&str>) -> StorefrontResult<Vec<Review>> {
        let filter = match product_id {
            None => None,
            Some(raw) => match Uuid::parse_str(raw) {
                Ok(id) => Some(id),
                Err(_) => return Ok(Vec::new()),
            },
        };
        Ok(self.reviews.list_reviews(filter).await?)
    }

    /// The product's reviews in comment-list order.
    pub async fn reviews_for(&self, product: &Product) -> StorefrontResult<Vec<Review>> {
        Ok(self.reviews.find_reviews(&product.comment_ids).await?)
    }
}

/// Parses client-supplied comment ids for catalog-add.
pub fn parse_comment_ids(raw: &[String]) -> StorefrontResult<Vec<Uuid>> {
    raw.iter()
        .map(|id| {
            Uuid::parse_str(id).map_err(|_| {
                StorefrontError::validation(format!("'{}' is not a valid comment id", id))
            })
        })
        .collect()
}
