//! Review submission.

use crate::domain::model::{NewReview, Review};
use crate::domain::{StorefrontError, StorefrontResult};
use crate::storage::ReviewStore;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

pub struct ReviewService {
    reviews: Arc<dyn ReviewStore>,
}

impl ReviewService {
    pub fn new(reviews: Arc<dyn ReviewStore>) -> Self {
        Self { reviews }
    }

    /// Stores a review and links it to its product in one step; either both happen or
    /// neither does.
    pub async fn add_review(
        &self,
        product_id: &str,
        author: &str,
        content: &str,
        grade: Option<i32>,
    ) -> StorefrontResult<Review> {
        let product_id = Uuid::parse_str(product_id)
            .map_err(|_| StorefrontError::not_found(format!("product {} not found", product_id)))?;
        let review = NewReview {
            author: author.to_string(),
            product_id,
            content: content.to_string(),
            grade,
        };
        review.validate().map_err(StorefrontError::Validation)?;

        let review = self.reviews.insert_linked_review(review).await?;
        info!(review_id = %review.id, product_id = %review.product_id, "review added");
        Ok(review)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::NewProduct;
    use crate::storage::{CatalogStore, MemoryStore};

    async fn seeded() -> (Arc<MemoryStore>, ReviewService, Uuid) {
        let store = Arc::new(MemoryStore::new());
        let product = store
            .insert_product(NewProduct {
                name: "Tent".to_string(),
                price: 120.0,
                quantity: 2,
                categories: vec!["outdoor".to_string()],
                description: Some("Two person".to_string()),
                units_sold: 0,
                comment_ids: vec![],
            })
            .await
            .unwrap();
        (store.clone(), ReviewService::new(store), product.id)
    }

    #[tokio::test]
    async fn review_is_linked_to_its_product() {
        let (store, service, product_id) = seeded().await;
        let first = service
            .add_review(&product_id.to_string(), "kim", "Kept us dry", Some(5))
            .await
            .unwrap();
        let second = service
            .add_review(&product_id.to_string(), "lee", "Heavy", None)
            .await
            .unwrap();

        let product = store.find_product_by_id(product_id).await.unwrap().unwrap();
        assert_eq!(product.comment_ids, vec![first.id, second.id]);
    }

    #[tokio::test]
    async fn unknown_or_malformed_product_is_not_found() {
        let (store, service, _) = seeded().await;
        for id in [Uuid::new_v4().to_string(), "abc".to_string()] {
            assert!(matches!(
                service.add_review(&id, "kim", "?", None).await,
                Err(StorefrontError::NotFound(_))
            ));
        }
        assert!(store.list_reviews(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn out_of_range_grade_is_rejected() {
        let (store, service, product_id) = seeded().await;
        assert!(matches!(
            service
                .add_review(&product_id.to_string(), "kim", "Great", Some(9))
                .await,
            Err(StorefrontError::Validation(_))
        ));
        let product = store.find_product_by_id(product_id).await.unwrap().unwrap();
        assert!(product.comment_ids.is_empty());
    }
}
