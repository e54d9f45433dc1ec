//! In-process backend. Each mutation runs under a single write lock, which gives the
//! same per-record atomicity the PostgreSQL backend gets from conditional updates.

use crate::domain::model::{
    NewProduct, NewReview, NewUser, Product, Review, StockChange, StockRejection, User,
    UserRecord,
};
use crate::storage::{CatalogStore, ReviewStore, Store, StoreError, StoreResult, UserStore};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    users: Vec<UserRecord>,
    products: Vec<Product>,
    reviews: Vec<Review>,
}

impl Tables {
    fn product_by_name_mut(&mut self, name: &str) -> Option<&mut Product> {
        self.products.iter_mut().find(|p| p.name == name)
    }

    fn product_by_id_mut(&mut self, id: Uuid) -> Option<&mut Product> {
        self.products.iter_mut().find(|p| p.id == id)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        crate::domain::model::validate_username(&user.username).map_err(StoreError::Conflict)?;

        let mut tables = self.tables.write().await;
        if tables
            .users
            .iter()
            .any(|u| u.user.username == user.username)
        {
            return Err(StoreError::Conflict("Username is already taken".to_string()));
        }
        let record = user.into_record(Uuid::new_v4());
        let created = record.user.clone();
        tables.users.push(record);
        Ok(created)
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<UserRecord>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.user.username == username)
            .cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.user.id == id)
            .map(|u| u.user.clone()))
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn insert_product(&self, product: NewProduct) -> StoreResult<Product> {
        let mut tables = self.tables.write().await;
        if tables.products.iter().any(|p| p.name == product.name) {
            return Err(StoreError::Conflict(
                "A product with this name already exists".to_string(),
            ));
        }
        let product = product.into_product(Uuid::new_v4());
        tables.products.push(product.clone());
        Ok(product)
    }

    async fn count_products(&self) -> StoreResult<i64> {
        Ok(self.tables.read().await.products.len() as i64)
    }

    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        Ok(self.tables.read().await.products.clone())
    }

    async fn find_product_by_name(&self, name: &str) -> StoreResult<Option<Product>> {
        let tables = self.tables.read().await;
        Ok(tables.products.iter().find(|p| p.name == name).cloned())
    }

    async fn find_product_by_id(&self, id: Uuid) -> StoreResult<Option<Product>> {
        let tables = self.tables.read().await;
        Ok(tables.products.iter().find(|p| p.id == id).cloned())
    }

    async fn change_stock(
        &self,
        name: &str,
        change: StockChange,
    ) -> StoreResult<Result<Product, StockRejection>> {
        let mut tables = self.tables.write().await;
        let product = tables
            .product_by_name_mut(name)
            .ok_or_else(|| StoreError::NotFound(format!("product '{}'", name)))?;
        Ok(product.apply(change).map(|()| product.clone()))
    }
}

#[async_trait]
impl ReviewStore for MemoryStore {
    async fn insert_linked_review(&self, review: NewReview) -> StoreResult<Review> {
        let mut tables = self.tables.write().await;
        let review = review.into_review(Uuid::new_v4(), Utc::now());
        let product = tables
            .product_by_id_mut(review.product_id)
            .ok_or_else(|| StoreError::NotFound(format!("product {}", review.product_id)))?;
        product.comment_ids.push(review.id);
        tables.reviews.push(review.clone());
        Ok(review)
    }

    async fn list_reviews(&self, product_id: Option<Uuid>) -> StoreResult<Vec<Review>> {
        let tables = self.tables.read().await;
        Ok(tables
            .reviews
            .iter()
            .filter(|r| product_id.map_or(true, |id| r.product_id == id))
            .cloned()
            .collect())
    }

    async fn find_reviews(&self, ids: &[Uuid]) -> StoreResult<Vec<Review>> {
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.reviews.iter().find(|r| r.id == *id).cloned())
            .collect())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
