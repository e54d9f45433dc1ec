//! Persistence seams for users, products and reviews.
//!
//! Services only see the traits below. Two backends implement them: [`PostgresStore`]
//! for deployments and [`MemoryStore`] for local runs and tests. Every mutating call is
//! atomic with respect to the record it touches.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod retry;
pub mod schema;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use postgres::PostgresStore;

use crate::domain::model::{
    NewProduct, NewReview, NewUser, Product, Review, StockChange, StockRejection, User,
    UserRecord,
};
use async_trait::async_trait;
use uuid::Uuid;

/// Credential store. Enforces username uniqueness.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with [`StoreError::Conflict`] when the username is taken.
    async fn insert_user(&self, user: NewUser) -> StoreResult<User>;

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<UserRecord>>;

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;
}

/// Product records and their inventory counters.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Fails with [`StoreError::Conflict`] when the name is already used.
    async fn insert_product(&self, product: NewProduct) -> StoreResult<Product>;

    async fn count_products(&self) -> StoreResult<i64>;

    /// All products, in insertion order.
    async fn list_products(&self) -> StoreResult<Vec<Product>>;

    async fn find_product_by_name(&self, name: &str) -> StoreResult<Option<Product>>;

    async fn find_product_by_id(&self, id: Uuid) -> StoreResult<Option<Product>>;

    /// Atomically applies `change` to the product called `name`.
    ///
    /// The outer error is a storage failure ([`StoreError::NotFound`] when no product has
    /// that name); the inner one is a domain rejection that left the record unchanged.
    async fn change_stock(
        &self,
        name: &str,
        change: StockChange,
    ) -> StoreResult<Result<Product, StockRejection>>;
}

/// Review records. Writes go through the owning product's comment list.
#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// Persists the review and appends its id to the product's comment list as one unit.
    ///
    /// Fails with [`StoreError::NotFound`] (and persists nothing) when the product is absent.
    async fn insert_linked_review(&self, review: NewReview) -> StoreResult<Review>;

    /// Reviews in creation order, optionally restricted to one product.
    async fn list_reviews(&self, product_id: Option<Uuid>) -> StoreResult<Vec<Review>>;

    /// Resolves ids in the given order, skipping ids that do not exist.
    async fn find_reviews(&self, ids: &[Uuid]) -> StoreResult<Vec<Review>>;
}

/// A complete backend.
#[async_trait]
pub trait Store: UserStore + CatalogStore + ReviewStore {
    /// Cheap reachability probe used by the health endpoint.
    async fn ping(&self) -> StoreResult<()>;

    fn backend_name(&self) -> &'static str;
}
