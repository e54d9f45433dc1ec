//! PostgreSQL backend.

use crate::domain::model::{
    NewProduct, NewReview, NewUser, Product, Review, StockChange, StockRejection, User,
    UserRecord,
};
use crate::storage::retry::with_retry;
use crate::storage::schema::{describe_constraint, managed_tables};
use crate::storage::{CatalogStore, ReviewStore, Store, StoreError, StoreResult, UserStore};
use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

const PRODUCT_COLUMNS: &str =
    "id, name, price, quantity, categories, description, units_sold, comment_ids";
const REVIEW_COLUMNS: &str = "id, author, product_id, content, grade, created_at";

/// A store backed by a PostgreSQL connection pool.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects a pool of `max_connections` to `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates every managed table that does not exist yet.
    pub async fn migrate(&self) -> anyhow::Result<()> {
        for table in managed_tables() {
            for statement in table.create_statements() {
                sqlx::query(statement).execute(&self.pool).await?;
            }
            info!(table = table.table_name(), "table ready");
        }
        Ok(())
    }

    async fn try_change_stock(
        &self,
        name: &str,
        change: StockChange,
    ) -> StoreResult<Result<Product, StockRejection>> {
        // The WHERE clause carries the whole precondition, so the row is only touched
        // when the change is valid against its current state.
        let sql = match change {
            StockChange::Restock(_) => format!(
                "UPDATE products SET quantity = quantity + $2
                 WHERE name = $1 AND quantity <= 2147483647 - $2
                 RETURNING {}",
                PRODUCT_COLUMNS
            ),
            StockChange::Sale(_) => format!(
                "UPDATE products SET quantity = quantity - $2, units_sold = units_sold + $2
                 WHERE name = $1 AND quantity >= $2 AND units_sold <= 2147483647 - $2
                 RETURNING {}",
                PRODUCT_COLUMNS
            ),
        };

        let updated = sqlx::query(&sql)
            .bind(name)
            .bind(change.amount())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        if let Some(row) = updated {
            return Ok(Ok(product_from_row(&row)?));
        }

        // Nothing matched: find out why without writing.
        let mut current = self
            .find_product_by_name(name)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("product '{}'", name)))?;
        match current.apply(change) {
            Err(rejection) => Ok(Err(rejection)),
            // The row changed between the update and the read; try again.
            Ok(()) => Err(StoreError::Contended(format!("product '{}'", name))),
        }
    }

    async fn try_insert_linked_review(&self, review: &NewReview) -> StoreResult<Review> {
        let mut tx = self.pool.begin().await?;
        let id = Uuid::new_v4();

        // Link first so a missing product aborts before anything is written.
        let linked = sqlx::query(
            "UPDATE products SET comment_ids = array_append(comment_ids, $1) WHERE id = $2",
        )
        .bind(id)
        .bind(review.product_id)
        .execute(tx.as_mut())
        .await
        .map_err(map_db_error)?;

        if linked.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(StoreError::NotFound(format!("product {}", review.product_id)));
        }

        let row = sqlx::query(&format!(
            "INSERT INTO reviews (id, author, product_id, content, grade)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {}",
            REVIEW_COLUMNS
        ))
        .bind(id)
        .bind(&review.author)
        .bind(review.product_id)
        .bind(&review.content)
        .bind(review.grade)
        .fetch_one(tx.as_mut())
        .await
        .map_err(map_db_error)?;
        let stored = review_from_row(&row)?;

        tx.commit().await.map_err(map_db_error)?;
        Ok(stored)
    }
}

/// Turns constraint violations into [`StoreError::Conflict`]; everything else stays a
/// database error.
fn map_db_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if matches!(db.code().as_deref(), Some("23505") | Some("23514")) {
            return StoreError::Conflict(describe_constraint(db.constraint()));
        }
    }
    StoreError::Database(err)
}

fn product_from_row(row: &PgRow) -> Result<Product, sqlx::Error> {
    Ok(Product {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        price: row.try_get("price")?,
        quantity: row.try_get("quantity")?,
        categories: row.try_get("categories")?,
        description: row.try_get("description")?,
        units_sold: row.try_get("units_sold")?,
        comment_ids: row.try_get("comment_ids")?,
    })
}

fn review_from_row(row: &PgRow) -> Result<Review, sqlx::Error> {
    Ok(Review {
        id: row.try_get("id")?,
        author: row.try_get("author")?,
        product_id: row.try_get("product_id")?,
        content: row.try_get("content")?,
        grade: row.try_get("grade")?,
        created_at: row.try_get("created_at")?,
    })
}

fn user_record_from_row(row: &PgRow) -> Result<UserRecord, sqlx::Error> {
    Ok(UserRecord {
        user: User {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
        },
        password_hash: row.try_get("password_hash")?,
    })
}

#[async_trait]
impl UserStore for PostgresStore {
    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let row = sqlx::query(
            "INSERT INTO users (id, username, password_hash) VALUES ($1, $2, $3)
             RETURNING id, username",
        )
        .bind(Uuid::new_v4())
        .bind(&user.username)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(User {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
        })
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<UserRecord>> {
        let row = sqlx::query("SELECT id, username, password_hash FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(user_record_from_row).transpose()?)
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let row = sqlx::query("SELECT id, username, password_hash FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row
            .as_ref()
            .map(user_record_from_row)
            .transpose()?
            .map(|record| record.user))
    }
}

#[async_trait]
impl CatalogStore for PostgresStore {
    async fn insert_product(&self, product: NewProduct) -> StoreResult<Product> {
        let row = sqlx::query(&format!(
            "INSERT INTO products
                (id, name, price, quantity, categories, description, units_sold, comment_ids)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {}",
            PRODUCT_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(&product.name)
        .bind(product.price)
        .bind(product.quantity)
        .bind(&product.categories)
        .bind(&product.description)
        .bind(product.units_sold)
        .bind(&product.comment_ids)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;
        Ok(product_from_row(&row)?)
    }

    async fn count_products(&self) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM products ORDER BY seq",
            PRODUCT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        let mut products = Vec::with_capacity(rows.len());
        for row in rows {
            products.push(product_from_row(&row)?);
        }
        Ok(products)
    }

    async fn find_product_by_name(&self, name: &str) -> StoreResult<Option<Product>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM products WHERE name = $1",
            PRODUCT_COLUMNS
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(product_from_row).transpose()?)
    }

    async fn find_product_by_id(&self, id: Uuid) -> StoreResult<Option<Product>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM products WHERE id = $1",
            PRODUCT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(product_from_row).transpose()?)
    }

    async fn change_stock(
        &self,
        name: &str,
        change: StockChange,
    ) -> StoreResult<Result<Product, StockRejection>> {
        with_retry("change_stock", || self.try_change_stock(name, change)).await
    }
}

#[async_trait]
impl ReviewStore for PostgresStore {
    async fn insert_linked_review(&self, review: NewReview) -> StoreResult<Review> {
        with_retry("insert_linked_review", || self.try_insert_linked_review(&review)).await
    }

    async fn list_reviews(&self, product_id: Option<Uuid>) -> StoreResult<Vec<Review>> {
        let rows = match product_id {
            Some(id) => {
                sqlx::query(&format!(
                    "SELECT {} FROM reviews WHERE product_id = $1 ORDER BY seq",
                    REVIEW_COLUMNS
                ))
                .bind(id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(&format!("SELECT {} FROM reviews ORDER BY seq", REVIEW_COLUMNS))
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        let mut reviews = Vec::with_capacity(rows.len());
        for row in rows {
            reviews.push(review_from_row(&row)?);
        }
        Ok(reviews)
    }

    async fn find_reviews(&self, ids: &[Uuid]) -> StoreResult<Vec<Review>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        // Keep the caller's order: position in the id array drives the sort.
        let rows = sqlx::query(&format!(
            "SELECT {} FROM reviews r
             JOIN unnest($1::uuid[]) WITH ORDINALITY AS wanted(id, pos) ON r.id = wanted.id
             ORDER BY wanted.pos",
            "r.id, r.author, r.product_id, r.content, r.grade, r.created_at"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        let mut reviews = Vec::with_capacity(rows.len());
        for row in rows {
            reviews.push(review_from_row(&row)?);
        }
        Ok(reviews)
    }
}

#[async_trait]
impl Store for PostgresStore {
    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
