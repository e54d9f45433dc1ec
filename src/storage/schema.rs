//! Table definitions owned by the PostgreSQL backend.

/// Contract for a table the service creates and owns.
pub trait ManagedTable: Send + Sync {
    /// Returns the name of the database table.
    fn table_name(&self) -> &str;

    /// `CREATE ... IF NOT EXISTS` statements for the table and its indexes, in order.
    fn create_statements(&self) -> &[&str];
}

pub struct UsersTable;

impl ManagedTable for UsersTable {
    fn table_name(&self) -> &str {
        "users"
    }

    fn create_statements(&self) -> &[&str] {
        &["CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY,
            username TEXT NOT NULL,
            password_hash TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            CONSTRAINT users_username_key UNIQUE (username),
            CONSTRAINT users_username_length CHECK (char_length(username) >= 3)
        )"]
    }
}

pub struct ProductsTable;

impl ManagedTable for ProductsTable {
    fn table_name(&self) -> &str {
        "products"
    }

    // `seq` preserves insertion order for listings; `id` is the public identifier.
    fn create_statements(&self) -> &[&str] {
        &["CREATE TABLE IF NOT EXISTS products (
            seq BIGSERIAL NOT NULL,
            id UUID PRIMARY KEY,
            name TEXT NOT NULL,
            price DOUBLE PRECISION NOT NULL,
            quantity INTEGER NOT NULL,
            categories TEXT[] NOT NULL,
            description TEXT,
            units_sold INTEGER NOT NULL DEFAULT 0,
            comment_ids UUID[] NOT NULL DEFAULT '{}',
            CONSTRAINT products_name_key UNIQUE (name),
            CONSTRAINT products_price_non_negative CHECK (price >= 0),
            CONSTRAINT products_quantity_non_negative CHECK (quantity >= 0),
            CONSTRAINT products_units_sold_non_negative CHECK (units_sold >= 0),
            CONSTRAINT products_categories_non_empty CHECK (cardinality(categories) > 0)
        )"]
    }
}

pub struct ReviewsTable;

impl ManagedTable for ReviewsTable {
    fn table_name(&self) -> &str {
        "reviews"
    }

    fn create_statements(&self) -> &[&str] {
        &[
            "CREATE TABLE IF NOT EXISTS reviews (
                seq BIGSERIAL NOT NULL,
                id UUID PRIMARY KEY,
                author TEXT NOT NULL,
                product_id UUID NOT NULL REFERENCES products (id),
                content TEXT NOT NULL,
                grade INTEGER,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                CONSTRAINT reviews_grade_range CHECK (grade IS NULL OR grade BETWEEN 1 AND 5)
            )",
            "CREATE INDEX IF NOT EXISTS reviews_product_id_idx ON reviews (product_id)",
        ]
    }
}

/// Tables in creation order (referenced tables first).
pub fn managed_tables() -> Vec<Box<dyn ManagedTable>> {
    vec![
        Box::new(UsersTable),
        Box::new(ProductsTable),
        Box::new(ReviewsTable),
    ]
}

/// Maps a violated constraint to a client-safe explanation.
pub fn describe_constraint(constraint: Option<&str>) -> String {
    match constraint {
        Some("users_username_key") => "Username is already taken".to_string(),
        Some("users_username_length") => "Username must be at least 3 characters long".to_string(),
        Some("products_name_key") => "A product with this name already exists".to_string(),
        Some("products_quantity_non_negative") => "Quantity cannot be negative".to_string(),
        Some("products_units_sold_non_negative") => "Units sold cannot be negative".to_string(),
        Some("products_price_non_negative") => "Price must be a non-negative number".to_string(),
        Some("products_categories_non_empty") => {
            "A product needs at least one category".to_string()
        }
        Some("reviews_grade_range") => "Grade must be between 1 and 5".to_string(),
        _ => "Input violates a storage constraint".to_string(),
    }
}
