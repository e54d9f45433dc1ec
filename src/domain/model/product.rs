use serde::Serialize;
use uuid::Uuid;

/// A catalog entry.
///
/// `quantity` and `units_sold` are never negative. `comment_ids` is append-only and
/// refers to reviews weakly: an id that no longer resolves is skipped on read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub quantity: i32,
    pub categories: Vec<String>,
    pub description: Option<String>,
    pub units_sold: i32,
    pub comment_ids: Vec<Uuid>,
}

impl Product {
    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    /// Applies a stock change in place, or leaves the product untouched and says why not.
    pub fn apply(&mut self, change: StockChange) -> Result<(), StockRejection> {
        match change {
            StockChange::Restock(amount) => {
                self.quantity = self
                    .quantity
                    .checked_add(amount)
                    .ok_or(StockRejection::Overflow)?;
            }
            StockChange::Sale(amount) => {
                if amount > self.quantity {
                    return Err(StockRejection::Insufficient {
                        available: self.quantity,
                    });
                }
                let units_sold = self
                    .units_sold
                    .checked_add(amount)
                    .ok_or(StockRejection::Overflow)?;
                self.quantity -= amount;
                self.units_sold = units_sold;
            }
        }
        Ok(())
    }
}

/// Catalog-add payload.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    pub quantity: i32,
    pub categories: Vec<String>,
    pub description: Option<String>,
    pub units_sold: i32,
    pub comment_ids: Vec<Uuid>,
}

impl NewProduct {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Product name cannot be empty".to_string());
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err("Price must be a non-negative number".to_string());
        }
        if self.quantity < 0 {
            return Err("Quantity cannot be negative".to_string());
        }
        if self.units_sold < 0 {
            return Err("Units sold cannot be negative".to_string());
        }
        if self.categories.is_empty() {
            return Err("A product needs at least one category".to_string());
        }
        if self.categories.iter().any(|c| c.trim().is_empty()) {
            return Err("Category names cannot be empty".to_string());
        }
        Ok(())
    }

    pub fn into_product(self, id: Uuid) -> Product {
        Product {
            id,
            name: self.name,
            price: self.price,
            quantity: self.quantity,
            categories: self.categories,
            description: self.description,
            units_sold: self.units_sold,
            comment_ids: self.comment_ids,
        }
    }
}

/// The two inventory transitions. A sale is the only path that grows `units_sold`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockChange {
    Restock(i32),
    Sale(i32),
}

impl StockChange {
    pub fn amount(&self) -> i32 {
        match self {
            StockChange::Restock(amount) | StockChange::Sale(amount) => *amount,
        }
    }
}

/// Why a well-formed stock change could not be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockRejection {
    Insufficient { available: i32 },
    Overflow,
}
