//! Storefront entities and the invariants they carry.

pub mod product;
pub mod review;
pub mod user;

pub use product::{NewProduct, Product, StockChange, StockRejection};
pub use review::{NewReview, Review, MAX_GRADE, MIN_GRADE};
pub use user::{validate_username, NewUser, User, UserRecord, MIN_USERNAME_LEN};
