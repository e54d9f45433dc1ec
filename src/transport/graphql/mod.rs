//! GraphQL adapter over the capability services.

pub mod errors;
pub mod objects;
pub mod schema;

pub use schema::{build_schema, CurrentUser, MutationRoot, QueryRoot, StorefrontSchema};
