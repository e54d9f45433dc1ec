//! Domain error kinds surfaced to API callers.

use thiserror::Error;

/// The three failure kinds every storefront operation can report.
///
/// Messages are safe to show to clients: they never carry storage detail,
/// password material or tokens.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorefrontError {
    /// Bad caller input (quantity sign, password mismatch, malformed grade, taken name...).
    #[error("{0}")]
    Validation(String),

    /// A credential check failed.
    #[error("{0}")]
    Auth(String),

    /// A referenced entity does not exist.
    #[error("{0}")]
    NotFound(String),
}

impl StorefrontError {
    pub fn validation(msg: impl Into<String>) -> Self {
        StorefrontError::Validation(msg.into())
    }

    pub fn auth(msg: impl Into<String>) -> Self {
        StorefrontError::Auth(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        StorefrontError::NotFound(msg.into())
    }

    /// Machine-readable code placed in GraphQL error extensions.
    pub fn code(&self) -> &'static str {
        match self {
            StorefrontError::Validation(_) => "BAD_USER_INPUT",
            StorefrontError::Auth(_) => "UNAUTHENTICATED",
            StorefrontError::NotFound(_) => "NOT_FOUND",
        }
    }
}

pub type StorefrontResult<T> = Result<T, StorefrontError>;
