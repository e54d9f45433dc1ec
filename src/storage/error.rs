use thiserror::Error;

/// Storage-level failures. Never shown to API clients as-is.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness or check constraint rejected the write.
    #[error("{0}")]
    Conflict(String),

    /// The record the write depends on does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// A concurrent writer got in the way; the operation may be retried as a whole.
    #[error("concurrent update on {0}")]
    Contended(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Whether retrying the whole operation may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            StoreError::Contended(_) => true,
            StoreError::Database(sqlx::Error::Database(db)) => {
                matches!(db.code().as_deref(), Some("40001") | Some("40P01"))
            }
            StoreError::Database(sqlx::Error::PoolTimedOut) => true,
            _ => false,
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_contention_style_errors_are_transient() {
        assert!(StoreError::Contended("products".into()).is_transient());
        assert!(StoreError::Database(sqlx::Error::PoolTimedOut).is_transient());
        assert!(!StoreError::Conflict("taken".into()).is_transient());
        assert!(!StoreError::NotFound("product".into()).is_transient());
        assert!(!StoreError::Database(sqlx::Error::RowNotFound).is_transient());
    }
}
