use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error("invalid hash parameters: {0}")]
    Params(String),

    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}
