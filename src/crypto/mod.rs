pub mod error;
pub mod password;
pub mod token;

pub use error::CryptoError;
pub use password::{HashCost, PasswordHasher};
pub use token::{Claims, TokenIssuer};
