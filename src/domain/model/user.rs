use serde::Serialize;
use std::fmt;
use uuid::Uuid;

pub const MIN_USERNAME_LEN: usize = 3;

/// Outward-facing user. Carries no credential material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
}

/// A user together with its stored password hash.
///
/// Only the auth service and the credential stores handle this type.
#[derive(Clone)]
pub struct UserRecord {
    pub user: User,
    pub password_hash: String,
}

impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("user", &self.user)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

/// Registration payload handed to a credential store.
#[derive(Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
}

impl NewUser {
    pub fn into_record(self, id: Uuid) -> UserRecord {
        UserRecord {
            user: User {
                id,
                username: self.username,
            },
            password_hash: self.password_hash,
        }
    }
}

/// Checks the username constraints shared by every credential store.
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.chars().count() < MIN_USERNAME_LEN {
        return Err(format!(
            "username must be at least {} characters long",
            MIN_USERNAME_LEN
        ));
    }
    Ok(())
}
