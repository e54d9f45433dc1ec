//! Registration, login, and request identity.

use crate::crypto::{PasswordHasher, TokenIssuer};
use crate::domain::model::{validate_username, NewUser, User};
use crate::domain::{StorefrontError, StorefrontResult};
use crate::storage::UserStore;
use std::sync::Arc;
use tracing::{debug, error, info};

/// The one message every failed login gets, whichever check failed.
pub const INVALID_CREDENTIALS: &str = "invalid credentials";

pub struct AuthService {
    users: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    tokens: TokenIssuer,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, hasher: PasswordHasher, tokens: TokenIssuer) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    /// Creates a user holding only an Argon2 hash of `password`.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        password_confirmation: &str,
    ) -> StorefrontResult<User> {
        if password != password_confirmation {
            return Err(StorefrontError::validation("make sure the passwords match"));
        }
        validate_username(username).map_err(StorefrontError::Validation)?;

        let hasher = self.hasher.clone();
        let password = password.to_string();
        let password_hash = run_blocking(move || hasher.hash(&password))
            .await?
            .map_err(|e| {
                error!(error = %e, "password hashing failed");
                StorefrontError::validation("could not register user")
            })?;

        let user = self
            .users
            .insert_user(NewUser {
                username: username.to_string(),
                password_hash,
            })
            .await?;
        info!(user_id = %user.id, username = %user.username, "user registered");
        Ok(user)
    }

    /// Returns a signed token for valid credentials.
    ///
    /// An unknown username and a wrong password fail identically and take comparable time.
    pub async fn login(&self, username: &str, password: &str) -> StorefrontResult<String> {
        let record = self.users.find_user_by_username(username).await?;

        let hasher = self.hasher.clone();
        let password = password.to_string();
        let user = run_blocking(move || match record {
            Some(record) if hasher.verify(&password, &record.password_hash) => Some(record.user),
            Some(_) => None,
            None => {
                hasher.verify_absent(&password);
                None
            }
        })
        .await?;

        let Some(user) = user else {
            debug!("login rejected");
            return Err(StorefrontError::auth(INVALID_CREDENTIALS));
        };

        let token = self.tokens.issue(user.id, &user.username).map_err(|e| {
            error!(error = %e, "token signing failed");
            StorefrontError::auth(INVALID_CREDENTIALS)
        })?;
        info!(user_id = %user.id, "user logged in");
        Ok(token)
    }

    /// Resolves the caller behind a bearer token. Any failure means an anonymous caller.
    pub async fn resolve_current_user(&self, token: Option<&str>) -> Option<User> {
        let claims = match self.tokens.verify(token?) {
            Ok(claims) => claims,
            Err(e) => {
                debug!(error = %e, "ignoring invalid bearer token");
                return None;
            }
        };
        match self.users.find_user_by_id(claims.sub).await {
            Ok(user) => user,
            Err(e) => {
                error!(error = %e, "could not resolve token owner");
                None
            }
        }
    }
}

async fn run_blocking<T, F>(f: F) -> StorefrontResult<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        error!(error = %e, "blocking credential task failed");
        StorefrontError::validation("credential check could not complete")
    })
}
