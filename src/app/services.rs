use crate::app::{AuthService, CatalogService, InventoryService, ReviewService};
use crate::crypto::{CryptoError, PasswordHasher, TokenIssuer};
use crate::infra::config::AuthConfig;
use crate::storage::Store;
use std::sync::Arc;

/// Every capability service, wired to one store backend.
pub struct Services {
    pub auth: AuthService,
    pub inventory: InventoryService,
    pub catalog: CatalogService,
    pub reviews: ReviewService,
    pub store: Arc<dyn Store>,
}

impl Services {
    pub fn new<S: Store + 'static>(
        store: Arc<S>,
        hasher: PasswordHasher,
        tokens: TokenIssuer,
    ) -> Self {
        Self {
            auth: AuthService::new(store.clone(), hasher, tokens),
            inventory: InventoryService::new(store.clone()),
            catalog: CatalogService::new(store.clone(), store.clone()),
            reviews: ReviewService::new(store.clone()),
            store,
        }
    }

    /// Builds the credential primitives from configuration.
    pub fn from_config<S: Store + 'static>(
        store: Arc<S>,
        config: &AuthConfig,
    ) -> Result<Self, CryptoError> {
        let hasher = PasswordHasher::new(config.hash_cost)?;
        let tokens = TokenIssuer::new(config.jwt_secret.as_bytes(), config.token_ttl);
        Ok(Self::new(store, hasher, tokens))
    }
}
