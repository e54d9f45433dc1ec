//! Centralized configuration (environment variables + defaults).

use crate::crypto::HashCost;
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use thiserror::Error;

pub const MIN_JWT_SECRET_LEN: usize = 16;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    /// `None` runs the service on the in-memory store.
    pub database: Option<DatabaseConfig>,
    pub bind_addr: SocketAddr,
    pub auth: AuthConfig,
    pub graphql: GraphqlLimits,
}

#[derive(Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The URL may embed a password.
        f.debug_struct("DatabaseConfig")
            .field("url", &"<redacted>")
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// `None` issues tokens that never expire.
    pub token_ttl: Option<chrono::Duration>,
    pub hash_cost: HashCost,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .field("hash_cost", &self.hash_cost)
            .finish()
    }
}

/// Query protection limits applied to the GraphQL schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphqlLimits {
    pub max_depth: usize,
    pub max_complexity: usize,
}

impl Default for GraphqlLimits {
    fn default() -> Self {
        Self {
            max_depth: 10,
            max_complexity: 200,
        }
    }
}

impl Config {
    /// Reads `.env` (if present) and then the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database = match get("DATABASE_URL") {
            Some(url) => Some(DatabaseConfig {
                url,
                max_connections: parse_or(&get, "DATABASE_MAX_CONNECTIONS", 5u32)?.max(1),
            }),
            None => None,
        };

        let jwt_secret = get("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        if jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ConfigError::Invalid {
                key: "JWT_SECRET",
                reason: format!("must be at least {} bytes", MIN_JWT_SECRET_LEN),
            });
        }

        let token_ttl = match get("TOKEN_TTL_SECS") {
            Some(_) => {
                let secs: i64 = parse_or(&get, "TOKEN_TTL_SECS", 0)?;
                if secs <= 0 {
                    return Err(ConfigError::Invalid {
                        key: "TOKEN_TTL_SECS",
                        reason: "must be positive".to_string(),
                    });
                }
                Some(chrono::Duration::seconds(secs))
            }
            None => None,
        };

        let default_cost = HashCost::default();
        let hash_cost = HashCost {
            memory_kib: parse_or(&get, "PASSWORD_HASH_MEMORY_KIB", default_cost.memory_kib)?,
            iterations: parse_or(&get, "PASSWORD_HASH_ITERATIONS", default_cost.iterations)?,
        };

        let default_limits = GraphqlLimits::default();
        Ok(Self {
            database,
            bind_addr: parse_or(&get, "BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 4000)))?,
            auth: AuthConfig {
                jwt_secret,
                token_ttl,
                hash_cost,
            },
            graphql: GraphqlLimits {
                max_depth: parse_or(&get, "GRAPHQL_MAX_DEPTH", default_limits.max_depth)?,
                max_complexity: parse_or(
                    &get,
                    "GRAPHQL_MAX_COMPLEXITY",
                    default_limits.max_complexity,
                )?,
            },
        })
    }
}

fn parse_or<T, G>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
    }
}
