//! Signed bearer tokens (HS256 JWT).

use crate::crypto::CryptoError;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Token payload: the user's id and username, nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: Uuid,
    pub username: String,
    pub iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

/// Issues and verifies tokens with one shared secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Option<Duration>,
}

impl TokenIssuer {
    /// `ttl` of `None` issues tokens without an expiry.
    pub fn new(secret: &[u8], ttl: Option<Duration>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        if ttl.is_none() {
            validation.required_spec_claims.clear();
            validation.validate_exp = false;
        }
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    pub fn issue(&self, user_id: Uuid, username: &str) -> Result<String, CryptoError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            username: username.to_string(),
            iat: now.timestamp(),
            exp: self.ttl.map(|ttl| (now + ttl).timestamp()),
        };
        Ok(encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.encoding_key,
        )?)
    }

    /// Checks signature (and expiry, when tokens carry one) and returns the claims.
    pub fn verify(&self, token: &str) -> Result<Claims, CryptoError> {
        Ok(decode::<Claims>(token, &self.decoding_key, &self.validation)?.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_round_trips_identity() {
        let issuer = TokenIssuer::new(b"0123456789abcdef", None);
        let id = Uuid::new_v4();
        let token = issuer.issue(id, "alice").unwrap();
        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.exp, None);
    }

    #[test]
    fn token_from_another_secret_is_rejected() {
        let ours = TokenIssuer::new(b"0123456789abcdef", None);
        let theirs = TokenIssuer::new(b"fedcba9876543210", None);
        let token = theirs.issue(Uuid::new_v4(), "mallory").unwrap();
        assert!(ours.verify(&token).is_err());
        assert!(ours.verify("not.a.token").is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        // Well past the default 60s leeway.
        let issuer = TokenIssuer::new(b"0123456789abcdef", Some(Duration::seconds(-600)));
        let token = issuer.issue(Uuid::new_v4(), "bob").unwrap();
        assert!(issuer.verify(&token).is_err());
    }

    #[test]
    fn token_with_ttl_carries_expiry() {
        let issuer = TokenIssuer::new(b"0123456789abcdef", Some(Duration::hours(1)));
        let token = issuer.issue(Uuid::new_v4(), "bob").unwrap();
        let claims = issuer.verify(&token).unwrap();
        assert!(claims.exp.unwrap() > claims.iat);
    }
}
