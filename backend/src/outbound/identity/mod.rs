//! Bearer-token verification against HMAC-signed JWTs.
//!
//! The identity provider issues the tokens; this adapter only validates
//! signature and expiry, then maps the `sub` and `groups` claims onto an
//! [`Actor`]. Membership of the configured admin group grants the admin
//! flag.

use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use crate::domain::ports::{TokenVerifier, TokenVerifierError};
use crate::domain::Actor;

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    #[serde(default)]
    groups: Vec<String>,
    #[expect(dead_code, reason = "expiry is consumed by signature validation")]
    exp: u64,
}

/// HS256 token verifier sharing a secret with the identity provider.
#[derive(Clone)]
pub struct JwtTokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
    admin_group: String,
}

impl JwtTokenVerifier {
    /// Build a verifier over the shared secret and the admin group name.
    #[must_use]
    pub fn new(secret: &str, admin_group: impl Into<String>) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
            admin_group: admin_group.into(),
        }
    }
}

#[async_trait]
impl TokenVerifier for JwtTokenVerifier {
    async fn verify(&self, token: &str) -> Result<Actor, TokenVerifierError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|err| TokenVerifierError::invalid(err.to_string()))?;
        let claims = data.claims;
        if claims.sub.is_empty() {
            return Err(TokenVerifierError::invalid("empty subject claim"));
        }
        let is_admin = claims.groups.iter().any(|group| *group == self.admin_group);
        Ok(if is_admin {
            Actor::admin(claims.sub)
        } else {
            Actor::user(claims.sub)
        })
    }
}
