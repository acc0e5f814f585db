//! Port for bearer-token verification.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::actor::Actor;

define_port_error! {
    /// Errors raised when a presented token cannot be accepted.
    pub enum TokenVerifierError {
        /// Signature, expiry, or claim validation failed.
        Invalid { message: String } => "invalid bearer token: {message}",
    }
}

/// Verifies a bearer token and derives the acting identity from its claims.
///
/// Token issuance belongs to the identity provider; this port only checks
/// what it is handed and maps the subject and group claims onto an
/// [`Actor`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Validate the raw token and return the actor it represents.
    async fn verify(&self, token: &str) -> Result<Actor, TokenVerifierError>;
}

/// Fixture verifier that accepts any token as a fixed actor.
#[derive(Debug, Clone)]
pub struct FixtureTokenVerifier {
    actor: Actor,
}

impl FixtureTokenVerifier {
    /// Verifier that resolves every token to the given actor.
    #[must_use]
    pub fn resolving_to(actor: Actor) -> Self {
        Self { actor }
    }
}

impl Default for FixtureTokenVerifier {
    fn default() -> Self {
        Self::resolving_to(Actor::user("fixture-user"))
    }
}

#[async_trait]
impl TokenVerifier for FixtureTokenVerifier {
    async fn verify(&self, _token: &str) -> Result<Actor, TokenVerifierError> {
        Ok(self.actor.clone())
    }
}
