//! Bearer-token authentication extractor.
//!
//! Handlers take an [`AuthenticatedActor`] argument; extraction reads the
//! `Authorization` header, verifies the token through the configured
//! [`TokenVerifier`], and rejects the request with 401 before the handler
//! runs when the credential is missing or invalid.

use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use tracing::debug;

use crate::domain::{Actor, Error};
use crate::inbound::http::state::HttpState;

const MISSING_TOKEN: &str = "Missing bearer token.";
const INVALID_TOKEN: &str = "Invalid bearer token.";

/// The verified caller, extracted from the `Authorization` header.
#[derive(Debug, Clone)]
pub struct AuthenticatedActor(pub Actor);

impl AuthenticatedActor {
    /// Unwrap into the domain actor.
    #[must_use]
    pub fn into_actor(self) -> Actor {
        self.0
    }
}

fn bearer_token(req: &HttpRequest) -> Result<String, Error> {
    let header = req
        .headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .ok_or_else(|| Error::unauthenticated(MISSING_TOKEN))?;
    let value = header
        .to_str()
        .map_err(|_| Error::unauthenticated(INVALID_TOKEN))?;
    let token = value
        .strip_prefix("Bearer ")
        .ok_or_else(|| Error::unauthenticated(MISSING_TOKEN))?
        .trim();
    if token.is_empty() {
        return Err(Error::unauthenticated(MISSING_TOKEN));
    }
    Ok(token.to_owned())
}

impl FromRequest for AuthenticatedActor {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = bearer_token(req);
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        Box::pin(async move {
            let token = token?;
            let state =
                state.ok_or_else(|| Error::internal("http state missing from app data"))?;
            let actor = state.verifier.verify(&token).await.map_err(|error| {
                debug!(%error, "bearer token rejected");
                Error::unauthenticated(INVALID_TOKEN)
            })?;
            Ok(Self(actor))
        })
    }
}
