//! Use-case dispatch pipeline.
//!
//! Every command and query flows through the same fixed-order behaviors:
//! logging, then validation, then (for mutating requests only) a
//! transaction around the handler. Handlers never manage transactions or
//! validation themselves.

use async_trait::async_trait;

use super::error::{Error, FieldViolation};
use super::ports::UnitOfWork;

/// A use-case request.
///
/// `MUTATING` is an explicit capability tag: the transaction behavior keys
/// off it, so a request that writes must declare it regardless of how the
/// type is named.
pub trait Request: std::fmt::Debug + Send {
    /// What a successful dispatch yields.
    type Output: Send;

    /// Name used in structured log records.
    const NAME: &'static str;

    /// Whether the handler writes through the store session.
    const MUTATING: bool;

    /// Collect every field violation; empty means valid. Not fail-fast:
    /// callers get all problems in one response.
    fn validate(&self) -> Vec<FieldViolation> {
        Vec::new()
    }
}

/// Handles one request type.
#[async_trait]
pub trait Handler<R: Request>: Send + Sync {
    /// Run the use case. Invoked only after validation passed and, for
    /// mutating requests, inside an open transaction.
    async fn handle(&self, request: R) -> Result<R::Output, Error>;
}

/// Dispatch a request through logging, validation, and (when mutating) a
/// transaction on the given unit of work.
pub async fn dispatch<R, H>(
    request: R,
    handler: &H,
    unit_of_work: &dyn UnitOfWork,
) -> Result<R::Output, Error>
where
    R: Request,
    H: Handler<R> + ?Sized,
{
    tracing::info!(request = R::NAME, payload = ?request, "handling request");

    let violations = request.validate();
    if !violations.is_empty() {
        let error = Error::validation(violations);
        tracing::warn!(request = R::NAME, error = %error, "request rejected");
        return Err(error);
    }

    let result = if R::MUTATING {
        transactional(request, handler, unit_of_work).await
    } else {
        handler.handle(request).await
    };

    match &result {
        Ok(_) => tracing::info!(request = R::NAME, "request handled"),
        Err(error) => tracing::warn!(request = R::NAME, error = %error, "request failed"),
    }
    result
}

async fn transactional<R, H>(
    request: R,
    handler: &H,
    unit_of_work: &dyn UnitOfWork,
) -> Result<R::Output, Error>
where
    R: Request,
    H: Handler<R> + ?Sized,
{
    unit_of_work.begin().await.map_err(Error::from)?;
    match handler.handle(request).await {
        Ok(output) => {
            unit_of_work.commit().await.map_err(Error::from)?;
            Ok(output)
        }
        Err(error) => {
            if let Err(rollback_error) = unit_of_work.rollback().await {
                tracing::error!(
                    request = R::NAME,
                    error = %rollback_error,
                    "rollback failed after handler error"
                );
            }
            Err(error)
        }
    }
}
