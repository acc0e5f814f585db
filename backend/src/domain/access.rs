//! Per-entity authorization policy: owner-or-admin.
//!
//! Applied identically across project and task handlers, always after the
//! existence check and before any mutation or data return. Tasks derive
//! their owner from the parent project.

use super::actor::Actor;
use super::error::Error;
use super::project::UserId;

/// Allow when the actor is an admin or owns the resource; otherwise deny
/// with a `Forbidden` error carrying the supplied message.
pub fn ensure_can_access(
    actor: &Actor,
    resource_owner: &UserId,
    denial_message: &str,
) -> Result<(), Error> {
    if actor.is_admin || actor.user_id == *resource_owner {
        Ok(())
    } else {
        Err(Error::forbidden(denial_message))
    }
}
