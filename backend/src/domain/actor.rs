//! The authenticated caller on whose behalf a request runs.

use serde::{Deserialize, Serialize};

use super::project::UserId;

/// Identity and role of the authenticated caller, taken from verified token
/// claims. Carried by every command and query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Subject identifier from the token.
    pub user_id: UserId,
    /// Whether the caller belongs to the admin group.
    pub is_admin: bool,
}

impl Actor {
    /// Build an ordinary (non-admin) actor.
    pub fn user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: UserId::new(user_id),
            is_admin: false,
        }
    }

    /// Build an admin actor.
    pub fn admin(user_id: impl Into<String>) -> Self {
        Self {
            user_id: UserId::new(user_id),
            is_admin: true,
        }
    }
}
