//! Shared helpers for the diesel adapters.

use diesel::result::{DatabaseErrorKind, Error as DieselError};

use crate::domain::ports::StoreError;

/// Map Diesel errors onto the store taxonomy. Serialization conflicts and
/// dropped connections are transient (the retry policy re-runs them);
/// unique-index failures get their own variant so handlers can surface a
/// conflict.
pub(super) fn map_diesel_error(error: DieselError) -> StoreError {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            StoreError::unique_violation(info.message().to_owned())
        }
        DieselError::DatabaseError(DatabaseErrorKind::SerializationFailure, info) => {
            StoreError::transient(info.message().to_owned())
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            StoreError::transient(info.message().to_owned())
        }
        DieselError::DatabaseError(_, info) => StoreError::query(info.message().to_owned()),
        other => StoreError::query(other.to_string()),
    }
}

/// Case-insensitive substring pattern with LIKE metacharacters escaped so
/// user input cannot widen the match.
pub(super) fn like_pattern(search: &str) -> String {
    let escaped = search
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// Cast a page offset or limit for Diesel's i64 APIs.
pub(super) fn to_i64(value: u64, what: &str) -> Result<i64, StoreError> {
    i64::try_from(value).map_err(|_| StoreError::query(format!("{what} out of range")))
}
