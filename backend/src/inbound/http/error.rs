//! Maps domain errors onto the HTTP error envelope.
//!
//! Every failure serialises as `{statusCode, message, errors}` where
//! `errors` carries field violations for validation failures and is empty
//! otherwise. Internal errors are logged with their real message and
//! returned redacted.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::domain::{Error, ErrorCode, FieldViolation};

/// Handler result shorthand; failures render through [`ResponseError`].
pub type ApiResult<T> = Result<T, Error>;

const INTERNAL_MESSAGE: &str = "An unexpected error occurred.";

/// One field violation inside the error envelope.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FieldViolationSchema {
    /// Offending request field.
    pub field: String,
    /// Constraint description.
    pub message: String,
}

impl From<&FieldViolation> for FieldViolationSchema {
    fn from(violation: &FieldViolation) -> Self {
        Self {
            field: violation.field.clone(),
            message: violation.message.clone(),
        }
    }
}

/// JSON error envelope returned for every failed request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorSchema {
    /// HTTP status code, repeated in the body.
    pub status_code: u16,
    /// Human-readable summary.
    pub message: String,
    /// Field violations; empty unless validation failed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldViolationSchema>,
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::ValidationFailed => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthenticated => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = if self.code() == ErrorCode::Internal {
            error!(detail = %self.message(), "internal error returned to client");
            INTERNAL_MESSAGE.to_owned()
        } else {
            self.message().to_owned()
        };
        HttpResponse::build(status).json(ErrorSchema {
            status_code: status.as_u16(),
            message,
            errors: self.violations().iter().map(Into::into).collect(),
        })
    }
}
