//! Defines the app level error type and its conversion to JSON envelope responses.
use std::fmt::Display;

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::envelope::Envelope;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request body could not be parsed into an expense payload, e.g.,
    /// invalid JSON or a field with the wrong type.
    #[error("could not parse the request body: {0}")]
    MalformedInput(String),

    /// The request body was parsed, but one or more fields broke a constraint.
    ///
    /// Every offending field is listed, not just the first one found.
    #[error("validation failed: {}", join_violations(.0))]
    Validation(Vec<FieldViolation>),

    /// A query parameter could not be parsed.
    #[error("invalid value for query parameter '{parameter}': {reason}")]
    InvalidQuery {
        /// The name of the query parameter, e.g. "from".
        parameter: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// The identifier in the request path is not a valid expense ID.
    #[error("\"{0}\" is not a valid expense ID")]
    InvalidIdentifier(String),

    /// No expense matched the identifier of an update or delete.
    #[error("the requested expense could not be found")]
    NotFound,

    /// The store could not complete the operation, or did not complete it
    /// before the deadline.
    ///
    /// The string should only be logged for debugging on the server and echoed
    /// in the `error` field of the response envelope.
    #[error("store operation failed: {0}")]
    Storage(String),

    /// A stored document could not be mapped back to an [Expense](crate::Expense).
    #[error("could not decode stored expense: {0}")]
    Decoding(String),
}

/// A single field that failed validation and the reason why.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldViolation {
    /// The wire name of the field, e.g. "amt".
    pub field: &'static str,
    /// A short description of the constraint that was broken.
    pub reason: &'static str,
}

impl Display for FieldViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.field, self.reason)
    }
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(FieldViolation::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::FromSqlConversionFailure(..)
            | rusqlite::Error::InvalidColumnType(..)
            | rusqlite::Error::IntegralValueOutOfRange(..) => {
                tracing::error!("could not decode a stored expense: {}", value);
                Error::Decoding(value.to_string())
            }
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::Storage(error.to_string())
            }
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::MalformedInput(rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::InvalidIdentifier(rejection.body_text())
    }
}

impl Error {
    /// The HTTP status code and envelope message for this error.
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            Error::MalformedInput(_) => {
                (StatusCode::EXPECTATION_FAILED, "Binding failed".to_owned())
            }
            Error::Validation(_) => (
                StatusCode::EXPECTATION_FAILED,
                "Validation failed".to_owned(),
            ),
            Error::InvalidQuery { parameter, .. } => (
                StatusCode::BAD_REQUEST,
                format!("Provided invalid query value for '{parameter}'"),
            ),
            Error::InvalidIdentifier(_) => (
                StatusCode::EXPECTATION_FAILED,
                "Invalid identifier provided".to_owned(),
            ),
            Error::NotFound => (StatusCode::NOT_FOUND, "Document not found".to_owned()),
            Error::Storage(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Storage operation failed".to_owned(),
            ),
            Error::Decoding(_) => (
                StatusCode::EXPECTATION_FAILED,
                "Decoding stored expenses failed".to_owned(),
            ),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status_code, message) = self.status_and_message();

        let envelope = match self {
            // Nothing more to say than the message.
            Error::NotFound => Envelope::failure(message, None),
            error => Envelope::failure(message, Some(error.to_string())),
        };

        (status_code, envelope).into_response()
    }
}
