//! The uniform JSON body sent in response to every request.

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// The JSON body of every response.
///
/// `error` is only present on failures and `data` only on responses that
/// carry a payload, e.g. the list of expenses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T = ()> {
    /// Whether the request succeeded.
    pub status: bool,
    /// A human readable summary of the outcome.
    pub message: String,
    /// Details of what went wrong.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// The payload of a successful request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl Envelope {
    /// An envelope for a request that succeeded without a payload.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: true,
            message: message.into(),
            error: None,
            data: None,
        }
    }

    /// An envelope for a request that failed.
    pub fn failure(message: impl Into<String>, error: Option<String>) -> Self {
        Self {
            status: false,
            message: message.into(),
            error,
            data: None,
        }
    }
}

impl<T> Envelope<T> {
    /// An envelope for a request that succeeded with `data` as the payload.
    pub fn with_data(message: impl Into<String>, data: T) -> Self {
        Self {
            status: true,
            message: message.into(),
            error: None,
            data: Some(data),
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
