//! Construction of expense queries from the list endpoint's query parameters.

use serde::Deserialize;

use crate::Error;

/// The raw query parameters of the list endpoint.
///
/// The values are kept as strings so that a malformed value is reported as
/// [Error::InvalidQuery] naming the parameter rather than a generic rejection.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ListParams {
    /// The earliest timestamp to include, in milliseconds since the Unix epoch.
    pub from: Option<String>,
    /// The latest timestamp to include, in milliseconds since the Unix epoch.
    pub to: Option<String>,
    /// Only include expenses with this category code.
    pub category: Option<String>,
}

/// Defines which expenses the store should return.
///
/// Results are always sorted by timestamp, newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseQuery {
    /// Only expenses owned by this user are returned.
    pub user_id: String,
    /// Include expenses with a timestamp no earlier than this (inclusive).
    pub from: Option<i64>,
    /// Include expenses with a timestamp no later than this (inclusive).
    pub to: Option<i64>,
    /// Only include expenses in this category.
    pub category: Option<i64>,
}

impl ExpenseQuery {
    /// A query for all of the expenses owned by `user_id`.
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            from: None,
            to: None,
            category: None,
        }
    }

    /// Build a query for the expenses owned by `user_id` filtered by `params`.
    ///
    /// Empty parameters are treated as if they were not given.
    ///
    /// # Errors
    /// Returns [Error::InvalidQuery] naming the first of `from`, `to` and
    /// `category` that is not an integer.
    pub fn from_params(user_id: impl Into<String>, params: &ListParams) -> Result<Self, Error> {
        Ok(Self {
            user_id: user_id.into(),
            from: parse_integer_param("from", params.from.as_deref())?,
            to: parse_integer_param("to", params.to.as_deref())?,
            category: parse_integer_param("category", params.category.as_deref())?,
        })
    }
}

fn parse_integer_param(parameter: &'static str, value: Option<&str>) -> Result<Option<i64>, Error> {
    match value {
        None | Some("") => Ok(None),
        Some(text) => text
            .parse()
            .map(Some)
            .map_err(|error: std::num::ParseIntError| Error::InvalidQuery {
                parameter,
                reason: format!("\"{text}\" is not an integer: {error}"),
            }),
    }
}
