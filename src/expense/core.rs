//! Defines the core data models for expenses.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Error;

// ============================================================================
// MODELS
// ============================================================================

/// The identifier the store assigns to an expense when it is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(Uuid);

impl ExpenseId {
    /// Generate a fresh, unique identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Whether this is the all-zero identifier, which is never assigned.
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl Default for ExpenseId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for ExpenseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

impl FromStr for ExpenseId {
    type Err = Error;

    /// Parse an ID from a path segment.
    ///
    /// # Errors
    /// Returns [Error::InvalidIdentifier] if `s` is not a UUID.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| Error::InvalidIdentifier(s.to_owned()))
    }
}

impl ToSql for ExpenseId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_string()))
    }
}

impl FromSql for ExpenseId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;

        Uuid::parse_str(text)
            .map(Self)
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// Money that was spent by a user.
///
/// Fields are serialized with the same names as the stored document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// The ID of the expense, assigned once by the store.
    #[serde(rename = "_id")]
    pub id: ExpenseId,
    /// How much was spent, always greater than zero.
    #[serde(rename = "amt")]
    pub amount: f64,
    /// The integer code of the category the expense belongs to.
    pub category: i64,
    /// A refinement of the category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    /// A note about what the money was spent on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// When the expense happened, in milliseconds since the Unix epoch.
    #[serde(rename = "ts")]
    pub timestamp: i64,
    /// The user that owns the expense.
    pub user_id: String,
    /// Cashback earned on the expense.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cashback: Option<i64>,
}

/// The body of a request to create or replace an expense.
///
/// Every field is optional so that missing fields are reported by validation
/// rather than as a parse error. An `_id` in the body is ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpensePayload {
    /// How much was spent.
    #[serde(default, rename = "amt")]
    pub amount: Option<f64>,
    /// The integer code of the category.
    #[serde(default)]
    pub category: Option<i64>,
    /// A refinement of the category.
    #[serde(default)]
    pub subcategory: Option<String>,
    /// A note about the expense.
    #[serde(default)]
    pub description: Option<String>,
    /// When the expense happened, in milliseconds since the Unix epoch.
    #[serde(default, rename = "ts")]
    pub timestamp: Option<i64>,
    /// The user that owns the expense.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Cashback earned on the expense.
    #[serde(default)]
    pub cashback: Option<i64>,
}

/// The fields of an expense that passed validation, everything except the ID.
///
/// To create one, use [ExpensePayload::validate].
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseData {
    /// How much was spent, always greater than zero.
    pub amount: f64,
    /// The integer code of the category.
    pub category: i64,
    /// A refinement of the category.
    pub subcategory: Option<String>,
    /// A note about the expense.
    pub description: Option<String>,
    /// When the expense happened, in milliseconds since the Unix epoch.
    ///
    /// Zero means unset.
    pub timestamp: i64,
    /// The user that owns the expense, never empty.
    pub user_id: String,
    /// Cashback earned on the expense.
    pub cashback: Option<i64>,
}

impl ExpenseData {
    /// Combine the data with the ID the store assigned it.
    pub fn with_id(self, id: ExpenseId) -> Expense {
        Expense {
            id,
            amount: self.amount,
            category: self.category,
            subcategory: self.subcategory,
            description: self.description,
            timestamp: self.timestamp,
            user_id: self.user_id,
            cashback: self.cashback,
        }
    }
}
