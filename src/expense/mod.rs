//! Expense management for the passbook.
//!
//! This module contains everything related to expenses:
//! - The `Expense` model and the `ExpensePayload` request body
//! - Validation of payloads and construction of store queries
//! - The `ExpenseService` that runs requests against a store
//! - The route handlers for creating, listing, updating and deleting expenses

mod core;
mod create_endpoint;
mod delete_endpoint;
mod list_endpoint;
mod query;
mod service;
mod update_endpoint;
mod validation;

pub use core::{Expense, ExpenseData, ExpenseId, ExpensePayload};
pub use create_endpoint::create_expense_endpoint;
pub use delete_endpoint::delete_expense_endpoint;
pub use list_endpoint::list_expenses_endpoint;
pub use query::{ExpenseQuery, ListParams};
pub use service::{DEFAULT_STORE_TIMEOUT, ExpenseService};
pub use update_endpoint::update_expense_endpoint;
pub use validation::now_millis;
