//! Contains traits and implementations for objects that store [expenses](crate::Expense).

mod commit_gate;
mod expense;

pub mod sqlite;

pub use commit_gate::CommitGate;
pub use expense::{ExpenseStore, RowsAffected};
