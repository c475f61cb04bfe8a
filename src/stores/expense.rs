//! Defines the expense store trait.

use crate::{
    Error,
    expense::{Expense, ExpenseData, ExpenseId, ExpenseQuery},
    stores::CommitGate,
};

/// The number of documents matched or removed by a write.
pub type RowsAffected = usize;

/// Handles the creation, retrieval, replacement and removal of expenses.
///
/// Every method is a single call to the underlying store. Implementations
/// block, so async callers should run them on a blocking thread.
///
/// Writes take a [CommitGate] and must only become visible if
/// [CommitGate::try_commit] returns `true`. Otherwise the write is rolled
/// back and an [Error::Storage] returned.
pub trait ExpenseStore: Send + Sync {
    /// Assign a fresh ID to `data` and persist it.
    fn create(&self, data: ExpenseData, gate: &CommitGate) -> Result<ExpenseId, Error>;

    /// Retrieve the expenses selected by `query`, newest first.
    fn find(&self, query: &ExpenseQuery) -> Result<Vec<Expense>, Error>;

    /// Replace every field of the expense `id` with `data`.
    ///
    /// Returns the number of expenses that matched `id`, zero if there is no
    /// such expense.
    fn replace(
        &self,
        id: ExpenseId,
        data: ExpenseData,
        gate: &CommitGate,
    ) -> Result<RowsAffected, Error>;

    /// Remove the expense `id`.
    ///
    /// Returns the number of expenses removed, zero if there is no such
    /// expense.
    fn delete(&self, id: ExpenseId, gate: &CommitGate) -> Result<RowsAffected, Error>;
}
