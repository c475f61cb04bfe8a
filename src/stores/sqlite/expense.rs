//! Implements a SQLite backed expense store.
//!
//! Each expense is stored as one row of the `expense` table, with the columns
//! named after the fields of the expense document.
use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{Connection, Row, Transaction, params, params_from_iter, types::Value};

use crate::{
    Error,
    expense::{Expense, ExpenseData, ExpenseId, ExpenseQuery},
    stores::{CommitGate, ExpenseStore, RowsAffected},
};

/// Stores expenses in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteExpenseStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteExpenseStore {
    /// Create a new store for the SQLite `connection`.
    ///
    /// The expense table must already exist, see [create_expense_table].
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|error| {
            tracing::error!("could not acquire the database lock: {error}");
            Error::Storage("could not acquire the database lock".to_owned())
        })
    }
}

/// Commit `transaction` if `gate` allows it, otherwise roll it back.
///
/// # Errors
/// Returns an [Error::Storage] if the write was abandoned or the commit failed.
fn commit_unless_abandoned(transaction: Transaction, gate: &CommitGate) -> Result<(), Error> {
    if !gate.try_commit() {
        tracing::warn!("rolling back a write that its caller abandoned");
        transaction.rollback()?;
        return Err(Error::Storage(
            "the write was abandoned before it could be committed".to_owned(),
        ));
    }

    transaction.commit()?;

    Ok(())
}

impl ExpenseStore for SQLiteExpenseStore {
    /// Insert `data` as a new expense with a freshly generated ID.
    ///
    /// # Errors
    /// This function will return an [Error::Storage] if there is an SQL error
    /// or the write was abandoned.
    fn create(&self, data: ExpenseData, gate: &CommitGate) -> Result<ExpenseId, Error> {
        let id = ExpenseId::new();

        let mut connection = self.lock()?;
        let transaction = connection.transaction()?;
        transaction.execute(
            "INSERT INTO expense (_id, amt, category, subcategory, description, ts, user_id, cashback)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                id,
                data.amount,
                data.category,
                data.subcategory,
                data.description,
                data.timestamp,
                data.user_id,
                data.cashback,
            ],
        )?;
        commit_unless_abandoned(transaction, gate)?;

        Ok(id)
    }

    /// Query for the expenses of a user.
    ///
    /// Expenses are sorted by timestamp with the newest first, and then by
    /// insertion order so that ties are listed in a stable order.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::Decoding] if a row cannot be mapped to an [Expense],
    /// - or [Error::Storage] if there is some other SQL error.
    fn find(&self, query: &ExpenseQuery) -> Result<Vec<Expense>, Error> {
        let mut where_clause_parts = vec!["user_id = ?1".to_owned()];
        let mut query_parameters = vec![Value::Text(query.user_id.clone())];

        if let Some(from) = query.from {
            query_parameters.push(Value::Integer(from));
            where_clause_parts.push(format!("ts >= ?{}", query_parameters.len()));
        }

        if let Some(to) = query.to {
            query_parameters.push(Value::Integer(to));
            where_clause_parts.push(format!("ts <= ?{}", query_parameters.len()));
        }

        if let Some(category) = query.category {
            query_parameters.push(Value::Integer(category));
            where_clause_parts.push(format!("category = ?{}", query_parameters.len()));
        }

        let query_string = format!(
            "SELECT _id, amt, category, subcategory, description, ts, user_id, cashback \
            FROM expense \
            WHERE {} \
            ORDER BY ts DESC, rowid ASC",
            where_clause_parts.join(" AND ")
        );

        self.lock()?
            .prepare(&query_string)?
            .query_map(params_from_iter(query_parameters.iter()), map_expense_row)?
            .map(|maybe_expense| maybe_expense.map_err(Error::from))
            .collect()
    }

    /// Overwrite every column of the expense `id`, leaving the ID untouched.
    ///
    /// # Errors
    /// This function will return an [Error::Storage] if there is an SQL error
    /// or the write was abandoned.
    fn replace(
        &self,
        id: ExpenseId,
        data: ExpenseData,
        gate: &CommitGate,
    ) -> Result<RowsAffected, Error> {
        let mut connection = self.lock()?;
        let transaction = connection.transaction()?;
        let rows_affected = transaction.execute(
            "UPDATE expense \
            SET \
                amt = ?1, \
                category = ?2, \
                subcategory = ?3, \
                description = ?4, \
                ts = ?5, \
                user_id = ?6, \
                cashback = ?7 \
            WHERE _id = ?8",
            params![
                data.amount,
                data.category,
                data.subcategory,
                data.description,
                data.timestamp,
                data.user_id,
                data.cashback,
                id,
            ],
        )?;
        commit_unless_abandoned(transaction, gate)?;

        Ok(rows_affected)
    }

    /// Delete the expense `id`.
    ///
    /// # Errors
    /// This function will return an [Error::Storage] if there is an SQL error
    /// or the write was abandoned.
    fn delete(&self, id: ExpenseId, gate: &CommitGate) -> Result<RowsAffected, Error> {
        let mut connection = self.lock()?;
        let transaction = connection.transaction()?;
        let rows_affected = transaction.execute("DELETE FROM expense WHERE _id = ?1", [id])?;
        commit_unless_abandoned(transaction, gate)?;

        Ok(rows_affected)
    }
}

/// Create the expense table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS expense (
                _id TEXT PRIMARY KEY NOT NULL,
                amt REAL NOT NULL,
                category INTEGER NOT NULL,
                subcategory TEXT,
                description TEXT,
                ts INTEGER NOT NULL,
                user_id TEXT NOT NULL,
                cashback INTEGER
                )",
        (),
    )?;

    // Every listing filters on the owner and sorts by timestamp.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_expense_user_ts ON expense(user_id, ts);",
        (),
    )?;

    Ok(())
}

/// Map a database row to an [Expense].
pub fn map_expense_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    let id = row.get(0)?;
    let amount = row.get(1)?;
    let category = row.get(2)?;
    let subcategory = row.get(3)?;
    let description = row.get(4)?;
    let timestamp = row.get(5)?;
    let user_id = row.get(6)?;
    let cashback = row.get(7)?;

    Ok(Expense {
        id,
        amount,
        category,
        subcategory,
        description,
        timestamp,
        user_id,
        cashback,
    })
}
