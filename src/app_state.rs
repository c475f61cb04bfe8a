//! Implements a struct that holds the state of the REST server.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::{
    Error, db::initialize, expense::ExpenseService, stores::ExpenseStore,
    stores::sqlite::SQLiteExpenseStore,
};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The service that handles every expense request.
    pub expense_service: ExpenseService,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for
    /// the domain models. Every store operation must finish within
    /// `store_timeout`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_connection: Connection, store_timeout: Duration) -> Result<Self, Error> {
        initialize(&db_connection)?;

        let connection = Arc::new(Mutex::new(db_connection));

        Ok(Self::with_store(
            Arc::new(SQLiteExpenseStore::new(connection)),
            store_timeout,
        ))
    }

    /// Create a new [AppState] around an existing `store`.
    pub fn with_store(store: Arc<dyn ExpenseStore>, store_timeout: Duration) -> Self {
        Self {
            expense_service: ExpenseService::new(store, store_timeout),
        }
    }
}

impl FromRef<AppState> for ExpenseService {
    fn from_ref(state: &AppState) -> Self {
        state.expense_service.clone()
    }
}
