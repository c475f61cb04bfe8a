#![allow(missing_docs)]

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::http::StatusCode;
use axum_test::TestServer;
use rusqlite::Connection;
use serde_json::Value;

use crate::{
    AppState, build_router,
    db::initialize,
    endpoints::{self, format_endpoint},
    envelope::Envelope,
    expense::Expense,
    stores::sqlite::SQLiteExpenseStore,
};

const TEST_STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// A server backed by a fresh in-memory database.
pub(crate) fn get_test_server() -> TestServer {
    get_test_server_with_connection().0
}

/// A server backed by a fresh in-memory database, along with the database
/// connection so tests can write rows the API would never produce.
pub(crate) fn get_test_server_with_connection() -> (TestServer, Arc<Mutex<Connection>>) {
    let connection =
        Connection::open_in_memory().expect("Could not open database in memory.");
    initialize(&connection).expect("Could not initialize database.");
    let connection = Arc::new(Mutex::new(connection));

    let state = AppState::with_store(
        Arc::new(SQLiteExpenseStore::new(connection.clone())),
        TEST_STORE_TIMEOUT,
    );
    let server = TestServer::try_new(build_router(state)).expect("Could not create test server.");

    (server, connection)
}

pub(crate) async fn create_expense(server: &TestServer, body: Value) {
    server
        .post(endpoints::EXPENSES)
        .json(&body)
        .await
        .assert_status(StatusCode::CREATED);
}

pub(crate) async fn list_expenses(server: &TestServer, user_id: &str) -> Vec<Expense> {
    let response = server
        .get(&format_endpoint(endpoints::EXPENSE, user_id))
        .await;
    response.assert_status_ok();

    response
        .json::<Envelope<Vec<Expense>>>()
        .data
        .expect("Response should include the listed expenses")
}
