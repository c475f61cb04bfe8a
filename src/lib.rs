//! Pocket Passbook is a backend for tracking personal expenses.
//!
//! This library provides a JSON REST API for creating, listing, replacing and
//! deleting expense records. Every response body is an [Envelope] with a
//! `status` flag, a `message` and, depending on the outcome, an `error` or the
//! requested `data`.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod app_state;
mod db;
pub mod endpoints;
mod envelope;
mod error;
mod expense;
mod logging;
mod not_found;
mod routing;
pub mod stores;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use envelope::Envelope;
pub use error::{Error, FieldViolation};
pub use expense::{
    DEFAULT_STORE_TIMEOUT, Expense, ExpenseData, ExpenseId, ExpensePayload, ExpenseQuery,
    ExpenseService, ListParams, now_millis,
};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
