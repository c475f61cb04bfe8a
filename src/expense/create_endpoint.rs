//! Defines the endpoint for creating a new expense.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::{
    Error,
    envelope::Envelope,
    expense::{ExpensePayload, ExpenseService},
};

/// A route handler for creating a new expense.
///
/// Responds with 201 Created on success. The ID of the new expense is not
/// included in the response, clients should list the user's expenses to find it.
pub async fn create_expense_endpoint(
    State(service): State<ExpenseService>,
    payload: Result<Json<ExpensePayload>, JsonRejection>,
) -> Result<(StatusCode, Envelope), Error> {
    let Json(payload) = payload?;

    service.create(payload).await?;

    Ok((StatusCode::CREATED, Envelope::success("Inserted successfully")))
}
