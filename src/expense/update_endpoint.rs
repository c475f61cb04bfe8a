//! Defines the endpoint for replacing an existing expense.

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
};

use crate::{
    Error,
    envelope::Envelope,
    expense::{ExpenseId, ExpensePayload, ExpenseService},
};

/// A route handler for replacing every field of the expense in the path.
///
/// This is a full replace, optional fields missing from the body are cleared
/// and a missing timestamp is stored as zero.
pub async fn update_expense_endpoint(
    State(service): State<ExpenseService>,
    expense_id: Result<Path<String>, PathRejection>,
    payload: Result<Json<ExpensePayload>, JsonRejection>,
) -> Result<Envelope, Error> {
    // The ID is checked before the body so a bad ID is always reported as such.
    let Path(expense_id) = expense_id?;
    let expense_id: ExpenseId = expense_id.parse()?;
    let Json(payload) = payload?;

    service.update(expense_id, payload).await?;

    Ok(Envelope::success("Updated successfully"))
}
