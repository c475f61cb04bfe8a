//! Defines the endpoint for deleting an expense.

use axum::extract::{Path, State, rejection::PathRejection};

use crate::{
    Error,
    envelope::Envelope,
    expense::{ExpenseId, ExpenseService},
};

/// A route handler for deleting the expense in the path.
pub async fn delete_expense_endpoint(
    State(service): State<ExpenseService>,
    expense_id: Result<Path<String>, PathRejection>,
) -> Result<Envelope, Error> {
    let Path(expense_id) = expense_id?;
    let expense_id: ExpenseId = expense_id.parse()?;

    service.delete(expense_id).await?;

    Ok(Envelope::success("Deleted successfully"))
}
