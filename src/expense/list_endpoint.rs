//! Defines the endpoint for listing a user's expenses.

use axum::extract::{
    Path, Query, State,
    rejection::{PathRejection, QueryRejection},
};

use crate::{
    Error,
    envelope::Envelope,
    expense::{Expense, ExpenseService, ListParams},
};

/// A route handler for listing the expenses of the user in the path.
///
/// The optional query parameters `from`, `to` (inclusive timestamp bounds in
/// milliseconds) and `category` narrow down the results. Expenses are listed
/// newest first.
pub async fn list_expenses_endpoint(
    State(service): State<ExpenseService>,
    user_id: Result<Path<String>, PathRejection>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Envelope<Vec<Expense>>, Error> {
    let Path(user_id) = user_id.map_err(|rejection| Error::InvalidQuery {
        parameter: "user_id",
        reason: rejection.body_text(),
    })?;
    let Query(params) = params.map_err(|rejection| Error::InvalidQuery {
        parameter: "query",
        reason: rejection.body_text(),
    })?;

    let expenses = service.list(&user_id, &params).await?;

    Ok(Envelope::with_data("Fetched expenses successfully", expenses))
}
