//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/Expense/{id}', use [format_endpoint].

/// The route to create an expense.
pub const EXPENSES: &str = "/Expense";
/// The route to list a user's expenses (GET), or to replace (PUT) or delete
/// (DELETE) a single expense.
///
/// For listing, the parameter is the ID of the user, otherwise it is the ID
/// of the expense.
pub const EXPENSE: &str = "/Expense/{id}";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// # Examples
///
/// ```
/// use pocket_passbook::endpoints::{EXPENSE, format_endpoint};
///
/// assert_eq!(format_endpoint(EXPENSE, "u1"), "/Expense/u1");
/// ```
pub fn format_endpoint(endpoint_path: &str, id: &str) -> String {
    match (endpoint_path.find('{'), endpoint_path.find('}')) {
        (Some(start), Some(end)) if start < end => {
            format!("{}{id}{}", &endpoint_path[..start], &endpoint_path[end + 1..])
        }
        _ => endpoint_path.to_owned(),
    }
}
