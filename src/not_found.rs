//! The response for requests to routes that do not exist.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::envelope::Envelope;

/// A route handler for any route that does not match a known endpoint.
pub async fn get_404_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Envelope::failure("Route not found", None),
    )
        .into_response()
}
