use axum::response::{Html, Response};
use tracing::{debug, instrument};

use crate::errors::{not_found_response, AppError};
use crate::templates::{render_template, ContactsTemplate};

/// Handler for the contacts page
///
/// This function handles GET requests to `/contacts/`.
#[instrument]
pub async fn contacts_handler() -> Result<Html<String>, AppError> {
    render_template(ContactsTemplate)
}

/// Fallback for every path no route matches
pub async fn not_found_handler() -> Response {
    debug!("No route matched");
    not_found_response()
}
