use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::templates::{render_template, NotFoundTemplate};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
    #[error("Page not found")]
    NotFound,
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound => not_found_response(),
            AppError::Database(err) => {
                error!("Database error while serving page: {:#}", err);
                internal_error_response()
            }
            AppError::Template(err) => {
                error!("Template rendering failed: {}", err);
                internal_error_response()
            }
        }
    }
}

/// Renders the 404 page, falling back to plain text if the template breaks
pub fn not_found_response() -> Response {
    match render_template(NotFoundTemplate) {
        Ok(html) => (StatusCode::NOT_FOUND, html).into_response(),
        Err(_) => (StatusCode::NOT_FOUND, "Page not found").into_response(),
    }
}

fn internal_error_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html("<h1>Internal server error</h1>"),
    )
        .into_response()
}
