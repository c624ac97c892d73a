//! Error types for Bookshelf server

use axum::{
    extract::rejection::{FormRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{csrf::CsrfError, validation::ValidationErrors};

/// Postgres SQLSTATE codes treated as storage-level constraint violations
const CONSTRAINT_SQLSTATES: &[&str] = &[
    "22001", // string_data_right_truncation
    "22008", // datetime_field_overflow
    "22021", // character_not_in_repertoire (NUL in text)
    "23502", // not_null_violation
    "23514", // check_violation
];

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(ValidationErrors),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("CSRF check failed: {0}")]
    CsrfRejected(#[from] CsrfError),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

fn is_constraint_sqlstate(code: &str) -> bool {
    CONSTRAINT_SQLSTATES.contains(&code)
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db) = err {
            if db.code().is_some_and(|code| is_constraint_sqlstate(&code)) {
                return AppError::ConstraintViolation(db.message().to_string());
            }
        }
        AppError::Database(err)
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(errors)
    }
}

impl From<FormRejection> for AppError {
    fn from(rejection: FormRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    // `/book/edit/abc` addresses no book
    fn from(rejection: PathRejection) -> Self {
        AppError::NotFound(rejection.body_text())
    }
}

/// Which page the error pipeline renders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPage {
    NotFound,
    Error,
}

/// Classified failure, attached to the response for the error pipeline.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub page: ErrorPage,
    pub status: StatusCode,
    /// Safe to show in any environment
    pub public_message: &'static str,
    /// Only shown outside production
    pub detail: String,
}

impl AppError {
    /// Single dispatch from error kind to response strategy
    pub fn report(&self) -> ErrorReport {
        let (page, status, public_message) = match self {
            AppError::NotFound(_) => (
                ErrorPage::NotFound,
                StatusCode::NOT_FOUND,
                "The requested page couldn't be found.",
            ),
            AppError::CsrfRejected(_) => (
                ErrorPage::Error,
                StatusCode::FORBIDDEN,
                "The form has expired or was not submitted from this site. Please try again.",
            ),
            AppError::BadRequest(_) => (
                ErrorPage::Error,
                StatusCode::BAD_REQUEST,
                "The submitted form could not be read.",
            ),
            AppError::Validation(_) => (
                ErrorPage::Error,
                StatusCode::UNPROCESSABLE_ENTITY,
                "The submitted values are invalid.",
            ),
            AppError::ConstraintViolation(_) | AppError::Database(_) | AppError::Internal(_) => (
                ErrorPage::Error,
                StatusCode::INTERNAL_SERVER_ERROR,
                "Something went wrong on our side.",
            ),
        };

        ErrorReport {
            page,
            status,
            public_message,
            detail: self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let report = self.report();

        match &self {
            AppError::NotFound(msg) => tracing::debug!("Not found: {}", msg),
            AppError::CsrfRejected(e) => tracing::warn!("Rejected form submission: {}", e),
            AppError::BadRequest(msg) => tracing::warn!("Bad request: {}", msg),
            AppError::Validation(e) => tracing::debug!("Unhandled validation failure: {}", e),
            AppError::ConstraintViolation(msg) => {
                tracing::error!("Storage rejected validated data: {}", msg)
            }
            AppError::Database(e) => tracing::error!("Database error: {:?}", e),
            AppError::Internal(msg) => tracing::error!("Internal error: {}", msg),
        }

        // Plain-text body; `web::pipeline` swaps in the HTML page.
        let mut response = (report.status, report.public_message).into_response();
        response.extensions_mut().insert(report);
        response
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
