//! Error pipeline: turns classified failures into HTML pages.

use std::any::Any;

use axum::{
    extract::{Request, State},
    http::Uri,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{
    error::{AppError, ErrorPage, ErrorReport},
    views, AppState,
};

/// Fallback for unmatched routes
pub async fn page_not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}

/// Convert a handler panic into an internal error so it is rendered like any
/// other failure.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    AppError::Internal(format!("handler panicked: {}", detail)).into_response()
}

/// Replace the plain-text body of any error response with its HTML page.
///
/// Outside development the page only carries the public message.
pub async fn render_errors(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let response = next.run(req).await;
    let Some(report) = response.extensions().get::<ErrorReport>().cloned() else {
        return response;
    };

    let production = state.config.server.environment.is_production();
    let page = match report.page {
        ErrorPage::NotFound => views::errors::page_not_found(),
        ErrorPage::Error => views::errors::server_error(
            report.public_message,
            (!production).then_some(report.detail.as_str()),
        ),
    };

    (report.status, page).into_response()
}
