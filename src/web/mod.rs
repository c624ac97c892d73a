//! HTTP surface: routes, extractors, and middleware

pub mod books;
pub mod extract;
pub mod health;
pub mod pipeline;

use axum::{middleware, routing::get, Router};
use tower_http::{catch_panic::CatchPanicLayer, compression::CompressionLayer, trace::TraceLayer};

use crate::AppState;

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(books::list_books))
        .route("/book/add", get(books::add_book_form).post(books::add_book))
        .route("/book/edit/:id", get(books::edit_book_form).post(books::edit_book))
        .route(
            "/book/delete/:id",
            get(books::delete_book_form).post(books::delete_book),
        )
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .fallback(pipeline::page_not_found)
        // innermost first: panics become errors, errors become pages,
        // every response carries the CSRF secret cookie
        .layer(CatchPanicLayer::custom(pipeline::handle_panic))
        .layer(middleware::from_fn_with_state(state.clone(), pipeline::render_errors))
        .layer(middleware::from_fn_with_state(state.clone(), extract::ensure_csrf_cookie))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
