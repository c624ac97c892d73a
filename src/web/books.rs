//! Book pages and form submissions

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::WithRejection;
use maud::Markup;

use super::extract::{BookId, CsrfToken, VerifiedForm};
use crate::{
    error::{AppError, AppResult},
    models::book::{BookForm, DeleteForm},
    validation::ValidationErrors,
    views::{self, books::BookFormPage},
    AppState,
};

fn add_page(values: &BookForm, errors: Option<&ValidationErrors>, token: &str) -> Markup {
    views::books::form(&BookFormPage {
        title: "Add Book",
        action: "/book/add".to_string(),
        submit_label: "Add Book",
        values,
        errors,
        csrf_token: token,
    })
}

fn edit_page(
    id: i32,
    values: &BookForm,
    errors: Option<&ValidationErrors>,
    token: &str,
) -> Markup {
    views::books::form(&BookFormPage {
        title: "Edit Book",
        action: format!("/book/edit/{}", id),
        submit_label: "Update Book",
        values,
        errors,
        csrf_token: token,
    })
}

/// GET / - all books by title
pub async fn list_books(State(state): State<AppState>) -> AppResult<Markup> {
    let books = state.services.books.list().await?;
    Ok(views::books::list(&books))
}

/// GET /book/add
pub async fn add_book_form(CsrfToken(token): CsrfToken) -> Markup {
    add_page(&BookForm::default(), None, &token)
}

/// POST /book/add
pub async fn add_book(
    State(state): State<AppState>,
    CsrfToken(token): CsrfToken,
    VerifiedForm(form): VerifiedForm<BookForm>,
) -> AppResult<Response> {
    match state.services.books.create(&form).await {
        Ok(_) => Ok(Redirect::to("/").into_response()),
        Err(AppError::Validation(errors)) => {
            Ok(add_page(&form, Some(&errors), &token).into_response())
        }
        Err(e) => Err(e),
    }
}

/// GET /book/edit/:id
pub async fn edit_book_form(
    State(state): State<AppState>,
    WithRejection(Path(id), _): BookId,
    CsrfToken(token): CsrfToken,
) -> AppResult<Markup> {
    let book = state.services.books.get_by_id(id).await?;
    Ok(edit_page(id, &BookForm::from(&book), None, &token))
}

/// POST /book/edit/:id
pub async fn edit_book(
    State(state): State<AppState>,
    WithRejection(Path(id), _): BookId,
    CsrfToken(token): CsrfToken,
    VerifiedForm(form): VerifiedForm<BookForm>,
) -> AppResult<Response> {
    match state.services.books.update(id, &form).await {
        Ok(_) => Ok(Redirect::to("/").into_response()),
        Err(AppError::Validation(errors)) => {
            Ok(edit_page(id, &form, Some(&errors), &token).into_response())
        }
        Err(e) => Err(e),
    }
}

/// GET /book/delete/:id
pub async fn delete_book_form(
    State(state): State<AppState>,
    WithRejection(Path(id), _): BookId,
    CsrfToken(token): CsrfToken,
) -> AppResult<Markup> {
    let book = state.services.books.get_by_id(id).await?;
    Ok(views::books::delete_confirm(&book, &token))
}

/// POST /book/delete/:id
pub async fn delete_book(
    State(state): State<AppState>,
    WithRejection(Path(id), _): BookId,
    VerifiedForm(_): VerifiedForm<DeleteForm>,
) -> AppResult<Redirect> {
    state.services.books.delete(id).await?;
    Ok(Redirect::to("/"))
}
