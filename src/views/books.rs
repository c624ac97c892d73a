//! Book list, form, and delete confirmation pages

use maud::{html, Markup};

use super::layout;
use crate::{
    csrf::TOKEN_FIELD,
    models::book::{Book, BookForm},
    validation::ValidationErrors,
};

pub fn list(books: &[Book]) -> Markup {
    layout(
        "Books",
        html! {
            p { a href="/book/add" { "Add Book" } }
            @if books.is_empty() {
                p.empty { "No books yet." }
            } @else {
                table {
                    thead {
                        tr {
                            th { "Title" }
                            th { "Author" }
                            th { "Release Date" }
                            th { "Page Count" }
                            th { "Publisher" }
                            th {}
                        }
                    }
                    tbody {
                        @for book in books {
                            tr {
                                td { (book.title) }
                                td { (book.author) }
                                td { (book.release_date.format("%Y-%m-%d").to_string()) }
                                td { (book.page_count) }
                                td { (book.publisher) }
                                td {
                                    a href={ "/book/edit/" (book.id) } { "Edit" }
                                    " "
                                    a href={ "/book/delete/" (book.id) } { "Delete" }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}

/// Add and edit share one form; only the heading and target differ
pub struct BookFormPage<'a> {
    pub title: &'a str,
    pub action: String,
    pub submit_label: &'a str,
    pub values: &'a BookForm,
    pub errors: Option<&'a ValidationErrors>,
    pub csrf_token: &'a str,
}

pub fn form(page: &BookFormPage<'_>) -> Markup {
    let value = |v: &Option<String>| v.clone().unwrap_or_default();

    layout(
        page.title,
        html! {
            @if let Some(errors) = page.errors {
                div.errors {
                    p { "The following errors occurred:" }
                    ul {
                        @for message in errors.messages() {
                            li { (message) }
                        }
                    }
                }
            }
            form method="post" action=(page.action) {
                input type="hidden" name=(TOKEN_FIELD) value=(page.csrf_token);
                div {
                    label for="title" { "Title" }
                    input id="title" type="text" name="title" value=(value(&page.values.title));
                }
                div {
                    label for="author" { "Author" }
                    input id="author" type="text" name="author" value=(value(&page.values.author));
                }
                div {
                    label for="releaseDate" { "Release Date" }
                    input id="releaseDate" type="date" name="releaseDate" value=(value(&page.values.release_date));
                }
                div {
                    label for="pageCount" { "Page Count" }
                    input id="pageCount" type="number" name="pageCount" value=(value(&page.values.page_count));
                }
                div {
                    label for="publisher" { "Publisher" }
                    input id="publisher" type="text" name="publisher" value=(value(&page.values.publisher));
                }
                div {
                    button type="submit" { (page.submit_label) }
                    " "
                    a href="/" { "Cancel" }
                }
            }
        },
    )
}

pub fn delete_confirm(book: &Book, csrf_token: &str) -> Markup {
    layout(
        "Delete Book",
        html! {
            p {
                "Are you sure you want to delete "
                strong { (book.title) }
                " by " (book.author) "?"
            }
            form method="post" action={ "/book/delete/" (book.id) } {
                input type="hidden" name=(TOKEN_FIELD) value=(csrf_token);
                button type="submit" { "Delete Book" }
                " "
                a href="/" { "Cancel" }
            }
        },
    )
}
