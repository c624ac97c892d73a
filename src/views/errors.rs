//! Not-found and generic error pages

use maud::{html, Markup};

use super::layout;

pub fn page_not_found() -> Markup {
    layout(
        "Page Not Found",
        html! {
            p { "Sorry, the requested page couldn't be found." }
            p { a href="/" { "Back to the book list" } }
        },
    )
}

/// `detail` is `None` in production
pub fn server_error(message: &str, detail: Option<&str>) -> Markup {
    layout(
        "Server Error",
        html! {
            p { (message) }
            @if let Some(detail) = detail {
                pre.detail { (detail) }
            }
            p { a href="/" { "Back to the book list" } }
        },
    )
}
