//! HTML views rendered with maud

pub mod books;
pub mod errors;

use maud::{html, Markup, DOCTYPE};

/// Shared page chrome
pub fn layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { "Bookshelf - " (title) }
            }
            body {
                header {
                    nav { a href="/" { "Books" } " | " a href="/book/add" { "Add Book" } }
                }
                main {
                    h1 { (title) }
                    (content)
                }
            }
        }
    }
}
