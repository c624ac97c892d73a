//! Book model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Book record as persisted in the `books` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub release_date: NaiveDate,
    pub page_count: i32,
    pub publisher: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated field set for a create or a full update.
///
/// Produced only by [`crate::validation::validate`]; the repository takes
/// it as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub release_date: NaiveDate,
    pub page_count: i32,
    pub publisher: String,
}

/// Raw add/edit form submission.
///
/// Every field is optional text so that a partially filled form can be
/// re-rendered exactly as the user typed it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookForm {
    pub title: Option<String>,
    pub author: Option<String>,
    pub release_date: Option<String>,
    pub page_count: Option<String>,
    pub publisher: Option<String>,
    #[serde(rename = "_csrf")]
    pub csrf: Option<String>,
}

impl From<&Book> for BookForm {
    fn from(book: &Book) -> Self {
        Self {
            title: Some(book.title.clone()),
            author: Some(book.author.clone()),
            release_date: Some(book.release_date.format("%Y-%m-%d").to_string()),
            page_count: Some(book.page_count.to_string()),
            publisher: Some(book.publisher.clone()),
            csrf: None,
        }
    }
}

/// Delete confirmation submission: carries nothing but the token
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteForm {
    #[serde(rename = "_csrf")]
    pub csrf: Option<String>,
}
