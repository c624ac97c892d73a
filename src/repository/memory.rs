//! In-process book store for development and tests

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::BookRepository;
use crate::{
    error::{AppError, AppResult},
    models::book::{Book, NewBook},
    validation::{AUTHOR_MAX_LEN, PUBLISHER_MAX_LEN, TITLE_MAX_LEN},
};

#[derive(Default)]
struct Table {
    last_id: i32,
    rows: BTreeMap<i32, Book>,
}

/// Mirrors the `books` table, including its column constraints
#[derive(Default)]
pub struct MemoryBookRepository {
    table: RwLock<Table>,
}

impl MemoryBookRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Same rules as the table's `CHECK` and `VARCHAR` limits
fn check_constraints(data: &NewBook) -> AppResult<()> {
    let text_columns = [
        ("title", &data.title, TITLE_MAX_LEN),
        ("author", &data.author, AUTHOR_MAX_LEN),
        ("publisher", &data.publisher, PUBLISHER_MAX_LEN),
    ];
    for (column, value, max) in text_columns {
        if value.is_empty() {
            return Err(AppError::ConstraintViolation(format!(
                "books.{} must not be empty",
                column
            )));
        }
        if value.chars().count() as u64 > max {
            return Err(AppError::ConstraintViolation(format!(
                "books.{} exceeds {} characters",
                column, max
            )));
        }
    }
    if data.page_count < 0 {
        return Err(AppError::ConstraintViolation(
            "books.page_count must be >= 0".to_string(),
        ));
    }
    Ok(())
}

#[async_trait]
impl BookRepository for MemoryBookRepository {
    async fn list(&self) -> AppResult<Vec<Book>> {
        let table = self.table.read().await;
        let mut books: Vec<Book> = table.rows.values().cloned().collect();
        books.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        Ok(books)
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        self.table
            .read()
            .await
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }

    async fn create(&self, data: &NewBook) -> AppResult<Book> {
        check_constraints(data)?;

        let mut table = self.table.write().await;
        table.last_id += 1;
        let now = Utc::now();
        let book = Book {
            id: table.last_id,
            title: data.title.clone(),
            author: data.author.clone(),
            release_date: data.release_date,
            page_count: data.page_count,
            publisher: data.publisher.clone(),
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(book.id, book.clone());

        tracing::info!(book_id = book.id, "Created book");
        Ok(book)
    }

    async fn update(&self, id: i32, data: &NewBook) -> AppResult<Book> {
        let mut table = self.table.write().await;
        let book = table
            .rows
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))?;
        check_constraints(data)?;

        book.title = data.title.clone();
        book.author = data.author.clone();
        book.release_date = data.release_date;
        book.page_count = data.page_count;
        book.publisher = data.publisher.clone();
        book.updated_at = Utc::now();

        tracing::info!(book_id = id, "Updated book");
        Ok(book.clone())
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let removed = self.table.write().await.rows.remove(&id);
        if removed.is_none() {
            return Err(AppError::NotFound(format!("Book {} not found", id)));
        }

        tracing::info!(book_id = id, "Deleted book");
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
