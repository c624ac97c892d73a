//! Repository layer for database operations

pub mod books;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::book::{Book, NewBook},
};

/// Storage contract for the `books` table.
///
/// Implementations re-check the column constraints themselves and answer
/// with `AppError::ConstraintViolation` when they fail, independent of the
/// validation layer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// All books ordered by title ascending
    async fn list(&self) -> AppResult<Vec<Book>>;

    async fn get_by_id(&self, id: i32) -> AppResult<Book>;

    /// Insert a book; the store assigns its id
    async fn create(&self, data: &NewBook) -> AppResult<Book>;

    /// Replace the editable fields of an existing book
    async fn update(&self, id: i32, data: &NewBook) -> AppResult<Book>;

    async fn delete(&self, id: i32) -> AppResult<()>;

    /// Cheap round trip used by the readiness probe
    async fn ping(&self) -> AppResult<()>;
}

/// Main repository struct holding the active book store
#[derive(Clone)]
pub struct Repository {
    pub books: Arc<dyn BookRepository>,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self::with_books(Arc::new(books::PgBookRepository::new(pool)))
    }

    /// Repository backed by process memory; contents vanish on restart
    pub fn in_memory() -> Self {
        Self::with_books(Arc::new(memory::MemoryBookRepository::new()))
    }

    pub fn with_books(books: Arc<dyn BookRepository>) -> Self {
        Self { books }
    }
}
