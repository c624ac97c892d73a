//! Book catalog service

use crate::{
    error::AppResult,
    models::book::{Book, BookForm},
    repository::Repository,
    validation,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Book>> {
        self.repository.books.list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    /// Validate a submission and insert it.
    ///
    /// Fails with `AppError::Validation` carrying every rule message; nothing
    /// is written in that case.
    pub async fn create(&self, form: &BookForm) -> AppResult<Book> {
        let data = validation::validate(form)?;
        self.repository.books.create(&data).await
    }

    /// Validate a submission and replace the fields of book `id`.
    ///
    /// The target is resolved first, so a missing book is `NotFound` even
    /// when the submission is also invalid.
    pub async fn update(&self, id: i32, form: &BookForm) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await?;
        let data = validation::validate(form)?;
        self.repository.books.update(id, &data).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.books.get_by_id(id).await?;
        self.repository.books.delete(id).await
    }

    pub async fn ping(&self) -> AppResult<()> {
        self.repository.books.ping().await
    }
}
