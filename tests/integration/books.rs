//! End-to-end request handling over the in-memory store

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::{header, StatusCode};
use bookshelf_server::{
    config::RunMode,
    error::{AppError, AppResult},
    models::{Book, NewBook},
    repository::BookRepository,
};

use crate::common::{
    app_with_repository, as_pairs, dune_fields, embedded_token, new_book, session_cookie, test_app,
};

#[tokio::test]
async fn test_empty_list() {
    let app = test_app();
    let page = app.get("/", None).await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("No books yet."));
}

#[tokio::test]
async fn test_form_pages_issue_cookie_once() {
    let app = test_app();
    let first = app.get("/book/add", None).await;
    let cookie = session_cookie(&first.headers).unwrap();
    let set_cookie = first.headers.get(header::SET_COOKIE).unwrap().to_str().unwrap();
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Strict"));

    let second = app.get("/book/add", Some(&cookie)).await;
    assert!(session_cookie(&second.headers).is_none());
    assert!(embedded_token(&second.body).is_some());
}

#[tokio::test]
async fn test_add_dune_redirects_and_lists_sorted() {
    let app = test_app();
    app.store.create(&new_book("Anathem")).await.unwrap();
    app.store.create(&new_book("Solaris")).await.unwrap();

    let session = app.csrf_session("/book/add").await;
    let fields = dune_fields(&session.token);
    let response = app
        .post_form("/book/add", Some(&session.cookie), &as_pairs(&fields))
        .await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/"));
    assert_eq!(app.titles().await, vec!["Anathem", "Dune", "Solaris"]);

    let list = app.get("/", Some(&session.cookie)).await;
    let anathem = list.body.find("Anathem").unwrap();
    let dune = list.body.find("Dune").unwrap();
    let solaris = list.body.find("Solaris").unwrap();
    assert!(anathem < dune && dune < solaris);
    assert!(list.body.contains("Herbert"));
    assert!(list.body.contains("1965-08-01"));
}

#[tokio::test]
async fn test_add_with_empty_title_rerenders_form() {
    let app = test_app();
    let session = app.csrf_session("/book/add").await;
    let mut fields = dune_fields(&session.token);
    fields[0].1 = String::new();

    let response = app
        .post_form("/book/add", Some(&session.cookie), &as_pairs(&fields))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Please provide a value for Title"));
    assert_eq!(response.body.matches("<li>").count(), 1);
    // submitted values survive the round trip
    assert!(response.body.contains(r#"value="Herbert""#));
    assert!(embedded_token(&response.body).is_some());
    assert!(app.titles().await.is_empty());
}

#[tokio::test]
async fn test_edit_with_negative_page_count_leaves_row_unchanged() {
    let app = test_app();
    for title in ["One", "Two", "Three"] {
        app.store.create(&new_book(title)).await.unwrap();
    }
    let before = app.store.get_by_id(3).await.unwrap();

    let session = app.csrf_session("/book/edit/3").await;
    let fields = [
        ("title", "Three, revised"),
        ("author", "Author"),
        ("releaseDate", "2000-01-01"),
        ("pageCount", "-5"),
        ("publisher", "Publisher"),
        ("_csrf", session.token.as_str()),
    ];
    let response = app
        .post_form("/book/edit/3", Some(&session.cookie), &fields)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response
        .body
        .contains("Please provide a valid integer (0 or greater) for Page Count"));
    assert!(response.body.contains(r#"action="/book/edit/3""#));
    assert!(response.body.contains(r#"value="Three, revised""#));
    assert_eq!(app.store.get_by_id(3).await.unwrap(), before);
}

#[tokio::test]
async fn test_edit_prefills_and_updates() {
    let app = test_app();
    let book = app.store.create(&new_book("Dune")).await.unwrap();
    let uri = format!("/book/edit/{}", book.id);

    let session = app.csrf_session(&uri).await;
    let page = app.get(&uri, Some(&session.cookie)).await;
    assert!(page.body.contains(r#"value="Dune""#));
    assert!(page.body.contains(r#"value="2000-01-01""#));

    let mut fields = dune_fields(&session.token);
    fields[3].1 = "896".to_string();
    let response = app.post_form(&uri, Some(&session.cookie), &as_pairs(&fields)).await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    let updated = app.store.get_by_id(book.id).await.unwrap();
    assert_eq!(updated.page_count, 896);
    assert_eq!(updated.author, "Herbert");
    assert_eq!(updated.id, book.id);
}

#[tokio::test]
async fn test_delete_then_edit_is_not_found() {
    let app = test_app();
    for i in 1..=8 {
        app.store.create(&new_book(&format!("Book {}", i))).await.unwrap();
    }

    let session = app.csrf_session("/book/delete/7").await;
    let confirm = app.get("/book/delete/7", Some(&session.cookie)).await;
    assert!(confirm.body.contains("Book 7"));

    let response = app
        .post_form("/book/delete/7", Some(&session.cookie), &[("_csrf", session.token.as_str())])
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/"));

    let titles = app.titles().await;
    assert_eq!(titles.len(), 7);
    assert!(!titles.contains(&"Book 7".to_string()));

    let edit = app.get("/book/edit/7", Some(&session.cookie)).await;
    assert_eq!(edit.status, StatusCode::NOT_FOUND);
    assert!(edit.body.contains("Page Not Found"));
}

#[tokio::test]
async fn test_missing_books_are_not_found() {
    let app = test_app();
    for uri in ["/book/edit/99", "/book/delete/99", "/book/edit/abc", "/no/such/page"] {
        let response = app.get(uri, None).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "{}", uri);
        assert!(response.body.contains("Page Not Found"), "{}", uri);
    }
}

#[tokio::test]
async fn test_write_to_missing_book_is_not_found_and_table_unchanged() {
    let app = test_app();
    app.store.create(&new_book("Dune")).await.unwrap();
    let session = app.csrf_session("/book/add").await;
    let fields = dune_fields(&session.token);

    let edit = app
        .post_form("/book/edit/42", Some(&session.cookie), &as_pairs(&fields))
        .await;
    assert_eq!(edit.status, StatusCode::NOT_FOUND);

    let delete = app
        .post_form("/book/delete/42", Some(&session.cookie), &[("_csrf", session.token.as_str())])
        .await;
    assert_eq!(delete.status, StatusCode::NOT_FOUND);

    assert_eq!(app.titles().await, vec!["Dune"]);
}

#[tokio::test]
async fn test_writes_without_valid_token_are_forbidden() {
    let app = test_app();
    let book = app.store.create(&new_book("Keep me")).await.unwrap();
    let session = app.csrf_session("/book/add").await;
    let other = app.csrf_session("/book/add").await;

    // no token, with an otherwise invalid body: CSRF wins over validation
    let response = app
        .post_form("/book/add", Some(&session.cookie), &[("title", "")])
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert!(!response.body.contains("Please provide a value"));

    // token minted for a different browser
    let fields = dune_fields(&other.token);
    let response = app
        .post_form("/book/add", Some(&session.cookie), &as_pairs(&fields))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    // no cookie at all
    let fields = dune_fields(&session.token);
    let response = app.post_form("/book/add", None, &as_pairs(&fields)).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .post_form(&format!("/book/delete/{}", book.id), Some(&session.cookie), &[])
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    assert_eq!(app.titles().await, vec!["Keep me"]);
}

#[tokio::test]
async fn test_cookieless_post_is_forbidden_whatever_the_body() {
    let app = test_app();
    let response = app
        .post("/book/add", None, "application/json", r#"{"title":"Dune"}"#.to_string())
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert!(app.titles().await.is_empty());
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = test_app();
    let health = app.get("/health", None).await;
    assert_eq!(health.status, StatusCode::OK);
    assert!(health.body.contains(r#""status":"healthy""#));

    let ready = app.get("/ready", None).await;
    assert_eq!(ready.status, StatusCode::OK);
    assert!(ready.body.contains(r#""status":"ready""#));
}

/// Store whose every call fails like a lost database connection
struct BrokenRepository;

#[async_trait]
impl BookRepository for BrokenRepository {
    async fn list(&self) -> AppResult<Vec<Book>> {
        Err(AppError::Database(sqlx::Error::PoolTimedOut))
    }
    async fn get_by_id(&self, _id: i32) -> AppResult<Book> {
        Err(AppError::Database(sqlx::Error::PoolTimedOut))
    }
    async fn create(&self, _data: &NewBook) -> AppResult<Book> {
        Err(AppError::Database(sqlx::Error::PoolTimedOut))
    }
    async fn update(&self, _id: i32, _data: &NewBook) -> AppResult<Book> {
        Err(AppError::Database(sqlx::Error::PoolTimedOut))
    }
    async fn delete(&self, _id: i32) -> AppResult<()> {
        Err(AppError::Database(sqlx::Error::PoolTimedOut))
    }
    async fn ping(&self) -> AppResult<()> {
        Err(AppError::Database(sqlx::Error::PoolTimedOut))
    }
}

#[tokio::test]
async fn test_server_error_detail_shown_in_development() {
    let app = app_with_repository(RunMode::Development, Some(Arc::new(BrokenRepository)));
    let page = app.get("/", None).await;
    assert_eq!(page.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(page.body.contains("Server Error"));
    assert!(page.body.contains("Database error"));
}

#[tokio::test]
async fn test_server_error_detail_hidden_in_production() {
    let app = app_with_repository(RunMode::Production, Some(Arc::new(BrokenRepository)));
    let page = app.get("/", None).await;
    assert_eq!(page.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(page.body.contains("Server Error"));
    assert!(!page.body.contains("Database error"));
    assert!(!page.body.contains("pool timed out"));

    let ready = app.get("/ready", None).await;
    assert_eq!(ready.status, StatusCode::SERVICE_UNAVAILABLE);
}

/// Store whose listing panics mid-request
struct PanickingRepository;

#[async_trait]
impl BookRepository for PanickingRepository {
    async fn list(&self) -> AppResult<Vec<Book>> {
        panic!("shelf index corrupted")
    }
    async fn get_by_id(&self, _id: i32) -> AppResult<Book> {
        Err(AppError::NotFound("book".to_string()))
    }
    async fn create(&self, _data: &NewBook) -> AppResult<Book> {
        Err(AppError::Internal("read only".to_string()))
    }
    async fn update(&self, _id: i32, _data: &NewBook) -> AppResult<Book> {
        Err(AppError::Internal("read only".to_string()))
    }
    async fn delete(&self, _id: i32) -> AppResult<()> {
        Err(AppError::Internal("read only".to_string()))
    }
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

#[tokio::test]
async fn test_handler_panic_renders_error_page_without_detail() {
    let app = app_with_repository(RunMode::Production, Some(Arc::new(PanickingRepository)));
    let page = app.get("/", None).await;
    assert_eq!(page.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(page.body.contains("Server Error"));
    assert!(!page.body.contains("shelf index corrupted"));

    // the server keeps answering after the panic
    let health = app.get("/health", None).await;
    assert_eq!(health.status, StatusCode::OK);
}
