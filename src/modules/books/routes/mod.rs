//! HTTP handlers for the books module.
//!
//! Validation and repository failures are translated to status codes here
//! and nowhere else.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use shelf_http::error::AppError;

use super::models::{BookEnvelope, BooksEnvelope, MessageEnvelope};
use super::repository::{BookRepository, RepositoryError};
use super::validation::{validate_book, ValidationErrors};

pub fn router(repository: BookRepository) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route(
            "/{isbn}",
            get(get_book).put(update_book).delete(delete_book),
        )
        .with_state(repository)
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(_) => AppError::not_found(err.to_string()),
            RepositoryError::Conflict(ref isbn) => AppError::conflict(
                vec![json!({"field": "isbn", "error": "already exists", "value": isbn})],
                err.to_string(),
            ),
            RepositoryError::Storage(_) => AppError::Internal(err.into()),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let details = errors
            .0
            .iter()
            .map(|e| json!({"field": e.field, "error": e.message}))
            .collect();
        AppError::validation(details, errors.to_string())
    }
}

async fn list_books(
    State(repository): State<BookRepository>,
) -> Result<Json<BooksEnvelope>, AppError> {
    let books = repository.find_all().await?;
    Ok(Json(BooksEnvelope { books }))
}

async fn get_book(
    State(repository): State<BookRepository>,
    Path(isbn): Path<String>,
) -> Result<Json<BookEnvelope>, AppError> {
    let book = repository.find_one(&isbn).await?;
    Ok(Json(BookEnvelope { book }))
}

async fn create_book(
    State(repository): State<BookRepository>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<BookEnvelope>), AppError> {
    let Json(body) = body?;
    let data = validate_book(&body)?;
    let book = repository.create(data).await?;
    tracing::info!(isbn = %book.isbn, "book created");
    Ok((StatusCode::CREATED, Json(BookEnvelope { book })))
}

async fn update_book(
    State(repository): State<BookRepository>,
    Path(isbn): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<BookEnvelope>, AppError> {
    let Json(body) = body?;
    let data = validate_book(&body)?;
    let book = repository.update(&isbn, data).await?;
    tracing::info!(isbn = %book.isbn, "book updated");
    Ok(Json(BookEnvelope { book }))
}

async fn delete_book(
    State(repository): State<BookRepository>,
    Path(isbn): Path<String>,
) -> Result<Json<MessageEnvelope>, AppError> {
    repository.remove(&isbn).await?;
    tracing::info!(isbn = %isbn, "book deleted");
    Ok(Json(MessageEnvelope {
        message: "Book deleted",
    }))
}
