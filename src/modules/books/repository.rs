//! CRUD against the `books` table.
//!
//! No caching: every call goes to the store. Uniqueness of `isbn` is
//! enforced by the primary key, not by a read-before-write.

use shelf_db::Database;
use thiserror::Error;

use super::models::{Book, BookData};

const COLUMNS: &str = "isbn, amazon_url, author, title, publisher, year, pages, language";

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("no book with isbn '{0}'")]
    NotFound(String),

    #[error("a book with isbn '{0}' already exists")]
    Conflict(String),

    #[error("storage failure: {0}")]
    Storage(#[from] sqlx::Error),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Book storage over an injected [`Database`] handle.
#[derive(Debug, Clone)]
pub struct BookRepository {
    db: Database,
}

impl BookRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// All books, ordered by title ignoring ASCII case.
    pub async fn find_all(&self) -> RepositoryResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {COLUMNS} FROM books ORDER BY title COLLATE NOCASE ASC, isbn ASC"
        ))
        .fetch_all(self.db.pool())
        .await?;
        Ok(books)
    }

    pub async fn find_one(&self, isbn: &str) -> RepositoryResult<Book> {
        sqlx::query_as::<_, Book>(&format!("SELECT {COLUMNS} FROM books WHERE isbn = ?"))
            .bind(isbn)
            .fetch_optional(self.db.pool())
            .await?
            .ok_or_else(|| RepositoryError::NotFound(isbn.to_string()))
    }

    pub async fn create(&self, data: BookData) -> RepositoryResult<Book> {
        let book = sqlx::query_as::<_, Book>(&format!(
            "INSERT INTO books ({COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING {COLUMNS}"
        ))
        .bind(&data.isbn)
        .bind(&data.amazon_url)
        .bind(&data.author)
        .bind(&data.title)
        .bind(&data.publisher)
        .bind(data.year)
        .bind(data.pages)
        .bind(&data.language)
        .fetch_one(self.db.pool())
        .await
        .map_err(|err| match err {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                RepositoryError::Conflict(data.isbn.clone())
            }
            other => RepositoryError::Storage(other),
        })?;

        tracing::debug!(isbn = %book.isbn, "book created");
        Ok(book)
    }

    /// Replace every mutable column of the row keyed by `isbn`.
    ///
    /// `data.isbn` is ignored; the key in the path is authoritative.
    pub async fn update(&self, isbn: &str, data: BookData) -> RepositoryResult<Book> {
        let book = sqlx::query_as::<_, Book>(&format!(
            "UPDATE books SET amazon_url = ?, author = ?, title = ?, publisher = ?, \
             year = ?, pages = ?, language = ? WHERE isbn = ? RETURNING {COLUMNS}"
        ))
        .bind(&data.amazon_url)
        .bind(&data.author)
        .bind(&data.title)
        .bind(&data.publisher)
        .bind(data.year)
        .bind(data.pages)
        .bind(&data.language)
        .bind(isbn)
        .fetch_optional(self.db.pool())
        .await?
        .ok_or_else(|| RepositoryError::NotFound(isbn.to_string()))?;

        tracing::debug!(isbn = %book.isbn, "book updated");
        Ok(book)
    }

    pub async fn remove(&self, isbn: &str) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE isbn = ?")
            .bind(isbn)
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(isbn.to_string()));
        }

        tracing::debug!(isbn = %isbn, "book deleted");
        Ok(())
    }

    pub async fn count(&self) -> RepositoryResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM books")
            .fetch_one(self.db.pool())
            .await?;
        Ok(count)
    }
}
