use serde::{Deserialize, Serialize};

/// A catalog entry, keyed by ISBN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Book {
    /// Primary key; never changes after creation
    pub isbn: String,
    pub amazon_url: String,
    pub author: String,
    pub title: String,
    pub publisher: String,
    pub year: i64,
    pub pages: i64,
    pub language: String,
}

/// Validated write payload. Used for both create and full-replace updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookData {
    pub isbn: String,
    pub amazon_url: String,
    pub author: String,
    pub title: String,
    pub publisher: String,
    pub year: i64,
    pub pages: i64,
    pub language: String,
}

impl BookData {
    /// The row this payload produces when stored under `isbn`.
    pub fn into_book(self, isbn: &str) -> Book {
        Book {
            isbn: isbn.to_string(),
            amazon_url: self.amazon_url,
            author: self.author,
            title: self.title,
            publisher: self.publisher,
            year: self.year,
            pages: self.pages,
            language: self.language,
        }
    }
}

/// `{"book": {...}}`
#[derive(Debug, Serialize)]
pub struct BookEnvelope {
    pub book: Book,
}

/// `{"books": [...]}`
#[derive(Debug, Serialize)]
pub struct BooksEnvelope {
    pub books: Vec<Book>,
}

/// `{"message": "..."}`
#[derive(Debug, Serialize)]
pub struct MessageEnvelope {
    pub message: &'static str,
}
