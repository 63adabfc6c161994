pub mod models;
pub mod repository;
pub mod routes;
pub mod validation;

use async_trait::async_trait;
use axum::Router;
use shelf_db::Database;
use shelf_kernel::{InitCtx, Migration, Module};

use repository::BookRepository;

/// ISBN-keyed book catalog
pub struct BooksModule {
    repository: BookRepository,
}

impl BooksModule {
    pub fn new(db: Database) -> Self {
        Self {
            repository: BookRepository::new(db),
        }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.repository.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let error = |description: &str| {
            serde_json::json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                    }
                }
            })
        };
        let book_envelope = |description: &str| {
            serde_json::json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/BookEnvelope" }
                    }
                }
            })
        };
        let isbn_param = serde_json::json!([{
            "name": "isbn",
            "in": "path",
            "required": true,
            "schema": { "type": "string" }
        }]);
        let book_body = serde_json::json!({
            "required": true,
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/Book" }
                }
            }
        });

        Some(serde_json::json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List books ordered by title",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "All books",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/BooksEnvelope" }
                                    }
                                }
                            },
                            "500": error("Storage failure")
                        }
                    },
                    "post": {
                        "summary": "Create a book",
                        "tags": ["Books"],
                        "requestBody": book_body,
                        "responses": {
                            "201": book_envelope("Created book"),
                            "400": error("Validation failed or body is not JSON"),
                            "409": error("A book with this isbn already exists")
                        }
                    }
                },
                "/{isbn}": {
                    "get": {
                        "summary": "Get a book by isbn",
                        "tags": ["Books"],
                        "parameters": isbn_param,
                        "responses": {
                            "200": book_envelope("The book"),
                            "404": error("No book with this isbn")
                        }
                    },
                    "put": {
                        "summary": "Replace a book",
                        "tags": ["Books"],
                        "parameters": isbn_param,
                        "requestBody": book_body,
                        "responses": {
                            "200": book_envelope("Updated book"),
                            "400": error("Validation failed or body is not JSON"),
                            "404": error("No book with this isbn")
                        }
                    },
                    "delete": {
                        "summary": "Delete a book",
                        "tags": ["Books"],
                        "parameters": isbn_param,
                        "responses": {
                            "200": {
                                "description": "Book deleted",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "object",
                                            "properties": { "message": { "type": "string" } },
                                            "required": ["message"]
                                        }
                                    }
                                }
                            },
                            "404": error("No book with this isbn")
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "isbn": { "type": "string", "description": "Primary key" },
                            "amazon_url": { "type": "string" },
                            "author": { "type": "string" },
                            "title": { "type": "string" },
                            "publisher": { "type": "string" },
                            "year": { "type": "integer", "format": "int64" },
                            "pages": { "type": "integer", "format": "int64" },
                            "language": { "type": "string" }
                        },
                        "required": [
                            "isbn", "amazon_url", "author", "title",
                            "publisher", "year", "pages", "language"
                        ]
                    },
                    "BookEnvelope": {
                        "type": "object",
                        "properties": { "book": { "$ref": "#/components/schemas/Book" } },
                        "required": ["book"]
                    },
                    "BooksEnvelope": {
                        "type": "object",
                        "properties": {
                            "books": {
                                "type": "array",
                                "items": { "$ref": "#/components/schemas/Book" }
                            }
                        },
                        "required": ["books"]
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_init",
            up: r#"
                CREATE TABLE books (
                    isbn       TEXT PRIMARY KEY NOT NULL,
                    amazon_url TEXT NOT NULL,
                    author     TEXT NOT NULL,
                    title      TEXT NOT NULL,
                    publisher  TEXT NOT NULL,
                    year       INTEGER NOT NULL,
                    pages      INTEGER NOT NULL,
                    language   TEXT NOT NULL
                );
                CREATE INDEX books_title_idx ON books (title COLLATE NOCASE);
                "#,
        }]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let count = self.repository.count().await?;
        tracing::info!(module = self.name(), books = count, "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module(db: &Database) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BooksModule::new(db.clone()))
}
