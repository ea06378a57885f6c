//! Postgres adapter for the book catalog

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookFilter, NewBook},
        page::{Page, PageRequest},
    },
};

use super::BookStore;

#[derive(Clone)]
pub struct PgBookStore {
    pool: Pool<Postgres>,
}

impl PgBookStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[async_trait]
impl BookStore for PgBookStore {
    async fn save(&self, book: &NewBook) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, author, isbn)
            VALUES ($1, $2, $3)
            RETURNING id, title, author, isbn
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // Unique index on isbn backs the service-level check.
            if is_unique_violation(&e) {
                AppError::DuplicateIsbn
            } else {
                e.into()
            }
        })
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(
            "SELECT id, title, author, isbn FROM books WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    async fn update(&self, book: &Book) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            r#"
            UPDATE books
            SET title = $1, author = $2
            WHERE id = $3
            RETURNING id, title, author, isbn
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", book.id)))
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn exists_by_isbn(&self, isbn: &str) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE isbn = $1)")
                .bind(isbn)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn find_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(
            "SELECT id, title, author, isbn FROM books WHERE isbn = $1",
        )
        .bind(isbn)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    async fn find_by_filter(
        &self,
        filter: &BookFilter,
        page: &PageRequest,
    ) -> AppResult<Page<Book>> {
        // NULL filter fields collapse to match-all; the rest are
        // case-insensitive substring matches, AND-combined.
        const WHERE_CLAUSE: &str = r#"
            ($1::text IS NULL OR title ILIKE '%' || $1 || '%')
            AND ($2::text IS NULL OR author ILIKE '%' || $2 || '%')
            AND ($3::text IS NULL OR isbn ILIKE '%' || $3 || '%')
        "#;

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM books WHERE {}",
            WHERE_CLAUSE
        ))
        .bind(&filter.title)
        .bind(&filter.author)
        .bind(&filter.isbn)
        .fetch_one(&self.pool)
        .await?;

        let content = sqlx::query_as::<_, Book>(&format!(
            r#"
            SELECT id, title, author, isbn
            FROM books
            WHERE {}
            ORDER BY id
            LIMIT $4 OFFSET $5
            "#,
            WHERE_CLAUSE
        ))
        .bind(&filter.title)
        .bind(&filter.author)
        .bind(&filter.isbn)
        .bind(page.size)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(Page::new(content, page, total))
    }
}
