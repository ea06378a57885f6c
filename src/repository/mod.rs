//! Storage ports and their Postgres adapters.
//!
//! The service layer depends only on the [`BookStore`] and [`LoanStore`]
//! traits; `books` and `loans` hold the sqlx-backed implementations.

pub mod books;
pub mod loans;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{
        book::{Book, BookFilter, NewBook},
        loan::{Loan, LoanDetails, LoanFilter, NewLoan},
        page::{Page, PageRequest},
    },
};

/// Storage port for the book catalog.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    async fn save(&self, book: &NewBook) -> AppResult<Book>;

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Book>>;

    /// Persists title and author for the book's id. The stored ISBN is
    /// immutable and left untouched.
    async fn update(&self, book: &Book) -> AppResult<Book>;

    async fn delete(&self, id: i64) -> AppResult<()>;

    async fn exists_by_isbn(&self, isbn: &str) -> AppResult<bool>;

    async fn find_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>>;

    async fn find_by_filter(
        &self,
        filter: &BookFilter,
        page: &PageRequest,
    ) -> AppResult<Page<Book>>;
}

/// Storage port for the loan ledger.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoanStore: Send + Sync {
    async fn save(&self, loan: &NewLoan) -> AppResult<Loan>;

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Loan>>;

    async fn set_returned(&self, id: i64, returned: bool) -> AppResult<Loan>;

    /// True when the book has a loan with `returned` unset or false.
    async fn exists_unreturned_for_book(&self, book_id: i64) -> AppResult<bool>;

    async fn find_by_filter(
        &self,
        filter: &LoanFilter,
        page: &PageRequest,
    ) -> AppResult<Page<LoanDetails>>;

    async fn find_by_book(&self, book_id: i64, page: &PageRequest)
        -> AppResult<Page<LoanDetails>>;

    /// All unreturned loans with `loan_date <= cutoff`, oldest first.
    async fn find_overdue_before(&self, cutoff: NaiveDate) -> AppResult<Vec<Loan>>;
}

/// Main repository struct bundling the store adapters
#[derive(Clone)]
pub struct Repository {
    pub books: Arc<dyn BookStore>,
    pub loans: Arc<dyn LoanStore>,
}

impl Repository {
    /// Create a repository backed by Postgres stores over the given pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            books: Arc::new(books::PgBookStore::new(pool.clone())),
            loans: Arc::new(loans::PgLoanStore::new(pool)),
        }
    }

    #[cfg(test)]
    pub fn from_parts(books: Arc<dyn BookStore>, loans: Arc<dyn LoanStore>) -> Self {
        Self { books, loans }
    }
}
