//! Postgres adapter for the loan ledger

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{postgres::PgRow, Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::Book,
        loan::{Loan, LoanDetails, LoanFilter, NewLoan},
        page::{Page, PageRequest},
    },
};

use super::LoanStore;

#[derive(Clone)]
pub struct PgLoanStore {
    pool: Pool<Postgres>,
}

impl PgLoanStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

const LOAN_COLUMNS: &str = "id, book_id, isbn, customer, customer_email, loan_date, returned";

/// Loan columns joined with the book columns, aliased apart.
const DETAILS_SELECT: &str = r#"
    SELECT l.id, l.book_id, l.isbn, l.customer, l.customer_email,
           l.loan_date, l.returned,
           b.id as b_id, b.title as b_title, b.author as b_author, b.isbn as b_isbn
    FROM loans l
    JOIN books b ON b.id = l.book_id
"#;

fn details_from_row(row: PgRow) -> Result<LoanDetails, sqlx::Error> {
    Ok(LoanDetails {
        id: row.try_get("id")?,
        isbn: row.try_get("isbn")?,
        customer: row.try_get("customer")?,
        customer_email: row.try_get("customer_email")?,
        loan_date: row.try_get("loan_date")?,
        returned: row.try_get("returned")?,
        book: Book {
            id: row.try_get("b_id")?,
            title: row.try_get("b_title")?,
            author: row.try_get("b_author")?,
            isbn: row.try_get("b_isbn")?,
        },
    })
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[async_trait]
impl LoanStore for PgLoanStore {
    async fn save(&self, loan: &NewLoan) -> AppResult<Loan> {
        sqlx::query_as::<_, Loan>(&format!(
            r#"
            INSERT INTO loans (book_id, isbn, customer, customer_email, loan_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            LOAN_COLUMNS
        ))
        .bind(loan.book_id)
        .bind(&loan.isbn)
        .bind(&loan.customer)
        .bind(&loan.customer_email)
        .bind(loan.loan_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // The partial unique index on (book_id) WHERE returned IS NOT TRUE
            // closes the check-then-insert race between concurrent creates.
            if is_unique_violation(&e) {
                AppError::BookAlreadyLoaned
            } else {
                e.into()
            }
        })
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Loan>> {
        let loan = sqlx::query_as::<_, Loan>(&format!(
            "SELECT {} FROM loans WHERE id = $1",
            LOAN_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(loan)
    }

    async fn set_returned(&self, id: i64, returned: bool) -> AppResult<Loan> {
        sqlx::query_as::<_, Loan>(&format!(
            "UPDATE loans SET returned = $1 WHERE id = $2 RETURNING {}",
            LOAN_COLUMNS
        ))
        .bind(returned)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::LoanNotFound)
    }

    async fn exists_unreturned_for_book(&self, book_id: i64) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM loans
                WHERE book_id = $1
                  AND (returned IS NULL OR returned = FALSE)
            )
            "#,
        )
        .bind(book_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn find_by_filter(
        &self,
        filter: &LoanFilter,
        page: &PageRequest,
    ) -> AppResult<Page<LoanDetails>> {
        // Disjunctive exact match; empty strings are literal match targets.
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM loans l
            JOIN books b ON b.id = l.book_id
            WHERE b.isbn = $1 OR l.customer = $2
            "#,
        )
        .bind(&filter.isbn)
        .bind(&filter.customer)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query(&format!(
            r#"
            {}
            WHERE b.isbn = $1 OR l.customer = $2
            ORDER BY l.id
            LIMIT $3 OFFSET $4
            "#,
            DETAILS_SELECT
        ))
        .bind(&filter.isbn)
        .bind(&filter.customer)
        .bind(page.size)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let content = rows
            .into_iter()
            .map(details_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(content, page, total))
    }

    async fn find_by_book(
        &self,
        book_id: i64,
        page: &PageRequest,
    ) -> AppResult<Page<LoanDetails>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM loans WHERE book_id = $1")
            .bind(book_id)
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query(&format!(
            r#"
            {}
            WHERE l.book_id = $1
            ORDER BY l.id
            LIMIT $2 OFFSET $3
            "#,
            DETAILS_SELECT
        ))
        .bind(book_id)
        .bind(page.size)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let content = rows
            .into_iter()
            .map(details_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(content, page, total))
    }

    async fn find_overdue_before(&self, cutoff: NaiveDate) -> AppResult<Vec<Loan>> {
        let loans = sqlx::query_as::<_, Loan>(&format!(
            r#"
            SELECT {}
            FROM loans
            WHERE loan_date <= $1
              AND (returned IS NULL OR returned = FALSE)
            ORDER BY loan_date
            "#,
            LOAN_COLUMNS
        ))
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await?;

        Ok(loans)
    }
}
