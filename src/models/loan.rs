//! Loan model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::book::Book;

/// Loan record from the ledger.
///
/// `returned` is deliberately tri-state: both `None` and `Some(false)` mean
/// the book is still out; only `Some(true)` means it came back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Loan {
    pub id: i64,
    pub book_id: i64,
    /// ISBN copied from the book at loan time.
    pub isbn: String,
    pub customer: String,
    pub customer_email: String,
    pub loan_date: NaiveDate,
    pub returned: Option<bool>,
}

impl Loan {
    pub fn is_returned(&self) -> bool {
        self.returned == Some(true)
    }
}

/// Loan joined with its book, for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LoanDetails {
    pub id: i64,
    pub isbn: String,
    pub customer: String,
    pub customer_email: String,
    pub loan_date: NaiveDate,
    pub returned: Option<bool>,
    pub book: Book,
}

impl LoanDetails {
    pub fn from_parts(loan: Loan, book: Book) -> Self {
        Self {
            id: loan.id,
            isbn: loan.isbn,
            customer: loan.customer,
            customer_email: loan.customer_email,
            loan_date: loan.loan_date,
            returned: loan.returned,
            book,
        }
    }
}

/// A loan to be inserted, before an id is assigned
#[derive(Debug, Clone)]
pub struct NewLoan {
    pub book_id: i64,
    pub isbn: String,
    pub customer: String,
    pub customer_email: String,
    pub loan_date: NaiveDate,
}

/// Ledger filter: matches loans whose book ISBN equals `isbn` OR whose
/// customer equals `customer`. Exact comparison on both sides; an empty
/// string is a literal match target, not "ignore". The asymmetry with
/// [`super::book::BookFilter`] is intentional.
#[derive(Debug, Clone, Default)]
pub struct LoanFilter {
    pub isbn: String,
    pub customer: String,
}
