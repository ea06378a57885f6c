//! Loan ledger service

use chrono::{Duration, Utc};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::Book,
        loan::{Loan, LoanDetails, LoanFilter, NewLoan},
        page::{Page, PageRequest},
    },
    repository::Repository,
};

/// Input for loan creation, before the book reference is resolved.
#[derive(Debug, Clone)]
pub struct CreateLoan {
    pub isbn: String,
    pub customer: String,
    pub customer_email: String,
}

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
}

impl LoansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a loan: resolve the ISBN, check the book is available, stamp
    /// today's date and persist.
    pub async fn create_loan(&self, request: CreateLoan) -> AppResult<LoanDetails> {
        let book = self
            .repository
            .books
            .find_by_isbn(&request.isbn)
            .await?
            .ok_or(AppError::BookNotFound)?;

        if self
            .repository
            .loans
            .exists_unreturned_for_book(book.id)
            .await?
        {
            return Err(AppError::BookAlreadyLoaned);
        }

        let loan = self
            .repository
            .loans
            .save(&NewLoan {
                book_id: book.id,
                isbn: book.isbn.clone(),
                customer: request.customer,
                customer_email: request.customer_email,
                loan_date: Utc::now().date_naive(),
            })
            .await?;

        Ok(LoanDetails::from_parts(loan, book))
    }

    pub async fn get_loan(&self, id: i64) -> AppResult<Option<Loan>> {
        self.repository.loans.find_by_id(id).await
    }

    /// Flip the returned flag on an existing loan. The only steady-state
    /// mutation path for a loan.
    pub async fn mark_returned(&self, id: i64, returned: bool) -> AppResult<Loan> {
        self.repository
            .loans
            .find_by_id(id)
            .await?
            .ok_or(AppError::LoanNotFound)?;

        self.repository.loans.set_returned(id, returned).await
    }

    pub async fn find_loans(
        &self,
        filter: LoanFilter,
        page: &PageRequest,
    ) -> AppResult<Page<LoanDetails>> {
        self.repository.loans.find_by_filter(&filter, page).await
    }

    pub async fn loans_by_book(
        &self,
        book: &Book,
        page: &PageRequest,
    ) -> AppResult<Page<LoanDetails>> {
        self.repository.loans.find_by_book(book.id, page).await
    }

    /// Every unreturned loan at least `days_overdue` days old. The boundary
    /// is inclusive: a loan made exactly `days_overdue` days ago counts.
    pub async fn overdue_loans(&self, days_overdue: i64) -> AppResult<Vec<Loan>> {
        let cutoff = Utc::now().date_naive() - Duration::days(days_overdue);
        self.repository.loans.find_overdue_before(cutoff).await
    }
}
