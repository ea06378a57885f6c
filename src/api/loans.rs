//! Loan ledger endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::loan::{Loan, LoanDetails, LoanFilter},
    services::loans::CreateLoan,
};

use super::{books::BookResponse, check, require_non_empty, PageResponse, Pagination};

/// Loan create request
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoanRequest {
    pub isbn: String,
    pub customer: String,
    pub customer_email: String,
}

impl LoanRequest {
    fn validate(&self) -> AppResult<()> {
        let mut errors = Vec::new();
        require_non_empty(&mut errors, "isbn", &self.isbn);
        require_non_empty(&mut errors, "customer", &self.customer);
        require_non_empty(&mut errors, "customer_email", &self.customer_email);
        check(errors)
    }
}

/// Return/unreturn request body
#[derive(Debug, Deserialize, ToSchema)]
pub struct ReturnedLoanRequest {
    pub returned: bool,
}

/// Loan response, with the book attached when the handler resolved it
#[derive(Debug, Serialize, ToSchema)]
pub struct LoanResponse {
    pub id: i64,
    pub isbn: String,
    pub customer: String,
    pub customer_email: String,
    pub loan_date: NaiveDate,
    pub returned: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub book: Option<BookResponse>,
}

impl From<LoanDetails> for LoanResponse {
    fn from(details: LoanDetails) -> Self {
        Self {
            id: details.id,
            isbn: details.isbn,
            customer: details.customer,
            customer_email: details.customer_email,
            loan_date: details.loan_date,
            returned: details.returned,
            book: Some(details.book.into()),
        }
    }
}

impl From<Loan> for LoanResponse {
    fn from(loan: Loan) -> Self {
        Self {
            id: loan.id,
            isbn: loan.isbn,
            customer: loan.customer,
            customer_email: loan.customer_email,
            loan_date: loan.loan_date,
            returned: loan.returned,
            book: None,
        }
    }
}

/// Ledger filter query parameters
#[derive(Debug, Default, Deserialize)]
pub struct LoanListQuery {
    pub isbn: Option<String>,
    pub customer: Option<String>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}

/// Create a loan (borrow a book)
#[utoipa::path(
    post,
    path = "/loans",
    tag = "loans",
    request_body = LoanRequest,
    responses(
        (status = 201, description = "Loan created", body = LoanResponse),
        (status = 400, description = "Validation failure, unknown ISBN or book already loaned", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_loan(
    State(state): State<crate::AppState>,
    Json(request): Json<LoanRequest>,
) -> AppResult<(StatusCode, Json<LoanResponse>)> {
    request.validate()?;
    tracing::info!(isbn = %request.isbn, "Creating a loan");

    let details = state
        .services
        .loans
        .create_loan(CreateLoan {
            isbn: request.isbn,
            customer: request.customer,
            customer_email: request.customer_email,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(details.into())))
}

/// Set the returned flag on a loan
#[utoipa::path(
    patch,
    path = "/loans/{id}",
    tag = "loans",
    params(("id" = i64, Path, description = "Loan id")),
    request_body = ReturnedLoanRequest,
    responses(
        (status = 200, description = "Loan updated", body = LoanResponse),
        (status = 404, description = "Loan not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn patch_loan(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
    Json(request): Json<ReturnedLoanRequest>,
) -> AppResult<Json<LoanResponse>> {
    tracing::info!(id, returned = request.returned, "Updating a loan");

    let loan = state
        .services
        .loans
        .mark_returned(id, request.returned)
        .await?;

    Ok(Json(loan.into()))
}

/// Paged ledger search: book ISBN equals OR customer equals
#[utoipa::path(
    get,
    path = "/loans",
    tag = "loans",
    params(
        ("isbn" = Option<String>, Query, description = "Exact match on book ISBN"),
        ("customer" = Option<String>, Query, description = "Exact match on customer"),
        ("page" = Option<i64>, Query, description = "Page number, zero based"),
        ("size" = Option<i64>, Query, description = "Page size (default: 20)")
    ),
    responses(
        (status = 200, description = "Page of loans", body = PageResponse<LoanResponse>)
    )
)]
pub async fn list_loans(
    State(state): State<crate::AppState>,
    Query(query): Query<LoanListQuery>,
) -> AppResult<Json<PageResponse<LoanResponse>>> {
    let pagination = Pagination {
        page: query.page,
        size: query.size,
    };
    let page_request = pagination.to_request()?;

    // Absent parameters become empty strings: the ledger filter treats an
    // empty string as a literal match target, unlike the catalog filter.
    let filter = LoanFilter {
        isbn: query.isbn.unwrap_or_default(),
        customer: query.customer.unwrap_or_default(),
    };

    let page = state.services.loans.find_loans(filter, &page_request).await?;
    Ok(Json(PageResponse::from_page(page, LoanResponse::from)))
}
