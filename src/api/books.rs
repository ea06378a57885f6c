//! Book catalog endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookFilter, NewBook},
};

use super::{check, loans::LoanResponse, require_non_empty, PageResponse, Pagination};

/// Book create/update request
#[derive(Debug, Deserialize, ToSchema)]
pub struct BookRequest {
    pub title: String,
    pub author: String,
    pub isbn: String,
}

impl BookRequest {
    fn validate(&self) -> AppResult<()> {
        let mut errors = Vec::new();
        require_non_empty(&mut errors, "title", &self.title);
        require_non_empty(&mut errors, "author", &self.author);
        require_non_empty(&mut errors, "isbn", &self.isbn);
        check(errors)
    }
}

/// Book response
#[derive(Debug, Serialize, ToSchema)]
pub struct BookResponse {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub isbn: String,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            title: book.title,
            author: book.author,
            isbn: book.isbn,
        }
    }
}

/// Catalog search query parameters
#[derive(Debug, Default, Deserialize)]
pub struct BookListQuery {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}

fn book_not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Book with id {} not found", id))
}

/// Create a book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = BookRequest,
    responses(
        (status = 201, description = "Book created", body = BookResponse),
        (status = 400, description = "Validation or duplicate ISBN", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    Json(request): Json<BookRequest>,
) -> AppResult<(StatusCode, Json<BookResponse>)> {
    request.validate()?;
    tracing::info!(isbn = %request.isbn, "Creating a book");

    let book = state
        .services
        .catalog
        .create_book(NewBook {
            title: request.title,
            author: request.author,
            isbn: request.isbn,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(book.into())))
}

/// Get a book by id
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Book id")),
    responses(
        (status = 200, description = "Book details", body = BookResponse),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<BookResponse>> {
    let book = state
        .services
        .catalog
        .get_book(id)
        .await?
        .ok_or_else(|| book_not_found(id))?;

    Ok(Json(book.into()))
}

/// Update a book's title and author
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Book id")),
    request_body = BookRequest,
    responses(
        (status = 200, description = "Book updated", body = BookResponse),
        (status = 400, description = "Validation failure", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
    Json(request): Json<BookRequest>,
) -> AppResult<Json<BookResponse>> {
    request.validate()?;
    tracing::info!(id, "Updating a book");

    let mut book = state
        .services
        .catalog
        .get_book(id)
        .await?
        .ok_or_else(|| book_not_found(id))?;

    // The stored ISBN stays as created; only title and author move.
    book.title = request.title;
    book.author = request.author;

    let updated = state.services.catalog.update_book(book).await?;
    Ok(Json(updated.into()))
}

/// Delete a book by id
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Book id")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    tracing::info!(id, "Deleting a book");

    let book = state
        .services
        .catalog
        .get_book(id)
        .await?
        .ok_or_else(|| book_not_found(id))?;

    state.services.catalog.delete_book(&book).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Paged catalog search
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(
        ("title" = Option<String>, Query, description = "Substring match on title"),
        ("author" = Option<String>, Query, description = "Substring match on author"),
        ("isbn" = Option<String>, Query, description = "Substring match on ISBN"),
        ("page" = Option<i64>, Query, description = "Page number, zero based"),
        ("size" = Option<i64>, Query, description = "Page size (default: 20)")
    ),
    responses(
        (status = 200, description = "Page of books", body = PageResponse<BookResponse>)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    Query(query): Query<BookListQuery>,
) -> AppResult<Json<PageResponse<BookResponse>>> {
    let pagination = Pagination {
        page: query.page,
        size: query.size,
    };
    let page_request = pagination.to_request()?;

    let filter = BookFilter {
        title: query.title,
        author: query.author,
        isbn: query.isbn,
    };

    let page = state.services.catalog.find_books(filter, &page_request).await?;
    Ok(Json(PageResponse::from_page(page, BookResponse::from)))
}

/// All loans of a book, any return state
#[utoipa::path(
    get,
    path = "/books/{id}/loans",
    tag = "books",
    params(
        ("id" = i64, Path, description = "Book id"),
        ("page" = Option<i64>, Query, description = "Page number, zero based"),
        ("size" = Option<i64>, Query, description = "Page size (default: 20)")
    ),
    responses(
        (status = 200, description = "Page of loans", body = PageResponse<LoanResponse>),
        (status = 404, description = "Book not found")
    )
)]
pub async fn list_book_loans(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<PageResponse<LoanResponse>>> {
    let page_request = pagination.to_request()?;

    let book = state
        .services
        .catalog
        .get_book(id)
        .await?
        .ok_or_else(|| book_not_found(id))?;

    let page = state.services.loans.loans_by_book(&book, &page_request).await?;
    Ok(Json(PageResponse::from_page(page, LoanResponse::from)))
}
