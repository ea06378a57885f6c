//! API handlers for the Libris REST endpoints

pub mod books;
pub mod health;
pub mod loans;
pub mod openapi;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::page::{Page, PageRequest, DEFAULT_PAGE_SIZE},
};

/// Common paging query parameters
#[derive(Debug, Default, Deserialize)]
pub struct Pagination {
    pub page: Option<i64>,
    pub size: Option<i64>,
}

impl Pagination {
    pub fn to_request(&self) -> AppResult<PageRequest> {
        PageRequest::new(self.page.unwrap_or(0), self.size.unwrap_or(DEFAULT_PAGE_SIZE))
    }
}

/// Paginated response wrapper
#[derive(Serialize, ToSchema)]
pub struct PageResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub content: Vec<T>,
    pub page: i64,
    pub size: i64,
    pub total_elements: i64,
}

impl<T> PageResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub fn from_page<U>(page: Page<U>, f: impl FnMut(U) -> T) -> Self {
        let page = page.map(f);
        Self {
            content: page.content,
            page: page.page,
            size: page.size,
            total_elements: page.total_elements,
        }
    }
}

/// Collects a field error when the value is empty. Validation runs at the
/// handler boundary, before any business rule.
pub(crate) fn require_non_empty(errors: &mut Vec<String>, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(format!("{} is required", field));
    }
}

pub(crate) fn check(errors: Vec<String>) -> AppResult<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Helpers for exercising handlers through the real router.

    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header::CONTENT_TYPE, Request, StatusCode},
        routing::{delete, get, patch, post, put},
        Router,
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::{
        api,
        repository::{MockBookStore, MockLoanStore, Repository},
        services::{email::MockNotificationGateway, Services},
        AppConfig, AppState,
    };

    pub fn state(books: MockBookStore, loans: MockLoanStore) -> AppState {
        let repository = Repository::from_parts(Arc::new(books), Arc::new(loans));
        let services =
            Services::with_notifier(repository, Arc::new(MockNotificationGateway::new()));
        AppState {
            config: Arc::new(AppConfig::default()),
            services: Arc::new(services),
        }
    }

    /// Same route table the binary installs under /api.
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/api/books", post(api::books::create_book))
            .route("/api/books", get(api::books::list_books))
            .route("/api/books/:id", get(api::books::get_book))
            .route("/api/books/:id", put(api::books::update_book))
            .route("/api/books/:id", delete(api::books::delete_book))
            .route("/api/books/:id/loans", get(api::books::list_book_loans))
            .route("/api/loans", post(api::loans::create_loan))
            .route("/api/loans", get(api::loans::list_loans))
            .route("/api/loans/:id", patch(api::loans::patch_loan))
            .with_state(state)
    }

    pub async fn send(router: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap()
    }

    pub fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_every_missing_field() {
        let mut errors = Vec::new();
        require_non_empty(&mut errors, "title", "");
        require_non_empty(&mut errors, "author", "  ");
        require_non_empty(&mut errors, "isbn", "123");

        assert_eq!(errors, vec!["title is required", "author is required"]);
        assert!(matches!(check(errors), Err(AppError::Validation(list)) if list.len() == 2));
    }

    #[test]
    fn pagination_defaults_to_first_page_of_twenty() {
        let request = Pagination::default().to_request().unwrap();
        assert_eq!(request.page, 0);
        assert_eq!(request.size, 20);
    }

    #[test]
    fn pagination_rejects_zero_size() {
        let pagination = Pagination {
            page: Some(0),
            size: Some(0),
        };
        assert!(pagination.to_request().is_err());
    }
}
