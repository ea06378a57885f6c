//! Book catalog service

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookFilter, NewBook},
        page::{Page, PageRequest},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Register a new book. Fails if the ISBN is already in the catalog.
    pub async fn create_book(&self, book: NewBook) -> AppResult<Book> {
        if self.repository.books.exists_by_isbn(&book.isbn).await? {
            return Err(AppError::DuplicateIsbn);
        }
        self.repository.books.save(&book).await
    }

    pub async fn get_book(&self, id: i64) -> AppResult<Option<Book>> {
        self.repository.books.find_by_id(id).await
    }

    /// Persist title and author for an existing book. The ISBN is immutable
    /// after creation and never rewritten here.
    pub async fn update_book(&self, book: Book) -> AppResult<Book> {
        self.repository.books.update(&book).await
    }

    pub async fn delete_book(&self, book: &Book) -> AppResult<()> {
        self.repository.books.delete(book.id).await
    }

    /// Paged catalog search. Empty filter fields are ignored before the
    /// store sees them.
    pub async fn find_books(
        &self,
        filter: BookFilter,
        page: &PageRequest,
    ) -> AppResult<Page<Book>> {
        self.repository
            .books
            .find_by_filter(&filter.normalized(), page)
            .await
    }

    pub async fn get_book_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>> {
        self.repository.books.find_by_isbn(isbn).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::repository::{MockBookStore, MockLoanStore};

    fn service(books: MockBookStore) -> CatalogService {
        CatalogService::new(Repository::from_parts(
            Arc::new(books),
            Arc::new(MockLoanStore::new()),
        ))
    }

    fn a_book() -> Book {
        Book {
            id: 11,
            title: "As aventuras".to_string(),
            author: "Fulano".to_string(),
            isbn: "123".to_string(),
        }
    }

    #[tokio::test]
    async fn create_book_persists_when_isbn_is_new() {
        let mut books = MockBookStore::new();
        books
            .expect_exists_by_isbn()
            .withf(|isbn| isbn == "123")
            .return_once(|_| Ok(false));
        books
            .expect_save()
            .withf(|new| new.isbn == "123" && new.title == "As aventuras")
            .return_once(|_| Ok(a_book()));

        let created = service(books)
            .create_book(NewBook {
                title: "As aventuras".to_string(),
                author: "Fulano".to_string(),
                isbn: "123".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(created.id, 11);
    }

    #[tokio::test]
    async fn create_book_rejects_duplicate_isbn() {
        let mut books = MockBookStore::new();
        books.expect_exists_by_isbn().return_once(|_| Ok(true));
        // save must never run
        books.expect_save().never();

        let err = service(books)
            .create_book(NewBook {
                title: "Outro".to_string(),
                author: "Beltrano".to_string(),
                isbn: "123".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::DuplicateIsbn));
    }

    #[tokio::test]
    async fn find_books_ignores_empty_filter_fields() {
        let mut books = MockBookStore::new();
        books
            .expect_find_by_filter()
            .withf(|filter, _| {
                filter.title.is_none()
                    && filter.author.as_deref() == Some("art")
                    && filter.isbn.is_none()
            })
            .return_once(|_, page| Ok(Page::new(vec![a_book()], page, 1)));

        let filter = BookFilter {
            title: Some(String::new()),
            author: Some("art".to_string()),
            isbn: None,
        };

        let page = service(books)
            .find_books(filter, &PageRequest::default())
            .await
            .unwrap();

        assert_eq!(page.total_elements, 1);
        assert_eq!(page.content[0].isbn, "123");
    }
}
