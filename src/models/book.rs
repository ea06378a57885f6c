//! Book model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Book record from the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub isbn: String,
}

/// A book to be inserted, before an id is assigned
#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub isbn: String,
}

/// Catalog filter. Non-empty fields match case-insensitively as substrings
/// and are AND-combined; empty or absent fields are ignored.
#[derive(Debug, Clone, Default)]
pub struct BookFilter {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
}

impl BookFilter {
    /// Drops empty-string fields so the store treats them as match-all.
    pub fn normalized(self) -> Self {
        let keep = |field: Option<String>| field.filter(|value| !value.is_empty());
        Self {
            title: keep(self.title),
            author: keep(self.author),
            isbn: keep(self.isbn),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_drops_empty_fields() {
        let filter = BookFilter {
            title: Some(String::new()),
            author: Some("art".to_string()),
            isbn: None,
        };

        let normalized = filter.normalized();
        assert_eq!(normalized.title, None);
        assert_eq!(normalized.author, Some("art".to_string()));
        assert_eq!(normalized.isbn, None);
    }
}
