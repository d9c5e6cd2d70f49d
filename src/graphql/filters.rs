//! GraphQL input types for the book list: filters, sort, pagination
//!
//! Each input converts into the engine's own types. Conversion is where bad
//! pagination values are rejected.

use async_graphql::InputObject;

use crate::catalog::{BookFilter, BookSort, BookSortField, SortDirection, Window};
use crate::error::CatalogResult;

/// Window over the ordered book list
#[derive(InputObject, Clone, Debug)]
pub struct BookPaginationInput {
    /// Rows to skip (must be >= 0)
    #[graphql(default = 0)]
    pub skip: i32,
    /// Page size (must be > 0)
    #[graphql(default = 10)]
    pub limit: i32,
}

impl BookPaginationInput {
    pub fn into_window(self) -> CatalogResult<Window> {
        Window::new(Some(self.skip.into()), Some(self.limit.into()))
    }
}

/// Window for an optional pagination argument
pub fn window_from(pagination: Option<BookPaginationInput>) -> CatalogResult<Window> {
    match pagination {
        Some(p) => p.into_window(),
        None => Ok(Window::default()),
    }
}

/// Book predicates, ANDed together
#[derive(InputObject, Default, Clone, Debug)]
pub struct BookFilterInput {
    /// Case-insensitive substring of the title
    pub title: Option<String>,
    /// Case-insensitive substring of the author
    pub author: Option<String>,
    pub category_id: Option<i64>,
    pub published_year: Option<i32>,
}

impl From<BookFilterInput> for BookFilter {
    fn from(input: BookFilterInput) -> Self {
        BookFilter {
            title: input.title,
            author: input.author,
            category_id: input.category_id,
            published_year: input.published_year,
        }
    }
}

#[derive(InputObject, Clone, Debug)]
pub struct BookSortInput {
    pub field: BookSortField,
    #[graphql(default)]
    pub order: SortDirection,
}

impl From<BookSortInput> for BookSort {
    fn from(input: BookSortInput) -> Self {
        BookSort::new(input.field, input.order)
    }
}
