//! Query inputs for the book list: predicate set, ordering, window

use async_graphql::Enum;

use crate::error::{CatalogError, CatalogResult};

/// Page size used when the caller gives no limit
pub const DEFAULT_LIMIT: i64 = 10;

/// Conjunction of the active book predicates. `None` fields do not restrict.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilter {
    /// Case-insensitive substring of the title
    pub title: Option<String>,
    /// Case-insensitive substring of the author
    pub author: Option<String>,
    pub category_id: Option<i64>,
    pub published_year: Option<i32>,
}

impl BookFilter {
    pub fn by_category(category_id: i64) -> Self {
        Self {
            category_id: Some(category_id),
            ..Default::default()
        }
    }

    /// Title needle, if it restricts anything
    pub fn title_needle(&self) -> Option<&str> {
        self.title.as_deref().filter(|s| !s.is_empty())
    }

    /// Author needle, if it restricts anything
    pub fn author_needle(&self) -> Option<&str> {
        self.author.as_deref().filter(|s| !s.is_empty())
    }

    /// True when no predicate is active and every book matches
    pub fn is_empty(&self) -> bool {
        self.title_needle().is_none()
            && self.author_needle().is_none()
            && self.category_id.is_none()
            && self.published_year.is_none()
    }
}

/// Fields a book list can be ordered by
#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
#[graphql(name = "BookSortField")]
pub enum BookSortField {
    #[graphql(name = "title")]
    Title,
    #[graphql(name = "author")]
    Author,
    #[graphql(name = "published_year")]
    PublishedYear,
}

impl BookSortField {
    /// ORDER BY expression for this field. Text fields sort on their folded
    /// copies so non-ASCII letters ignore case too.
    pub fn sort_expression(self) -> &'static str {
        match self {
            BookSortField::Title => "title_folded",
            BookSortField::Author => "author_folded",
            BookSortField::PublishedYear => "published_year",
        }
    }
}

/// Sort direction for ORDER BY clauses.
#[derive(Enum, Copy, Clone, Debug, Default, Eq, PartialEq)]
#[graphql(name = "SortOrder")]
pub enum SortDirection {
    #[default]
    #[graphql(name = "asc")]
    Asc,
    #[graphql(name = "desc")]
    Desc,
}

impl SortDirection {
    /// Convert to SQL order string
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookSort {
    pub field: BookSortField,
    pub direction: SortDirection,
}

impl BookSort {
    pub fn new(field: BookSortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// ORDER BY body for an optional sort. Ties always fall back to id so the
    /// order is total and pages never overlap.
    pub fn order_clause(sort: Option<BookSort>) -> String {
        match sort {
            Some(s) => format!(
                "{} {}, id ASC",
                s.field.sort_expression(),
                s.direction.to_sql()
            ),
            None => "id ASC".to_string(),
        }
    }
}

/// The (skip, limit) subrange of an ordered result set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub skip: i64,
    pub limit: i64,
}

impl Default for Window {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Window {
    /// Build a window; each missing bound takes its own default.
    pub fn new(skip: Option<i64>, limit: Option<i64>) -> CatalogResult<Self> {
        let skip = skip.unwrap_or(0);
        let limit = limit.unwrap_or(DEFAULT_LIMIT);
        if skip < 0 {
            return Err(CatalogError::validation(format!(
                "skip must be non-negative, got {}",
                skip
            )));
        }
        if limit <= 0 {
            return Err(CatalogError::validation(format!(
                "limit must be positive, got {}",
                limit
            )));
        }
        Ok(Self { skip, limit })
    }

    /// Number of rows this window returns out of `total` matches
    pub fn expected_len(&self, total: i64) -> i64 {
        (total - self.skip).clamp(0, self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_window_defaults() {
        assert_eq!(Window::default(), Window { skip: 0, limit: 10 });
        assert_eq!(Window::new(None, None).unwrap(), Window::default());
    }

    #[test]
    fn test_window_fields_default_independently() {
        assert_eq!(Window::new(Some(20), None).unwrap(), Window { skip: 20, limit: 10 });
        assert_eq!(Window::new(None, Some(3)).unwrap(), Window { skip: 0, limit: 3 });
    }

    #[test]
    fn test_window_rejects_negative_skip() {
        assert_matches!(Window::new(Some(-1), None), Err(CatalogError::Validation(_)));
    }

    #[test]
    fn test_window_rejects_non_positive_limit() {
        assert_matches!(Window::new(None, Some(0)), Err(CatalogError::Validation(_)));
        assert_matches!(Window::new(None, Some(-5)), Err(CatalogError::Validation(_)));
    }

    #[test]
    fn test_expected_len() {
        let w = Window { skip: 10, limit: 10 };
        assert_eq!(w.expected_len(12), 2);
        assert_eq!(w.expected_len(25), 10);
        assert_eq!(w.expected_len(5), 0);
    }

    #[test]
    fn test_order_clause() {
        assert_eq!(BookSort::order_clause(None), "id ASC");
        assert_eq!(
            BookSort::order_clause(Some(BookSort::new(
                BookSortField::PublishedYear,
                SortDirection::Desc
            ))),
            "published_year DESC, id ASC"
        );
        assert_eq!(
            BookSort::order_clause(Some(BookSort::new(BookSortField::Title, SortDirection::Asc))),
            "title_folded ASC, id ASC"
        );
    }

    #[test]
    fn test_empty_needles_do_not_restrict() {
        let filter = BookFilter {
            title: Some(String::new()),
            author: Some(String::new()),
            ..Default::default()
        };
        assert!(filter.is_empty());
        assert!(!BookFilter::by_category(1).is_empty());
    }
}
