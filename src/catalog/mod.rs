//! Catalog query engine
//!
//! Resolves the book list: a predicate set, an ordering and a window go in;
//! the total match count and a page of hydrated books come out. Count, window
//! and hydration run in one transaction so `total` and the page describe the
//! same snapshot.

mod query;

use std::collections::HashMap;

use sqlx::SqliteConnection;

pub use query::{BookFilter, BookSort, BookSortField, DEFAULT_LIMIT, SortDirection, Window};

use crate::db::sqlite_helpers::distinct_ids;
use crate::db::{BookRecord, CategoryRecord, Database, ReviewRecord, books, categories, reviews, users};
use crate::error::{CatalogError, CatalogResult};

/// A review annotated with its author's username
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HydratedReview {
    pub id: i64,
    pub content: String,
    pub rating: i32,
    pub user_id: i64,
    pub book_id: i64,
    /// `None` when the author no longer resolves
    pub username: Option<String>,
}

impl HydratedReview {
    fn from_record(record: ReviewRecord, username: Option<String>) -> Self {
        Self {
            id: record.id,
            content: record.content,
            rating: record.rating,
            user_id: record.user_id,
            book_id: record.book_id,
            username,
        }
    }
}

/// A book with its category and reviews attached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HydratedBook {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub published_year: i32,
    pub category_id: i64,
    pub category: Option<CategoryRecord>,
    /// Ordered by review id
    pub reviews: Vec<HydratedReview>,
}

/// One page of the book list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookPage {
    /// Matches before the window was applied
    pub total: i64,
    pub books: Vec<HydratedBook>,
}

/// Attach categories, reviews and review authors to a set of books.
///
/// Three batched reads regardless of how many books there are. Input order
/// is preserved.
pub async fn hydrate(
    conn: &mut SqliteConnection,
    records: Vec<BookRecord>,
) -> Result<Vec<HydratedBook>, sqlx::Error> {
    if records.is_empty() {
        return Ok(Vec::new());
    }

    let book_ids: Vec<i64> = records.iter().map(|b| b.id).collect();
    let category_ids = distinct_ids(records.iter().map(|b| b.category_id));

    let categories: HashMap<i64, CategoryRecord> = categories::fetch_by_ids(conn, &category_ids)
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();

    let review_rows = reviews::fetch_by_book_ids(conn, &book_ids).await?;
    let user_ids = distinct_ids(review_rows.iter().map(|r| r.user_id));
    let usernames = users::fetch_usernames(conn, &user_ids).await?;

    let mut reviews_by_book: HashMap<i64, Vec<HydratedReview>> = HashMap::new();
    for review in review_rows {
        let username = usernames.get(&review.user_id).cloned();
        reviews_by_book
            .entry(review.book_id)
            .or_default()
            .push(HydratedReview::from_record(review, username));
    }

    Ok(records
        .into_iter()
        .map(|book| HydratedBook {
            category: categories.get(&book.category_id).cloned(),
            reviews: reviews_by_book.remove(&book.id).unwrap_or_default(),
            id: book.id,
            title: book.title,
            author: book.author,
            published_year: book.published_year,
            category_id: book.category_id,
        })
        .collect())
}

/// Annotate reviews with their authors' usernames
pub async fn hydrate_reviews(
    conn: &mut SqliteConnection,
    records: Vec<ReviewRecord>,
) -> Result<Vec<HydratedReview>, sqlx::Error> {
    let user_ids = distinct_ids(records.iter().map(|r| r.user_id));
    let usernames = users::fetch_usernames(conn, &user_ids).await?;
    Ok(records
        .into_iter()
        .map(|r| {
            let username = usernames.get(&r.user_id).cloned();
            HydratedReview::from_record(r, username)
        })
        .collect())
}

/// Read side of the catalog
#[derive(Clone)]
pub struct CatalogQueryEngine {
    db: Database,
}

impl CatalogQueryEngine {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Filtered, ordered, windowed and hydrated book list.
    ///
    /// `total` ignores the window. With no sort the list is in id order.
    pub async fn list_books(
        &self,
        filter: &BookFilter,
        sort: Option<BookSort>,
        window: Window,
    ) -> CatalogResult<BookPage> {
        let mut tx = self.db.begin().await?;

        let total = books::count_matching(&mut tx, filter).await?;
        let records = if window.expected_len(total) == 0 {
            Vec::new()
        } else {
            books::fetch_window(&mut tx, filter, sort, window).await?
        };
        let books = hydrate(&mut tx, records).await?;

        tx.commit().await?;

        tracing::debug!(
            total,
            returned = books.len(),
            skip = window.skip,
            limit = window.limit,
            filtered = !filter.is_empty(),
            sorted = sort.is_some(),
            "Resolved book list"
        );

        Ok(BookPage { total, books })
    }

    /// A single hydrated book
    pub async fn get_book(&self, id: i64) -> CatalogResult<HydratedBook> {
        let mut tx = self.db.begin().await?;

        let record = books::fetch_by_id(&mut tx, id)
            .await?
            .ok_or_else(|| CatalogError::not_found("Book", id))?;
        let mut hydrated = hydrate(&mut tx, vec![record]).await?;

        tx.commit().await?;

        hydrated.pop().ok_or_else(|| CatalogError::not_found("Book", id))
    }

    /// Every book in a category, in id order. Unknown categories give an empty list.
    pub async fn books_by_category(&self, category_id: i64) -> CatalogResult<Vec<HydratedBook>> {
        let mut tx = self.db.begin().await?;

        let records = books::fetch_matching(&mut tx, &BookFilter::by_category(category_id)).await?;
        let hydrated = hydrate(&mut tx, records).await?;

        tx.commit().await?;
        Ok(hydrated)
    }

    /// Reviews of one book in id order
    pub async fn reviews_for_book(&self, book_id: i64) -> CatalogResult<Vec<HydratedReview>> {
        let mut tx = self.db.begin().await?;

        let records = reviews::fetch_by_book_ids(&mut tx, &[book_id]).await?;
        let hydrated = hydrate_reviews(&mut tx, records).await?;

        tx.commit().await?;
        Ok(hydrated)
    }

    pub async fn list_categories(&self) -> CatalogResult<Vec<CategoryRecord>> {
        Ok(self.db.categories().list_all().await?)
    }
}
