//! Book database repository

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqliteConnection, SqlitePool};

use super::sqlite_helpers::{SqlValue, bind_all, contains_pattern, contains_sql, fold_case};
use crate::catalog::{BookFilter, BookSort, Window};

const BOOK_COLUMNS: &str = "id, title, author, published_year, category_id";

/// Book record from database
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct BookRecord {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub published_year: i32,
    pub category_id: i64,
}

/// Input for creating a book
#[derive(Debug, Clone)]
pub struct CreateBook {
    pub title: String,
    pub author: String,
    pub published_year: i32,
    pub category_id: i64,
}

/// Fields an update may overwrite. The category is fixed at creation.
#[derive(Debug, Clone)]
pub struct UpdateBook {
    pub title: String,
    pub author: String,
    pub published_year: i32,
}

impl BookFilter {
    /// WHERE fragments and their bind values, in placeholder order
    pub fn to_sql_conditions(&self) -> (Vec<String>, Vec<SqlValue>) {
        let mut conditions = Vec::new();
        let mut values = Vec::new();

        if let Some(title) = self.title_needle() {
            conditions.push(contains_sql("title_folded"));
            values.push(SqlValue::String(contains_pattern(&fold_case(title))));
        }
        if let Some(author) = self.author_needle() {
            conditions.push(contains_sql("author_folded"));
            values.push(SqlValue::String(contains_pattern(&fold_case(author))));
        }
        if let Some(category_id) = self.category_id {
            conditions.push("category_id = ?".to_string());
            values.push(SqlValue::Int(category_id));
        }
        if let Some(year) = self.published_year {
            conditions.push("published_year = ?".to_string());
            values.push(SqlValue::Int(year.into()));
        }

        (conditions, values)
    }

    fn where_clause(&self) -> (String, Vec<SqlValue>) {
        if self.is_empty() {
            return (String::new(), Vec::new());
        }
        let (conditions, values) = self.to_sql_conditions();
        (format!(" WHERE {}", conditions.join(" AND ")), values)
    }
}

fn decode_rows(rows: &[SqliteRow]) -> Result<Vec<BookRecord>, sqlx::Error> {
    rows.iter().map(BookRecord::from_row).collect()
}

// ============================================================================
// Snapshot reads (caller-supplied connection)
// ============================================================================

/// Count books matching the predicate set
pub async fn count_matching(
    conn: &mut SqliteConnection,
    filter: &BookFilter,
) -> Result<i64, sqlx::Error> {
    let (where_sql, values) = filter.where_clause();
    let sql = format!("SELECT COUNT(*) FROM books{}", where_sql);
    tracing::debug!(sql = %sql, "Executing count query");

    let row = bind_all(sqlx::query(&sql), &values)
        .fetch_one(&mut *conn)
        .await?;
    row.try_get(0)
}

/// Fetch the ordered window of books matching the predicate set
pub async fn fetch_window(
    conn: &mut SqliteConnection,
    filter: &BookFilter,
    sort: Option<BookSort>,
    window: Window,
) -> Result<Vec<BookRecord>, sqlx::Error> {
    let (where_sql, mut values) = filter.where_clause();
    let sql = format!(
        "SELECT {} FROM books{} ORDER BY {} LIMIT ? OFFSET ?",
        BOOK_COLUMNS,
        where_sql,
        BookSort::order_clause(sort)
    );
    values.push(SqlValue::Int(window.limit));
    values.push(SqlValue::Int(window.skip));
    tracing::debug!(sql = %sql, skip = window.skip, limit = window.limit, "Executing book window query");

    let rows = bind_all(sqlx::query(&sql), &values)
        .fetch_all(&mut *conn)
        .await?;
    decode_rows(&rows)
}

/// Fetch every book matching the predicate set in id order
pub async fn fetch_matching(
    conn: &mut SqliteConnection,
    filter: &BookFilter,
) -> Result<Vec<BookRecord>, sqlx::Error> {
    let (where_sql, values) = filter.where_clause();
    let sql = format!("SELECT {} FROM books{} ORDER BY id ASC", BOOK_COLUMNS, where_sql);

    let rows = bind_all(sqlx::query(&sql), &values)
        .fetch_all(&mut *conn)
        .await?;
    decode_rows(&rows)
}

/// Point lookup on a caller-supplied connection
pub async fn fetch_by_id(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<Option<BookRecord>, sqlx::Error> {
    let sql = format!("SELECT {} FROM books WHERE id = ?", BOOK_COLUMNS);
    sqlx::query_as::<_, BookRecord>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
}

/// Fill `title_folded`/`author_folded` on rows written before those columns
/// existed. Returns how many rows were touched.
pub async fn refold_stale_rows(pool: &SqlitePool) -> Result<u64, sqlx::Error> {
    let stale: Vec<(i64, String, String)> = sqlx::query_as(
        "SELECT id, title, author FROM books \
         WHERE (title_folded = '' AND title <> '') OR (author_folded = '' AND author <> '')",
    )
    .fetch_all(pool)
    .await?;

    if stale.is_empty() {
        return Ok(0);
    }

    let mut tx = pool.begin().await?;
    for (id, title, author) in &stale {
        sqlx::query("UPDATE books SET title_folded = ?, author_folded = ? WHERE id = ?")
            .bind(fold_case(title))
            .bind(fold_case(author))
            .bind(id)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;

    tracing::info!(rows = stale.len(), "Backfilled folded book columns");
    Ok(stale.len() as u64)
}

// ============================================================================
// Repository
// ============================================================================

pub struct BookRepository {
    pool: SqlitePool,
}

impl BookRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a book by ID
    pub async fn get_by_id(&self, id: i64) -> Result<Option<BookRecord>, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        fetch_by_id(&mut conn, id).await
    }

    /// Insert a book and return the stored row
    pub async fn create(&self, book: CreateBook) -> Result<BookRecord, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO books (title, author, published_year, category_id, title_folded, author_folded)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.published_year)
        .bind(book.category_id)
        .bind(fold_case(&book.title))
        .bind(fold_case(&book.author))
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        Ok(BookRecord {
            id,
            title: book.title,
            author: book.author,
            published_year: book.published_year,
            category_id: book.category_id,
        })
    }

    /// Overwrite title, author and year. Returns `None` if no book has this id.
    pub async fn update(
        &self,
        id: i64,
        update: UpdateBook,
    ) -> Result<Option<BookRecord>, sqlx::Error> {
        let sql = format!(
            "UPDATE books SET title = ?, author = ?, published_year = ?, title_folded = ?, author_folded = ? \
             WHERE id = ? RETURNING {}",
            BOOK_COLUMNS
        );
        sqlx::query_as::<_, BookRecord>(&sql)
            .bind(&update.title)
            .bind(&update.author)
            .bind(update.published_year)
            .bind(fold_case(&update.title))
            .bind(fold_case(&update.author))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Delete a book together with its reviews. Returns whether the book existed.
    pub async fn delete(&self, id: i64) -> Result<bool, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let reviews_removed = super::reviews::delete_by_book(&mut tx, id).await?;
        let result = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        let removed = result.rows_affected() > 0;
        if removed {
            tracing::info!(book_id = id, reviews_removed, "Book deleted");
        }
        Ok(removed)
    }
}
