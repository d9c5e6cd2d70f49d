//! Review database repository

use sqlx::{FromRow, SqliteConnection, SqlitePool};

use super::sqlite_helpers::placeholders;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ReviewRecord {
    pub id: i64,
    pub content: String,
    pub rating: i32,
    pub user_id: i64,
    pub book_id: i64,
}

#[derive(Debug, Clone)]
pub struct CreateReview {
    pub content: String,
    pub rating: i32,
    pub book_id: i64,
    pub user_id: i64,
}

/// Reviews of every listed book, ordered by book then review id
pub async fn fetch_by_book_ids(
    conn: &mut SqliteConnection,
    book_ids: &[i64],
) -> Result<Vec<ReviewRecord>, sqlx::Error> {
    if book_ids.is_empty() {
        return Ok(Vec::new());
    }

    let sql = format!(
        "SELECT id, content, rating, user_id, book_id FROM reviews WHERE book_id IN ({}) ORDER BY book_id, id",
        placeholders(book_ids.len())
    );
    let mut query = sqlx::query_as::<_, ReviewRecord>(&sql);
    for id in book_ids {
        query = query.bind(*id);
    }
    query.fetch_all(&mut *conn).await
}

/// Remove every review of a book, returning how many went
pub async fn delete_by_book(conn: &mut SqliteConnection, book_id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM reviews WHERE book_id = ?")
        .bind(book_id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected())
}

pub struct ReviewRepository {
    pool: SqlitePool,
}

impl ReviewRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a review. Foreign keys are enforced by SQLite.
    pub async fn create(&self, review: CreateReview) -> Result<ReviewRecord, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO reviews (content, rating, user_id, book_id)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&review.content)
        .bind(review.rating)
        .bind(review.user_id)
        .bind(review.book_id)
        .execute(&self.pool)
        .await?;

        Ok(ReviewRecord {
            id: result.last_insert_rowid(),
            content: review.content,
            rating: review.rating,
            user_id: review.user_id,
            book_id: review.book_id,
        })
    }
}
