//! Category database repository

use sqlx::{FromRow, SqliteConnection, SqlitePool};

use super::sqlite_helpers::placeholders;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct CategoryRecord {
    pub id: i64,
    pub name: String,
}

/// Fetch categories for a set of ids. Missing ids are simply absent.
pub async fn fetch_by_ids(
    conn: &mut SqliteConnection,
    ids: &[i64],
) -> Result<Vec<CategoryRecord>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let sql = format!(
        "SELECT id, name FROM categories WHERE id IN ({})",
        placeholders(ids.len())
    );
    let mut query = sqlx::query_as::<_, CategoryRecord>(&sql);
    for id in ids {
        query = query.bind(*id);
    }
    query.fetch_all(&mut *conn).await
}

pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a category. Fails with a unique violation on a duplicate name.
    pub async fn create(&self, name: &str) -> Result<CategoryRecord, sqlx::Error> {
        let result = sqlx::query("INSERT INTO categories (name) VALUES (?)")
            .bind(name)
            .execute(&self.pool)
            .await?;

        Ok(CategoryRecord {
            id: result.last_insert_rowid(),
            name: name.to_string(),
        })
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<CategoryRecord>, sqlx::Error> {
        sqlx::query_as::<_, CategoryRecord>("SELECT id, name FROM categories WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// List all categories in creation order
    pub async fn list_all(&self) -> Result<Vec<CategoryRecord>, sqlx::Error> {
        sqlx::query_as::<_, CategoryRecord>("SELECT id, name FROM categories ORDER BY id")
            .fetch_all(&self.pool)
            .await
    }
}
