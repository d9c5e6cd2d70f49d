//! Users repository for authentication

use std::collections::HashMap;

use sqlx::{FromRow, SqliteConnection, SqlitePool};

use super::sqlite_helpers::placeholders;

#[derive(Debug, Clone, FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    pub hashed_password: String,
}

#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub hashed_password: String,
}

/// Usernames for a set of user ids. Unknown ids are absent from the map.
pub async fn fetch_usernames(
    conn: &mut SqliteConnection,
    ids: &[i64],
) -> Result<HashMap<i64, String>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let sql = format!(
        "SELECT id, username FROM users WHERE id IN ({})",
        placeholders(ids.len())
    );
    let mut query = sqlx::query_as::<_, (i64, String)>(&sql);
    for id in ids {
        query = query.bind(*id);
    }
    let rows = query.fetch_all(&mut *conn).await?;
    Ok(rows.into_iter().collect())
}

pub struct UsersRepository {
    pool: SqlitePool,
}

impl UsersRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new user. Fails with a unique violation on a taken username.
    pub async fn create(&self, user: CreateUser) -> Result<UserRecord, sqlx::Error> {
        let result = sqlx::query("INSERT INTO users (username, hashed_password) VALUES (?, ?)")
            .bind(&user.username)
            .bind(&user.hashed_password)
            .execute(&self.pool)
            .await?;

        Ok(UserRecord {
            id: result.last_insert_rowid(),
            username: user.username,
            hashed_password: user.hashed_password,
        })
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i64) -> Result<Option<UserRecord>, sqlx::Error> {
        sqlx::query_as::<_, UserRecord>(
            "SELECT id, username, hashed_password FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Get user by username (exact match)
    pub async fn get_by_username(&self, username: &str) -> Result<Option<UserRecord>, sqlx::Error> {
        sqlx::query_as::<_, UserRecord>(
            "SELECT id, username, hashed_password FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
    }
}
