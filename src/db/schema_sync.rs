//! Startup table creation
//!
//! Every table is created with `CREATE TABLE IF NOT EXISTS`, so running the
//! sync against an existing database is a no-op. Columns listed in
//! `TableDef::added_columns` are appended to older tables with
//! `ALTER TABLE .. ADD COLUMN`. Column renames or type changes are not handled.

use sqlx::SqlitePool;
use tracing::{debug, info, warn};

/// A column that was introduced after the table's first release
#[derive(Debug, Clone, Copy)]
pub struct ColumnDef {
    pub name: &'static str,
    /// Type and constraints as written after the column name
    pub definition: &'static str,
}

/// A table (and its indexes) owned by this service
#[derive(Debug, Clone, Copy)]
pub struct TableDef {
    pub name: &'static str,
    pub create_sql: &'static str,
    pub indexes: &'static [&'static str],
    /// Must also appear in `create_sql`. NOT NULL columns need a DEFAULT.
    pub added_columns: &'static [ColumnDef],
}

/// Tables in dependency order: referenced tables come first.
pub const TABLES: &[TableDef] = &[
    TableDef {
        name: "categories",
        create_sql: r#"
            CREATE TABLE IF NOT EXISTS categories (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              name TEXT NOT NULL UNIQUE
            )
        "#,
        indexes: &[],
        added_columns: &[],
    },
    TableDef {
        name: "users",
        create_sql: r#"
            CREATE TABLE IF NOT EXISTS users (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              username TEXT NOT NULL UNIQUE,
              hashed_password TEXT NOT NULL
            )
        "#,
        indexes: &[],
        added_columns: &[],
    },
    TableDef {
        name: "books",
        create_sql: r#"
            CREATE TABLE IF NOT EXISTS books (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              title TEXT NOT NULL,
              author TEXT NOT NULL,
              published_year INTEGER NOT NULL,
              category_id INTEGER NOT NULL REFERENCES categories(id),
              title_folded TEXT NOT NULL DEFAULT '',
              author_folded TEXT NOT NULL DEFAULT ''
            )
        "#,
        indexes: &["CREATE INDEX IF NOT EXISTS idx_books_category_id ON books(category_id)"],
        added_columns: &[
            ColumnDef {
                name: "title_folded",
                definition: "TEXT NOT NULL DEFAULT ''",
            },
            ColumnDef {
                name: "author_folded",
                definition: "TEXT NOT NULL DEFAULT ''",
            },
        ],
    },
    TableDef {
        name: "reviews",
        create_sql: r#"
            CREATE TABLE IF NOT EXISTS reviews (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              content TEXT NOT NULL,
              rating INTEGER NOT NULL,
              user_id INTEGER NOT NULL REFERENCES users(id),
              book_id INTEGER NOT NULL REFERENCES books(id)
            )
        "#,
        indexes: &["CREATE INDEX IF NOT EXISTS idx_reviews_book_id ON reviews(book_id)"],
        added_columns: &[],
    },
];

/// Result of a schema sync operation
#[derive(Debug, Default)]
pub struct SchemaSyncResult {
    pub tables_created: Vec<String>,
    pub columns_added: Vec<(String, String)>, // (table, column)
    pub errors: Vec<String>,
}

/// Check if a table exists in the database
async fn table_exists(pool: &SqlitePool, table_name: &str) -> Result<bool, sqlx::Error> {
    let result: Option<(String,)> =
        sqlx::query_as("SELECT name FROM sqlite_master WHERE type='table' AND name = ?")
            .bind(table_name)
            .fetch_optional(pool)
            .await?;

    Ok(result.is_some())
}

/// Get existing columns for a table
async fn get_table_columns(
    pool: &SqlitePool,
    table_name: &str,
) -> Result<Vec<String>, sqlx::Error> {
    let rows: Vec<(i32, String, String, i32, Option<String>, i32)> =
        sqlx::query_as(&format!("PRAGMA table_info({})", table_name))
            .fetch_all(pool)
            .await?;

    Ok(rows.into_iter().map(|(_, name, _, _, _, _)| name).collect())
}

/// Append any `added_columns` an older copy of the table lacks
async fn sync_columns(
    pool: &SqlitePool,
    table: &TableDef,
    result: &mut SchemaSyncResult,
) -> Result<(), sqlx::Error> {
    if table.added_columns.is_empty() {
        return Ok(());
    }

    let existing = get_table_columns(pool, table.name).await?;
    for column in table.added_columns {
        if existing.iter().any(|c| c == column.name) {
            continue;
        }

        let alter_sql = format!(
            "ALTER TABLE {} ADD COLUMN {} {}",
            table.name, column.name, column.definition
        );
        debug!("Adding column to {}: {}", table.name, alter_sql);

        match sqlx::query(&alter_sql).execute(pool).await {
            Ok(_) => {
                info!("Added column {}.{}", table.name, column.name);
                result
                    .columns_added
                    .push((table.name.to_string(), column.name.to_string()));
            }
            Err(e) => {
                let msg = format!("Failed to add column {}.{}: {}", table.name, column.name, e);
                warn!("{}", msg);
                result.errors.push(msg);
            }
        }
    }

    Ok(())
}

/// Create any missing table and index. Failures are collected rather than
/// aborting so the caller can log all of them at once.
pub async fn sync_schema(pool: &SqlitePool) -> Result<SchemaSyncResult, sqlx::Error> {
    let mut result = SchemaSyncResult::default();

    for table in TABLES {
        let existed = table_exists(pool, table.name).await?;
        debug!(table = table.name, existed, "Syncing table");

        if let Err(e) = sqlx::query(table.create_sql).execute(pool).await {
            let msg = format!("Failed to create table {}: {}", table.name, e);
            warn!("{}", msg);
            result.errors.push(msg);
            continue;
        }
        if existed {
            sync_columns(pool, table, &mut result).await?;
        } else {
            info!("Created table: {}", table.name);
            result.tables_created.push(table.name.to_string());
        }

        for index_sql in table.indexes {
            if let Err(e) = sqlx::query(index_sql).execute(pool).await {
                let msg = format!("Failed to create index on {}: {}", table.name, e);
                warn!("{}", msg);
                result.errors.push(msg);
            }
        }
    }

    Ok(result)
}
