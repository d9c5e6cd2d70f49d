//! SQLite helper utilities for building dynamic queries
//!
//! Filters collect their WHERE fragments as strings with positional `?`
//! placeholders and the values to bind, in the same order.

use sqlx::Sqlite;
use sqlx::query::Query;
use sqlx::sqlite::SqliteArguments;

/// Escape character used in every LIKE built by [`contains_pattern`]
pub const LIKE_ESCAPE: char = '\\';

// ============================================================================
// Bind values
// ============================================================================

/// Represents a SQL value that can be bound to a query.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    String(String),
    Int(i64),
}

impl SqlValue {
    /// Bind this value to a sqlx query builder
    pub fn bind_to_query<'q>(
        &'q self,
        query: Query<'q, Sqlite, SqliteArguments<'q>>,
    ) -> Query<'q, Sqlite, SqliteArguments<'q>> {
        match self {
            SqlValue::String(s) => query.bind(s.as_str()),
            SqlValue::Int(i) => query.bind(*i),
        }
    }
}

/// Bind every value in order
pub fn bind_all<'q>(
    mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    values: &'q [SqlValue],
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    for value in values {
        query = value.bind_to_query(query);
    }
    query
}

// ============================================================================
// Query Building Helpers
// ============================================================================

/// Build a `%needle%` LIKE pattern with wildcard characters escaped so the
/// needle is matched literally.
pub fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if c == '%' || c == '_' || c == LIKE_ESCAPE {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Substring condition on `column`, one placeholder. Pair it with a
/// `*_folded` column and a needle passed through [`fold_case`].
pub fn contains_sql(column: &str) -> String {
    format!("{} LIKE ? ESCAPE '{}'", column, LIKE_ESCAPE)
}

/// Full Unicode lowercase form stored in `*_folded` columns and used for
/// needles. SQLite's own `LOWER` only folds ASCII.
pub fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

/// `?, ?, ?` for an IN list
pub fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

/// Sorted, deduplicated ids for batch fetches
pub fn distinct_ids(ids: impl IntoIterator<Item = i64>) -> Vec<i64> {
    let mut ids: Vec<i64> = ids.into_iter().collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}
