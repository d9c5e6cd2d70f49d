//! Shared fixtures for integration tests

#![allow(dead_code)]

use bookshelf::Config;
use bookshelf::db::{CategoryRecord, Database};
use bookshelf::graphql::{AuthUser, BookshelfSchema, build_schema};
use bookshelf::services::{AuthConfig, AuthService, CatalogService, NewBook, NewReview};

pub const TEST_SECRET: &str = "integration-test-secret";

/// Fresh in-memory database with every table created
pub async fn test_db() -> Database {
    let db = Database::in_memory().await.expect("open in-memory db");
    let sync = db.sync_schema().await.expect("sync schema");
    assert!(sync.errors.is_empty(), "schema errors: {:?}", sync.errors);
    db
}

pub fn test_auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: TEST_SECRET.to_string(),
        access_token_lifetime: 300,
        bcrypt_cost: 4,
    }
}

pub fn test_config() -> Config {
    Config {
        host: None,
        port: 0,
        database_url: "sqlite::memory:".to_string(),
        database_max_connections: 1,
        jwt_secret: TEST_SECRET.to_string(),
        access_token_lifetime: 300,
        bcrypt_cost: 4,
    }
}

pub fn test_auth(db: &Database) -> AuthService {
    AuthService::new(db.clone(), test_auth_config())
}

pub fn test_schema(db: &Database) -> BookshelfSchema {
    build_schema(db.clone(), test_auth(db))
}

pub async fn category(db: &Database, name: &str) -> CategoryRecord {
    CatalogService::new(db.clone())
        .create_category(name)
        .await
        .expect("create category")
}

pub async fn book(db: &Database, title: &str, author: &str, year: i32, category_id: i64) -> i64 {
    CatalogService::new(db.clone())
        .create_book(NewBook {
            title: title.to_string(),
            author: author.to_string(),
            published_year: year,
            category_id,
        })
        .await
        .expect("create book")
        .id
}

/// Register a user and return the identity a verified token would carry
pub async fn user(db: &Database, username: &str) -> AuthUser {
    let auth = test_auth(db);
    auth.register(username, "password").await.expect("register");
    let token = auth.login(username, "password").await.expect("login");
    auth.verify_token(&token).expect("verify")
}

/// Reviews stored for a book, read straight from the table
pub async fn review_count(db: &Database, book_id: i64) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM reviews WHERE book_id = ?")
        .bind(book_id)
        .fetch_one(db.pool())
        .await
        .expect("count reviews")
}

pub async fn review(db: &Database, author: &AuthUser, book_id: i64, content: &str, rating: i32) -> i64 {
    CatalogService::new(db.clone())
        .write_review(
            Some(author),
            NewReview {
                content: content.to_string(),
                rating,
                book_id,
            },
        )
        .await
        .expect("write review")
        .id
}

/// Fifteen books over three categories: A holds ids 1..=3, B 4..=9, C 10..=15.
pub struct Library {
    pub a: CategoryRecord,
    pub b: CategoryRecord,
    pub c: CategoryRecord,
    pub book_ids: Vec<i64>,
}

pub async fn fifteen_books(db: &Database) -> Library {
    let a = category(db, "Science Fiction").await;
    let b = category(db, "Fantasy").await;
    let c = category(db, "History").await;

    let rows: [(&str, &str, i32, i64); 15] = [
        ("Dune", "Frank Herbert", 1965, a.id),
        ("Dune Messiah", "Frank Herbert", 1969, a.id),
        ("Neuromancer", "William Gibson", 1984, a.id),
        ("The Hobbit", "J. R. R. Tolkien", 1937, b.id),
        ("A Game of Thrones", "George R. R. Martin", 1996, b.id),
        ("The Name of the Wind", "Patrick Rothfuss", 2007, b.id),
        ("Mistborn", "Brandon Sanderson", 2006, b.id),
        ("Elantris", "Brandon Sanderson", 2005, b.id),
        ("the colour of magic", "Terry Pratchett", 1983, b.id),
        ("SPQR", "Mary Beard", 2015, c.id),
        ("The Guns of August", "Barbara Tuchman", 1962, c.id),
        ("Postwar", "Tony Judt", 2005, c.id),
        ("The Silk Roads", "Peter Frankopan", 2015, c.id),
        ("Team of Rivals", "Doris Kearns Goodwin", 2005, c.id),
        ("1776", "David McCullough", 2005, c.id),
    ];

    let mut book_ids = Vec::with_capacity(rows.len());
    for (title, author, year, category_id) in rows {
        book_ids.push(book(db, title, author, year, category_id).await);
    }

    Library { a, b, c, book_ids }
}
