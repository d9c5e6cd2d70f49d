//! GraphQL type definitions
//!
//! These types mirror the catalog's hydrated records but are decorated with
//! async-graphql attributes.

use async_graphql::{InputObject, SimpleObject};

use crate::catalog::{BookPage, HydratedBook, HydratedReview};
use crate::db::{CategoryRecord, UpdateBook, UserRecord};
use crate::services::{NewBook, NewReview};

// ============================================================================
// Output types
// ============================================================================

#[derive(Debug, Clone, SimpleObject)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

impl From<CategoryRecord> for Category {
    fn from(r: CategoryRecord) -> Self {
        Self {
            id: r.id,
            name: r.name,
        }
    }
}

#[derive(Debug, Clone, SimpleObject)]
pub struct Review {
    pub id: i64,
    pub content: String,
    pub rating: i32,
    pub user_id: i64,
    pub book_id: i64,
    /// Author of the review, null if the account no longer exists
    pub username: Option<String>,
}

impl From<HydratedReview> for Review {
    fn from(r: HydratedReview) -> Self {
        Self {
            id: r.id,
            content: r.content,
            rating: r.rating,
            user_id: r.user_id,
            book_id: r.book_id,
            username: r.username,
        }
    }
}

#[derive(Debug, Clone, SimpleObject)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub published_year: i32,
    pub category_id: i64,
    pub category: Option<Category>,
    pub reviews: Vec<Review>,
}

impl From<HydratedBook> for Book {
    fn from(b: HydratedBook) -> Self {
        Self {
            id: b.id,
            title: b.title,
            author: b.author,
            published_year: b.published_year,
            category_id: b.category_id,
            category: b.category.map(Category::from),
            reviews: b.reviews.into_iter().map(Review::from).collect(),
        }
    }
}

/// One page of books plus the unwindowed match count
#[derive(Debug, Clone, SimpleObject)]
pub struct PaginatedBooks {
    pub total: i64,
    pub books: Vec<Book>,
}

impl From<BookPage> for PaginatedBooks {
    fn from(page: BookPage) -> Self {
        Self {
            total: page.total,
            books: page.books.into_iter().map(Book::from).collect(),
        }
    }
}

#[derive(Debug, Clone, SimpleObject)]
pub struct AuthPayload {
    pub access_token: String,
}

#[derive(Debug, Clone, SimpleObject)]
pub struct User {
    pub id: i64,
    pub username: String,
}

impl From<UserRecord> for User {
    fn from(r: UserRecord) -> Self {
        Self {
            id: r.id,
            username: r.username,
        }
    }
}

// ============================================================================
// Input types
// ============================================================================

#[derive(Debug, Clone, InputObject)]
pub struct BookInput {
    pub title: String,
    pub author: String,
    pub published_year: i32,
    pub category_id: i64,
}

impl From<BookInput> for NewBook {
    fn from(input: BookInput) -> Self {
        Self {
            title: input.title,
            author: input.author,
            published_year: input.published_year,
            category_id: input.category_id,
        }
    }
}

/// `updateBook` takes the same input as `createBook`. The category is fixed
/// once a book exists, so `category_id` is dropped here.
impl From<BookInput> for UpdateBook {
    fn from(input: BookInput) -> Self {
        Self {
            title: input.title,
            author: input.author,
            published_year: input.published_year,
        }
    }
}

#[derive(Debug, Clone, InputObject)]
pub struct CategoryInput {
    pub name: String,
}

#[derive(Debug, Clone, InputObject)]
pub struct ReviewInput {
    pub content: String,
    pub rating: i32,
    pub book_id: i64,
}

impl From<ReviewInput> for NewReview {
    fn from(input: ReviewInput) -> Self {
        Self {
            content: input.content,
            rating: input.rating,
            book_id: input.book_id,
        }
    }
}

#[derive(Debug, Clone, InputObject)]
pub struct RegisterInput {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, InputObject)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}
