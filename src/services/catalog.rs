//! Write side of the catalog: categories, books and reviews

use crate::catalog::{HydratedBook, HydratedReview, hydrate, hydrate_reviews};
use crate::db::{CategoryRecord, CreateBook, CreateReview, Database, UpdateBook};
use crate::error::{CatalogError, CatalogResult};
use crate::graphql::auth::AuthUser;

/// Fields of a new book
#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub published_year: i32,
    pub category_id: i64,
}

/// Fields of a new review. The author comes from the caller identity.
#[derive(Debug, Clone)]
pub struct NewReview {
    pub content: String,
    pub rating: i32,
    pub book_id: i64,
}

fn require_text(field: &str, value: &str) -> CatalogResult<()> {
    if value.trim().is_empty() {
        return Err(CatalogError::validation(format!("{} must not be empty", field)));
    }
    Ok(())
}

#[derive(Clone)]
pub struct CatalogService {
    db: Database,
}

impl CatalogService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn create_category(&self, name: &str) -> CatalogResult<CategoryRecord> {
        require_text("name", name)?;

        let category = self.db.categories().create(name).await.map_err(|e| {
            CatalogError::unique_or_database(e, format!("Category '{}' already exists", name))
        })?;

        tracing::info!(category_id = category.id, name = %category.name, "Category created");
        Ok(category)
    }

    /// Create a book in an existing category. The result has no reviews.
    pub async fn create_book(&self, book: NewBook) -> CatalogResult<HydratedBook> {
        require_text("title", &book.title)?;
        require_text("author", &book.author)?;

        let category = self
            .db
            .categories()
            .get_by_id(book.category_id)
            .await?
            .ok_or_else(|| CatalogError::not_found("Category", book.category_id))?;

        let record = self
            .db
            .books()
            .create(CreateBook {
                title: book.title,
                author: book.author,
                published_year: book.published_year,
                category_id: book.category_id,
            })
            .await?;

        tracing::info!(book_id = record.id, category_id = category.id, "Book created");

        Ok(HydratedBook {
            id: record.id,
            title: record.title,
            author: record.author,
            published_year: record.published_year,
            category_id: record.category_id,
            category: Some(category),
            reviews: Vec::new(),
        })
    }

    /// Overwrite title, author and year of an existing book
    pub async fn update_book(&self, id: i64, update: UpdateBook) -> CatalogResult<HydratedBook> {
        require_text("title", &update.title)?;
        require_text("author", &update.author)?;

        let record = self
            .db
            .books()
            .update(id, update)
            .await?
            .ok_or_else(|| CatalogError::not_found("Book", id))?;

        tracing::info!(book_id = id, "Book updated");

        let mut conn = self.db.pool().acquire().await?;
        let mut hydrated = hydrate(&mut conn, vec![record]).await?;
        hydrated.pop().ok_or_else(|| CatalogError::not_found("Book", id))
    }

    /// Delete a book and its reviews. `false` when no book had this id.
    pub async fn delete_book(&self, id: i64) -> CatalogResult<bool> {
        Ok(self.db.books().delete(id).await?)
    }

    /// Post a review as the calling user
    pub async fn write_review(
        &self,
        caller: Option<&AuthUser>,
        review: NewReview,
    ) -> CatalogResult<HydratedReview> {
        let caller = caller.ok_or(CatalogError::Unauthenticated)?;
        require_text("content", &review.content)?;

        if self.db.books().get_by_id(review.book_id).await?.is_none() {
            return Err(CatalogError::not_found("Book", review.book_id));
        }

        let record = self
            .db
            .reviews()
            .create(CreateReview {
                content: review.content,
                rating: review.rating,
                book_id: review.book_id,
                user_id: caller.user_id,
            })
            .await?;

        tracing::info!(
            review_id = record.id,
            book_id = record.book_id,
            user_id = record.user_id,
            "Review written"
        );

        let mut conn = self.db.pool().acquire().await?;
        let mut hydrated = hydrate_reviews(&mut conn, vec![record]).await?;
        hydrated
            .pop()
            .ok_or_else(|| CatalogError::Internal(anyhow::anyhow!("Stored review vanished")))
    }
}
