use super::prelude::*;

#[derive(Default)]
pub struct BookMutations;

#[Object]
impl BookMutations {
    async fn create_category(&self, ctx: &Context<'_>, category: CategoryInput) -> Result<Category> {
        let service = ctx.data_unchecked::<CatalogService>();
        let record = service
            .create_category(&category.name)
            .await
            .map_err(|e| e.extend())?;
        Ok(record.into())
    }

    async fn create_book(&self, ctx: &Context<'_>, book: BookInput) -> Result<Book> {
        let service = ctx.data_unchecked::<CatalogService>();
        let created = service.create_book(book.into()).await.map_err(|e| e.extend())?;
        Ok(created.into())
    }

    /// Replace title, author and year of a book. `categoryId` is ignored.
    async fn update_book(&self, ctx: &Context<'_>, id: i64, book: BookInput) -> Result<Book> {
        let service = ctx.data_unchecked::<CatalogService>();
        let updated = service
            .update_book(id, book.into())
            .await
            .map_err(|e| e.extend())?;
        Ok(updated.into())
    }

    /// Delete a book and its reviews. False if the book did not exist.
    async fn delete_book(&self, ctx: &Context<'_>, id: i64) -> Result<bool> {
        let service = ctx.data_unchecked::<CatalogService>();
        service.delete_book(id).await.map_err(|e| e.extend())
    }
}
