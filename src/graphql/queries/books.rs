use super::prelude::*;

#[derive(Default)]
pub struct BookQueries;

#[Object]
impl BookQueries {
    /// Filtered, sorted and paginated book list with the total match count
    async fn get_books(
        &self,
        ctx: &Context<'_>,
        pagination: Option<BookPaginationInput>,
        filters: Option<BookFilterInput>,
        sort: Option<BookSortInput>,
    ) -> Result<PaginatedBooks> {
        let engine = ctx.data_unchecked::<CatalogQueryEngine>();
        let window = window_from(pagination).map_err(|e| e.extend())?;
        let filter: BookFilter = filters.map(Into::into).unwrap_or_default();

        let page = engine
            .list_books(&filter, sort.map(Into::into), window)
            .await
            .map_err(|e| e.extend())?;

        Ok(page.into())
    }

    /// A single book by id
    async fn get_book(&self, ctx: &Context<'_>, id: i64) -> Result<Book> {
        let engine = ctx.data_unchecked::<CatalogQueryEngine>();
        let book = engine.get_book(id).await.map_err(|e| e.extend())?;
        Ok(book.into())
    }

    /// Every book in a category
    async fn get_books_by_category(&self, ctx: &Context<'_>, category_id: i64) -> Result<Vec<Book>> {
        let engine = ctx.data_unchecked::<CatalogQueryEngine>();
        let books = engine
            .books_by_category(category_id)
            .await
            .map_err(|e| e.extend())?;
        Ok(books.into_iter().map(Book::from).collect())
    }

    async fn get_categories(&self, ctx: &Context<'_>) -> Result<Vec<Category>> {
        let engine = ctx.data_unchecked::<CatalogQueryEngine>();
        let categories = engine.list_categories().await.map_err(|e| e.extend())?;
        Ok(categories.into_iter().map(Category::from).collect())
    }
}
