use super::prelude::*;

#[derive(Default)]
pub struct ReviewQueries;

#[Object]
impl ReviewQueries {
    /// Reviews of a book in the order they were written
    async fn get_reviews(&self, ctx: &Context<'_>, book_id: i64) -> Result<Vec<Review>> {
        let engine = ctx.data_unchecked::<CatalogQueryEngine>();
        let reviews = engine
            .reviews_for_book(book_id)
            .await
            .map_err(|e| e.extend())?;
        Ok(reviews.into_iter().map(Review::from).collect())
    }
}
