use super::prelude::*;

#[derive(Default)]
pub struct ReviewMutations;

#[Object]
impl ReviewMutations {
    /// Review a book as the calling user
    #[graphql(guard = "AuthGuard")]
    async fn write_review(&self, ctx: &Context<'_>, review: ReviewInput) -> Result<Review> {
        let service = ctx.data_unchecked::<CatalogService>();
        let written = service
            .write_review(ctx.try_auth_user(), review.into())
            .await
            .map_err(|e| e.extend())?;
        Ok(written.into())
    }
}
