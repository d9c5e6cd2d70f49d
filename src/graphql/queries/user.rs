use super::prelude::*;
use crate::services::AuthService;

#[derive(Default)]
pub struct UserQueries;

#[Object]
impl UserQueries {
    /// The calling user, or null without a valid token
    async fn me(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        let Some(caller) = ctx.try_auth_user() else {
            return Ok(None);
        };
        let auth = ctx.data_unchecked::<AuthService>();
        let user = auth.current_user(caller).await.map_err(|e| e.extend())?;
        Ok(user.map(User::from))
    }
}
