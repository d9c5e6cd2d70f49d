//! GraphQL authentication mutations
//!
//! Neither mutation requires an authenticated caller.

use super::prelude::*;

#[derive(Default)]
pub struct AuthMutations;

#[Object]
impl AuthMutations {
    /// Create an account. Returns true on success.
    async fn register(&self, ctx: &Context<'_>, input: RegisterInput) -> Result<bool> {
        let auth = ctx.data_unchecked::<AuthService>();
        auth.register(&input.username, &input.password)
            .await
            .map_err(|e| e.extend())
    }

    /// Exchange credentials for an access token
    async fn login(&self, ctx: &Context<'_>, input: LoginInput) -> Result<AuthPayload> {
        let auth = ctx.data_unchecked::<AuthService>();
        let access_token = auth
            .login(&input.username, &input.password)
            .await
            .map_err(|e| e.extend())?;
        Ok(AuthPayload { access_token })
    }
}
