//! GraphQL authentication context
//!
//! The HTTP handler verifies the bearer token and, when it is valid, stores an
//! [`AuthUser`] in the request data. Resolvers read it back through
//! [`AuthExt`].
//!
//! ## Guards
//!
//! Use `AuthGuard` to require authentication on any GraphQL operation:
//!
//! ```ignore
//! #[graphql(guard = "AuthGuard")]
//! async fn protected_query(&self, ctx: &Context<'_>) -> Result<String> { ... }
//! ```

use async_graphql::{Context, ErrorExtensions, Result};
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Caller identity extracted from a verified access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: i64,
    pub username: String,
}

/// Extension trait to get authenticated user from GraphQL context
pub trait AuthExt {
    /// Get the authenticated user, or an `UNAUTHENTICATED` error
    fn auth_user(&self) -> Result<&AuthUser>;

    /// Get the authenticated user if present
    fn try_auth_user(&self) -> Option<&AuthUser>;
}

impl<'a> AuthExt for Context<'a> {
    fn auth_user(&self) -> Result<&AuthUser> {
        self.data_opt::<AuthUser>()
            .ok_or_else(|| CatalogError::Unauthenticated.extend())
    }

    fn try_auth_user(&self) -> Option<&AuthUser> {
        self.data_opt::<AuthUser>()
    }
}

/// Guard that requires authentication for GraphQL operations.
pub struct AuthGuard;

impl async_graphql::Guard for AuthGuard {
    fn check(&self, ctx: &Context<'_>) -> impl std::future::Future<Output = Result<()>> + Send {
        let result = ctx.auth_user().map(|_| ());
        async move { result }
    }
}
