pub mod books;
pub mod reviews;
pub mod user;

pub use books::BookQueries;
pub use reviews::ReviewQueries;
pub use user::UserQueries;

pub(crate) mod prelude {
    pub(crate) use async_graphql::{Context, ErrorExtensions, Object, Result};

    pub(crate) use crate::catalog::{BookFilter, CatalogQueryEngine};
    pub(crate) use crate::graphql::auth::AuthExt;
    pub(crate) use crate::graphql::filters::*;
    pub(crate) use crate::graphql::types::*;
}
