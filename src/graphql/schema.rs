//! GraphQL schema definition
//!
//! Reads are open. `writeReview` needs a caller identity; everything else
//! ignores it.

use async_graphql::{EmptySubscription, MergedObject, Schema};

use crate::catalog::CatalogQueryEngine;
use crate::db::Database;
use crate::services::{AuthService, CatalogService};

use super::mutations::{AuthMutations, BookMutations, ReviewMutations};
use super::queries::{BookQueries, ReviewQueries, UserQueries};

/// The GraphQL schema type
pub type BookshelfSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

#[derive(MergedObject, Default)]
pub struct QueryRoot(BookQueries, ReviewQueries, UserQueries);

#[derive(MergedObject, Default)]
pub struct MutationRoot(AuthMutations, BookMutations, ReviewMutations);

/// Build the GraphQL schema with all resolvers
pub fn build_schema(db: Database, auth: AuthService) -> BookshelfSchema {
    Schema::build(QueryRoot::default(), MutationRoot::default(), EmptySubscription)
        .data(CatalogService::new(db.clone()))
        .data(CatalogQueryEngine::new(db))
        .data(auth)
        .finish()
}
