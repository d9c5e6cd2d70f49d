//! End-to-end tests through the GraphQL schema and the HTTP router

mod common;

use async_graphql::{Request, Value, Variables};
use axum::body::Body;
use axum::http::{Request as HttpRequest, StatusCode, header};
use pretty_assertions::assert_eq;
use serde_json::json;
use tower::ServiceExt;

use bookshelf::graphql::BookshelfSchema;
use bookshelf::{AppState, build_app};
use common::*;

async fn run(schema: &BookshelfSchema, query: &str, variables: serde_json::Value) -> async_graphql::Response {
    schema
        .execute(Request::new(query).variables(Variables::from_json(variables)))
        .await
}

fn data(response: async_graphql::Response) -> serde_json::Value {
    assert!(response.errors.is_empty(), "errors: {:?}", response.errors);
    response.data.into_json().expect("data as json")
}

fn error_code(response: &async_graphql::Response) -> Option<Value> {
    response
        .errors
        .first()
        .and_then(|e| e.extensions.as_ref())
        .and_then(|ext| ext.get("code").cloned())
}

const GET_BOOKS: &str = r#"
    query Books($pagination: BookPaginationInput, $filters: BookFilterInput, $sort: BookSortInput) {
        getBooks(pagination: $pagination, filters: $filters, sort: $sort) {
            total
            books { id title publishedYear category { name } reviews { rating username } }
        }
    }
"#;

#[tokio::test]
async fn test_get_books_defaults_and_filters() {
    let db = test_db().await;
    let lib = fifteen_books(&db).await;
    let schema = test_schema(&db);

    let all = data(run(&schema, GET_BOOKS, json!({})).await);
    assert_eq!(all["getBooks"]["total"], json!(15));
    assert_eq!(all["getBooks"]["books"].as_array().map(Vec::len), Some(10));

    let skipped = data(run(&schema, GET_BOOKS, json!({ "pagination": { "skip": 10 } })).await);
    assert_eq!(skipped["getBooks"]["books"].as_array().map(Vec::len), Some(5));

    let in_a = data(
        run(&schema, GET_BOOKS, json!({ "filters": { "categoryId": lib.a.id } })).await,
    );
    assert_eq!(in_a["getBooks"]["total"], json!(3));
    assert_eq!(
        in_a["getBooks"]["books"][0]["category"]["name"],
        json!("Science Fiction")
    );
}

#[tokio::test]
async fn test_get_books_sort_uses_wire_enum_values() {
    let db = test_db().await;
    fifteen_books(&db).await;
    let schema = test_schema(&db);

    let result = data(
        run(
            &schema,
            GET_BOOKS,
            json!({
                "pagination": { "limit": 1 },
                "sort": { "field": "published_year", "order": "asc" }
            }),
        )
        .await,
    );
    assert_eq!(result["getBooks"]["books"][0]["title"], json!("The Hobbit"));

    let result = data(
        run(
            &schema,
            GET_BOOKS,
            json!({ "pagination": { "limit": 1 }, "sort": { "field": "title" } }),
        )
        .await,
    );
    assert_eq!(result["getBooks"]["books"][0]["title"], json!("1776"));
}

#[tokio::test]
async fn test_bad_pagination_is_validation_error() {
    let db = test_db().await;
    let schema = test_schema(&db);

    let response = run(&schema, GET_BOOKS, json!({ "pagination": { "skip": -1 } })).await;
    assert_eq!(error_code(&response), Some(Value::from("VALIDATION_ERROR")));

    let response = run(&schema, GET_BOOKS, json!({ "pagination": { "limit": 0 } })).await;
    assert_eq!(error_code(&response), Some(Value::from("VALIDATION_ERROR")));
}

#[tokio::test]
async fn test_get_book_not_found_code() {
    let db = test_db().await;
    let schema = test_schema(&db);

    let response = run(&schema, "{ getBook(id: 42) { id } }", json!({})).await;
    assert_eq!(error_code(&response), Some(Value::from("NOT_FOUND")));
}

#[tokio::test]
async fn test_write_review_requires_authentication() {
    let db = test_db().await;
    let lib = fifteen_books(&db).await;
    let schema = test_schema(&db);

    let mutation = r#"
        mutation Write($review: ReviewInput!) {
            writeReview(review: $review) { id username }
        }
    "#;
    let variables = json!({ "review": { "content": "Nice", "rating": 4, "bookId": lib.book_ids[0] } });

    let response = run(&schema, mutation, variables.clone()).await;
    assert_eq!(error_code(&response), Some(Value::from("UNAUTHENTICATED")));
    assert_eq!(review_count(&db, lib.book_ids[0]).await, 0);

    let alice = user(&db, "alice").await;
    let response = schema
        .execute(
            Request::new(mutation)
                .variables(Variables::from_json(variables))
                .data(alice),
        )
        .await;
    let written = data(response);
    assert_eq!(written["writeReview"]["username"], json!("alice"));
}

#[tokio::test]
async fn test_register_login_and_me() {
    let db = test_db().await;
    let schema = test_schema(&db);

    let registered = data(
        run(
            &schema,
            r#"mutation { register(input: { username: "carol", password: "secret" }) }"#,
            json!({}),
        )
        .await,
    );
    assert_eq!(registered["register"], json!(true));

    let duplicate = run(
        &schema,
        r#"mutation { register(input: { username: "carol", password: "other" }) }"#,
        json!({}),
    )
    .await;
    assert_eq!(error_code(&duplicate), Some(Value::from("CONFLICT")));

    let wrong = run(
        &schema,
        r#"mutation { login(input: { username: "carol", password: "nope" }) { accessToken } }"#,
        json!({}),
    )
    .await;
    assert_eq!(error_code(&wrong), Some(Value::from("INVALID_CREDENTIALS")));

    let anonymous = data(run(&schema, "{ me { id username } }", json!({})).await);
    assert_eq!(anonymous["me"], json!(null));
}

#[tokio::test]
async fn test_book_mutations_through_schema() {
    let db = test_db().await;
    let schema = test_schema(&db);

    let category = data(
        run(
            &schema,
            r#"mutation { createCategory(category: { name: "Essays" }) { id name } }"#,
            json!({}),
        )
        .await,
    );
    let category_id = category["createCategory"]["id"].clone();

    let created = data(
        run(
            &schema,
            r#"mutation Create($book: BookInput!) {
                createBook(book: $book) { id title category { name } reviews { id } }
            }"#,
            json!({ "book": {
                "title": "Consider the Lobster",
                "author": "David Foster Wallace",
                "publishedYear": 2005,
                "categoryId": category_id
            }}),
        )
        .await,
    );
    assert_eq!(created["createBook"]["category"]["name"], json!("Essays"));
    assert_eq!(created["createBook"]["reviews"], json!([]));
    let book_id = created["createBook"]["id"].clone();

    let updated = data(
        run(
            &schema,
            r#"mutation Update($id: Int!, $book: BookInput!) {
                updateBook(id: $id, book: $book) { title publishedYear category { name } }
            }"#,
            json!({ "id": book_id, "book": {
                "title": "Consider the Lobster and Other Essays",
                "author": "David Foster Wallace",
                "publishedYear": 2006,
                "categoryId": category_id
            }}),
        )
        .await,
    );
    assert_eq!(updated["updateBook"]["publishedYear"], json!(2006));
    assert_eq!(updated["updateBook"]["category"]["name"], json!("Essays"));

    let deleted = data(
        run(
            &schema,
            "mutation Delete($id: Int!) { deleteBook(id: $id) }",
            json!({ "id": book_id }),
        )
        .await,
    );
    assert_eq!(deleted["deleteBook"], json!(true));

    let gone = run(
        &schema,
        "query Get($id: Int!) { getBook(id: $id) { id } }",
        json!({ "id": book_id }),
    )
    .await;
    assert_eq!(error_code(&gone), Some(Value::from("NOT_FOUND")));
}

const UPDATE_BOOK: &str = r#"
  mutation UpdateBook($id: Int!, $book: BookInput!) {
    updateBook(id: $id, book: $book) {
      id
      title
      author
    }
  }
"#;

#[tokio::test]
async fn test_update_book_accepts_create_input_and_keeps_category() {
    let db = test_db().await;
    let lib = fifteen_books(&db).await;
    let schema = test_schema(&db);
    let dune = lib.book_ids[0];

    let updated = data(
        run(
            &schema,
            UPDATE_BOOK,
            json!({ "id": dune, "book": {
                "title": "Dune (Deluxe Edition)",
                "author": "Frank Herbert",
                "publishedYear": 2019,
                "categoryId": lib.c.id
            }}),
        )
        .await,
    );
    assert_eq!(
        updated["updateBook"],
        json!({ "id": dune, "title": "Dune (Deluxe Edition)", "author": "Frank Herbert" })
    );

    let book = data(
        run(
            &schema,
            "query Get($id: Int!) { getBook(id: $id) { publishedYear categoryId category { name } } }",
            json!({ "id": dune }),
        )
        .await,
    );
    assert_eq!(
        book["getBook"],
        json!({ "publishedYear": 2019, "categoryId": lib.a.id, "category": { "name": "Science Fiction" } })
    );

    let missing = run(
        &schema,
        UPDATE_BOOK,
        json!({ "id": 9999, "book": {
            "title": "Nothing",
            "author": "Nobody",
            "publishedYear": 2000,
            "categoryId": lib.a.id
        }}),
    )
    .await;
    assert_eq!(error_code(&missing), Some(Value::from("NOT_FOUND")));
}

// ============================================================================
// HTTP
// ============================================================================

async fn post_graphql(
    app: axum::Router,
    body: serde_json::Value,
    token: Option<&str>,
) -> serde_json::Value {
    let mut builder = HttpRequest::builder()
        .method("POST")
        .uri("/graphql")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let response = app
        .oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_http_bearer_token_identifies_caller() {
    let db = test_db().await;
    let app = build_app(AppState::new(&test_config(), db.clone()));

    post_graphql(
        app.clone(),
        json!({ "query": r#"mutation { register(input: { username: "dave", password: "pw" }) }"# }),
        None,
    )
    .await;
    let login = post_graphql(
        app.clone(),
        json!({ "query": r#"mutation { login(input: { username: "dave", password: "pw" }) { accessToken } }"# }),
        None,
    )
    .await;
    let token = login["data"]["login"]["accessToken"]
        .as_str()
        .expect("token")
        .to_string();

    let me = post_graphql(app.clone(), json!({ "query": "{ me { username } }" }), Some(&token)).await;
    assert_eq!(me["data"]["me"]["username"], json!("dave"));

    let anonymous = post_graphql(app, json!({ "query": "{ me { username } }" }), Some("not-a-jwt")).await;
    assert_eq!(anonymous["data"]["me"], json!(null));
}

#[tokio::test]
async fn test_health_endpoints() {
    let db = test_db().await;
    let app = build_app(AppState::new(&test_config(), db));

    let response = app
        .clone()
        .oneshot(HttpRequest::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(HttpRequest::builder().uri("/readyz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({ "ready": true, "database": true }));
}

#[tokio::test]
async fn test_readiness_fails_once_the_database_is_closed() {
    let db = test_db().await;
    let app = build_app(AppState::new(&test_config(), db.clone()));
    db.close().await;

    let response = app
        .clone()
        .oneshot(HttpRequest::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(HttpRequest::builder().uri("/readyz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({ "ready": false, "database": false }));
}

#[tokio::test]
async fn test_get_reviews_lists_in_written_order() {
    let db = test_db().await;
    let lib = fifteen_books(&db).await;
    let alice = user(&db, "alice").await;
    let bob = user(&db, "bob").await;
    let hobbit = lib.book_ids[3];
    review(&db, &bob, hobbit, "Second breakfast", 4).await;
    review(&db, &alice, hobbit, "Riddles in the dark", 5).await;
    review(&db, &alice, lib.book_ids[4], "Elsewhere", 2).await;
    let schema = test_schema(&db);

    let result = data(
        run(
            &schema,
            "query Reviews($bookId: Int!) { getReviews(bookId: $bookId) { content username } }",
            json!({ "bookId": hobbit }),
        )
        .await,
    );
    assert_eq!(
        result["getReviews"],
        json!([
            { "content": "Second breakfast", "username": "bob" },
            { "content": "Riddles in the dark", "username": "alice" }
        ])
    );
}
