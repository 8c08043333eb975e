use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use books_api::domain::model::{DeleteResult, InsertResult, UpdateResult};
use books_api::{
    build_router, AppState, Book, BookDetails, BookError, BookId, BookStore, Deadline,
    InMemoryBookStore, Result,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

const VALID_ID: &str = "65f1c2a9e4b0a1b2c3d4e5f6";

fn memory_app() -> Router {
    let state = AppState::new(Arc::new(InMemoryBookStore::new()), Duration::from_secs(5));
    build_router(state)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&value).unwrap())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

fn dune() -> Value {
    json!({"title": "Dune", "author": "Herbert", "isbn": "978-0441013593"})
}

#[tokio::test]
async fn test_root_greeting() {
    let app = memory_app();
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"Hello World");
}

#[tokio::test]
async fn test_list_empty_collection() {
    let app = memory_app();
    let (status, body) = send(&app, Method::GET, "/books", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_create_then_get_round_trip() {
    let app = memory_app();

    let (status, created) = send(&app, Method::POST, "/books", Some(dune())).await;
    assert_eq!(status, StatusCode::OK);
    let id = created["insertedId"].as_str().unwrap().to_string();
    assert!(BookId::parse(&id).is_ok());

    let (status, book) = send(&app, Method::GET, &format!("/books/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        book,
        json!({"id": id, "title": "Dune", "author": "Herbert", "isbn": "978-0441013593"})
    );
}

#[tokio::test]
async fn test_create_ignores_client_supplied_id() {
    let app = memory_app();
    let mut body = dune();
    body["id"] = json!(VALID_ID);

    let (status, created) = send(&app, Method::POST, "/books", Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_ne!(created["insertedId"], json!(VALID_ID));
}

#[tokio::test]
async fn test_list_contains_every_created_book() {
    let app = memory_app();
    for _ in 0..4 {
        let (status, _) = send(&app, Method::POST, "/books", Some(dune())).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send(&app, Method::GET, "/books", None).await;
    assert_eq!(status, StatusCode::OK);
    let books: Vec<Book> = serde_json::from_value(body).unwrap();
    assert!(books.len() >= 4);
}

#[tokio::test]
async fn test_update_existing_and_missing() {
    let app = memory_app();
    let (_, created) = send(&app, Method::POST, "/books", Some(dune())).await;
    let id = created["insertedId"].as_str().unwrap().to_string();

    let renamed = json!({"title": "Children of Dune", "author": "Herbert", "isbn": "978-0593098240"});
    let (status, result) =
        send(&app, Method::PUT, &format!("/books/{}", id), Some(renamed)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result, json!({"matchedCount": 1, "modifiedCount": 1}));

    let (_, book) = send(&app, Method::GET, &format!("/books/{}", id), None).await;
    assert_eq!(book["title"], "Children of Dune");
    assert_eq!(book["id"], json!(id));

    let (status, result) =
        send(&app, Method::PUT, &format!("/books/{}", VALID_ID), Some(dune())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result, json!({"matchedCount": 0, "modifiedCount": 0}));
}

#[tokio::test]
async fn test_delete_twice_is_idempotent() {
    let app = memory_app();
    let (_, created) = send(&app, Method::POST, "/books", Some(dune())).await;
    let uri = format!("/books/{}", created["insertedId"].as_str().unwrap());

    let (status, first) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first, json!({"deletedCount": 1}));

    let (status, second) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second, json!({"deletedCount": 0}));

    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_missing_book_is_not_found() {
    let app = memory_app();
    let (status, body) = send(&app, Method::GET, &format!("/books/{}", VALID_ID), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 404);
    assert!(body["error"].as_str().unwrap().contains(VALID_ID));
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let app = memory_app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/books")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"title\": "))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/books")
        .body(Body::from(dune().to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (_, body) = send(&app, Method::GET, "/books", None).await;
    assert_eq!(body, json!([]));
}

/// Store double that counts calls and can stall or fail on demand.
struct ScriptedStore {
    calls: AtomicUsize,
    delay: Option<Duration>,
    fail: bool,
}

impl ScriptedStore {
    fn new(delay: Option<Duration>, fail: bool) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            delay,
            fail,
        }
    }

    async fn respond<T: Send>(&self, operation: &'static str, deadline: Deadline, value: T) -> Result<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        deadline
            .run(operation, async {
                if let Some(delay) = self.delay {
                    tokio::time::sleep(delay).await;
                }
                if self.fail {
                    return Err(BookError::store_unavailable("connection refused"));
                }
                Ok(value)
            })
            .await
    }
}

#[async_trait]
impl BookStore for ScriptedStore {
    async fn list_all(&self, deadline: Deadline) -> Result<Vec<Book>> {
        self.respond("list_all", deadline, Vec::new()).await
    }

    async fn get_by_id(&self, id: BookId, deadline: Deadline) -> Result<Book> {
        self.respond("get_by_id", deadline, Book::new(id, BookDetails::default()))
            .await
    }

    async fn create(&self, _details: BookDetails, deadline: Deadline) -> Result<InsertResult> {
        let inserted_id = BookId::parse(VALID_ID)?;
        self.respond("create", deadline, InsertResult { inserted_id })
            .await
    }

    async fn update(
        &self,
        _id: BookId,
        _details: BookDetails,
        deadline: Deadline,
    ) -> Result<UpdateResult> {
        let result = UpdateResult {
            matched_count: 0,
            modified_count: 0,
        };
        self.respond("update", deadline, result).await
    }

    async fn delete_by_id(&self, _id: BookId, deadline: Deadline) -> Result<DeleteResult> {
        self.respond("delete_by_id", deadline, DeleteResult { deleted_count: 0 })
            .await
    }
}

#[tokio::test]
async fn test_invalid_ids_never_reach_the_store() {
    let store = Arc::new(ScriptedStore::new(None, false));
    let app = build_router(AppState::new(store.clone(), Duration::from_secs(5)));

    for uri in ["/books/not-an-id", "/books/65f1c2a9e4b0a1b2c3d4e5", "/books/zzzzzzzzzzzzzzzzzzzzzzzz"] {
        let (status, body) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "GET {}", uri);
        assert!(body["error"].as_str().unwrap().contains("Invalid book id"));

        let (status, _) = send(&app, Method::PUT, uri, Some(dune())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "PUT {}", uri);

        let (status, _) = send(&app, Method::DELETE, uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "DELETE {}", uri);
    }

    assert_eq!(store.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_slow_store_times_out_as_server_error() {
    let store = Arc::new(ScriptedStore::new(Some(Duration::from_secs(5)), false));
    let app = build_router(AppState::new(store.clone(), Duration::from_millis(50)));

    let (status, body) = send(&app, Method::GET, "/books", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("timed out"));
    assert_eq!(store.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_store_failure_is_server_error() {
    let store = Arc::new(ScriptedStore::new(None, true));
    let app = build_router(AppState::new(store, Duration::from_secs(5)));

    let (status, body) = send(&app, Method::POST, "/books", Some(dune())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], 500);
    assert!(body["error"].as_str().unwrap().contains("connection refused"));

    let (status, _) = send(&app, Method::DELETE, &format!("/books/{}", VALID_ID), None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}
