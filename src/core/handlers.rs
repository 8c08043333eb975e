use crate::core::{Book, BookDetails, BookId, BookStore, Deadline};
use crate::domain::model::{DeleteResult, InsertResult, UpdateResult};
use crate::utils::error::{BookError, Result};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use std::sync::Arc;
use std::time::Duration;

/// Shared by every request: the store handle and the per-request window.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn BookStore>,
    request_timeout: Duration,
}

impl AppState {
    pub fn new(store: Arc<dyn BookStore>, request_timeout: Duration) -> Self {
        Self {
            store,
            request_timeout,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    fn deadline(&self) -> Deadline {
        Deadline::after(self.request_timeout)
    }
}

fn decode_body(payload: std::result::Result<Json<BookDetails>, JsonRejection>) -> Result<BookDetails> {
    payload
        .map(|Json(details)| details)
        .map_err(|rejection| BookError::BadRequest {
            message: rejection.body_text(),
        })
}

fn log_failure(operation: &str, err: &BookError) {
    if err.is_client_error() {
        tracing::debug!("{} rejected: {}", operation, err);
    } else {
        tracing::error!("{} failed: {}", operation, err);
    }
}

pub async fn root() -> &'static str {
    "Hello World"
}

pub async fn list_books(State(state): State<AppState>) -> Result<Json<Vec<Book>>> {
    let books = state
        .store
        .list_all(state.deadline())
        .await
        .inspect_err(|e| log_failure("list_books", e))?;

    tracing::debug!("Listed {} books", books.len());
    Ok(Json(books))
}

pub async fn get_book(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Book>> {
    let book = async {
        let id = BookId::parse(&raw_id)?;
        state.store.get_by_id(id, state.deadline()).await
    }
    .await
    .inspect_err(|e| log_failure("get_book", e))?;

    Ok(Json(book))
}

pub async fn create_book(
    State(state): State<AppState>,
    payload: std::result::Result<Json<BookDetails>, JsonRejection>,
) -> Result<Json<InsertResult>> {
    let inserted = async {
        let details = decode_body(payload)?;
        state.store.create(details, state.deadline()).await
    }
    .await
    .inspect_err(|e| log_failure("create_book", e))?;

    tracing::info!("Created book {}", inserted.inserted_id);
    Ok(Json(inserted))
}

pub async fn update_book(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: std::result::Result<Json<BookDetails>, JsonRejection>,
) -> Result<Json<UpdateResult>> {
    let updated = async {
        let id = BookId::parse(&raw_id)?;
        let details = decode_body(payload)?;
        let result = state.store.update(id, details, state.deadline()).await?;
        tracing::info!(
            "Updated book {} (matched {}, modified {})",
            id,
            result.matched_count,
            result.modified_count
        );
        Ok::<_, BookError>(result)
    }
    .await
    .inspect_err(|e| log_failure("update_book", e))?;

    Ok(Json(updated))
}

pub async fn delete_book(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<DeleteResult>> {
    let deleted = async {
        let id = BookId::parse(&raw_id)?;
        let result = state.store.delete_by_id(id, state.deadline()).await?;
        tracing::info!("Deleted book {} ({} removed)", id, result.deleted_count);
        Ok::<_, BookError>(result)
    }
    .await
    .inspect_err(|e| log_failure("delete_book", e))?;

    Ok(Json(deleted))
}
