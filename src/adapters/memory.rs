use crate::core::{Book, BookDetails, BookId, BookStore, Deadline};
use crate::domain::model::{DeleteResult, InsertResult, UpdateResult};
use crate::utils::error::{BookError, Result};
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Process-local book store. Keeps insertion order and assigns ids the same way
/// the mongo driver does.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBookStore {
    books: Arc<RwLock<Vec<Book>>>,
}

impl InMemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.books.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.books.read().await.is_empty()
    }
}

#[async_trait]
impl BookStore for InMemoryBookStore {
    async fn list_all(&self, deadline: Deadline) -> Result<Vec<Book>> {
        deadline
            .run("list_all", async { Ok(self.books.read().await.clone()) })
            .await
    }

    async fn get_by_id(&self, id: BookId, deadline: Deadline) -> Result<Book> {
        deadline
            .run("get_by_id", async {
                let books = self.books.read().await;
                books
                    .iter()
                    .find(|book| book.id == id)
                    .cloned()
                    .ok_or_else(|| BookError::NotFound { id: id.to_hex() })
            })
            .await
    }

    async fn create(&self, details: BookDetails, deadline: Deadline) -> Result<InsertResult> {
        deadline
            .run("create", async {
                let id = BookId::from(ObjectId::new());
                self.books.write().await.push(Book::new(id, details));
                Ok(InsertResult { inserted_id: id })
            })
            .await
    }

    async fn update(
        &self,
        id: BookId,
        details: BookDetails,
        deadline: Deadline,
    ) -> Result<UpdateResult> {
        deadline
            .run("update", async {
                let mut books = self.books.write().await;
                match books.iter_mut().find(|book| book.id == id) {
                    Some(book) => {
                        let modified = book.details() != details;
                        *book = Book::new(id, details);
                        Ok(UpdateResult {
                            matched_count: 1,
                            modified_count: u64::from(modified),
                        })
                    }
                    None => Ok(UpdateResult {
                        matched_count: 0,
                        modified_count: 0,
                    }),
                }
            })
            .await
    }

    async fn delete_by_id(&self, id: BookId, deadline: Deadline) -> Result<DeleteResult> {
        deadline
            .run("delete_by_id", async {
                let mut books = self.books.write().await;
                let before = books.len();
                books.retain(|book| book.id != id);
                Ok(DeleteResult {
                    deleted_count: (before - books.len()) as u64,
                })
            })
            .await
    }
}
