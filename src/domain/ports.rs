use crate::domain::deadline::Deadline;
use crate::domain::model::{Book, BookDetails, BookId, DeleteResult, InsertResult, UpdateResult};
use crate::utils::error::Result;
use async_trait::async_trait;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

/// Gateway to the collection holding books. Every call is bounded by `deadline`.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// All books, in whatever order the store yields them.
    async fn list_all(&self, deadline: Deadline) -> Result<Vec<Book>>;

    /// Fails with `NotFound` when no book has this id.
    async fn get_by_id(&self, id: BookId, deadline: Deadline) -> Result<Book>;

    /// Inserts a new book; the id is assigned by the store.
    async fn create(&self, details: BookDetails, deadline: Deadline) -> Result<InsertResult>;

    /// Replaces the non-id fields. A missing id reports zero matches, not an error.
    async fn update(
        &self,
        id: BookId,
        details: BookDetails,
        deadline: Deadline,
    ) -> Result<UpdateResult>;

    /// Removes the book if present. A missing id reports zero deletions.
    async fn delete_by_id(&self, id: BookId, deadline: Deadline) -> Result<DeleteResult>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Mongo,
    Memory,
}

pub trait ConfigProvider: Send + Sync {
    fn listen_addr(&self) -> &str;
    fn store_kind(&self) -> StoreKind;
    fn store_uri(&self) -> &str;
    fn database_name(&self) -> &str;
    fn collection_name(&self) -> &str;
    fn request_timeout(&self) -> Duration;
    fn connect_timeout(&self) -> Duration;

    fn socket_addr(&self) -> Result<SocketAddr> {
        crate::utils::validation::validate_socket_addr("listen_addr", self.listen_addr())
    }
}
