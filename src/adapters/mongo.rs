use crate::core::{Book, BookDetails, BookId, BookStore, Deadline};
use crate::domain::model::{DeleteResult, InsertResult, UpdateResult};
use crate::utils::error::{BookError, Result};
use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const APP_NAME: &str = "books-api";

#[derive(Debug, Clone)]
pub struct MongoSettings {
    pub uri: String,
    pub database: String,
    pub collection: String,
    pub connect_timeout: Duration,
}

/// Stored shape of a book. `_id` is left out on insert so the driver assigns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct BookDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub isbn: String,
}

impl BookDocument {
    pub fn from_details(details: BookDetails) -> Self {
        Self {
            id: None,
            title: details.title,
            author: details.author,
            isbn: details.isbn,
        }
    }

    pub fn into_book(self) -> Result<Book> {
        let id = self
            .id
            .ok_or_else(|| BookError::store_unavailable("stored book has no _id"))?;
        Ok(Book {
            id: BookId::from(id),
            title: self.title,
            author: self.author,
            isbn: self.isbn,
        })
    }
}

fn id_filter(id: BookId) -> Document {
    doc! { "_id": id.object_id() }
}

pub struct MongoBookStore {
    database: Database,
    collection: Collection<BookDocument>,
}

impl MongoBookStore {
    /// Builds the client and resolves the collection. The driver connects lazily,
    /// so an unreachable server only shows up on the first operation or `ping`.
    pub async fn connect(settings: &MongoSettings) -> Result<Self> {
        let mut options = ClientOptions::parse(&settings.uri).await?;
        options.app_name = Some(APP_NAME.to_string());
        options.server_selection_timeout = Some(settings.connect_timeout);
        options.connect_timeout = Some(settings.connect_timeout);

        let client = Client::with_options(options)?;
        let database = client.database(&settings.database);
        let collection = database.collection::<BookDocument>(&settings.collection);

        tracing::info!(
            "Using collection {}.{}",
            settings.database,
            settings.collection
        );

        Ok(Self {
            database,
            collection,
        })
    }

    pub async fn ping(&self, deadline: Deadline) -> Result<()> {
        deadline
            .run("ping", async {
                self.database.run_command(doc! { "ping": 1 }).await?;
                Ok(())
            })
            .await
    }

    pub fn collection_name(&self) -> &str {
        self.collection.name()
    }
}

#[async_trait]
impl BookStore for MongoBookStore {
    async fn list_all(&self, deadline: Deadline) -> Result<Vec<Book>> {
        deadline
            .run("list_all", async {
                let cursor = self.collection.find(doc! {}).await?;
                let documents: Vec<BookDocument> = cursor.try_collect().await?;
                documents.into_iter().map(BookDocument::into_book).collect()
            })
            .await
    }

    async fn get_by_id(&self, id: BookId, deadline: Deadline) -> Result<Book> {
        deadline
            .run("get_by_id", async {
                match self.collection.find_one(id_filter(id)).await? {
                    Some(document) => document.into_book(),
                    None => Err(BookError::NotFound { id: id.to_hex() }),
                }
            })
            .await
    }

    async fn create(&self, details: BookDetails, deadline: Deadline) -> Result<InsertResult> {
        deadline
            .run("create", async {
                let document = BookDocument::from_details(details);
                let result = self.collection.insert_one(&document).await?;
                let inserted = result.inserted_id.as_object_id().ok_or_else(|| {
                    BookError::store_unavailable(format!(
                        "store returned a non-ObjectId id: {}",
                        result.inserted_id
                    ))
                })?;
                Ok(InsertResult {
                    inserted_id: BookId::from(inserted),
                })
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
                let replacement = BookDocument::from_details(details);
                let result = self
                    .collection
                    .replace_one(id_filter(id), &replacement)
                    .await?;
                Ok(UpdateResult {
                    matched_count: result.matched_count,
                    modified_count: result.modified_count,
                })
            })
            .await
    }

    async fn delete_by_id(&self, id: BookId, deadline: Deadline) -> Result<DeleteResult> {
        deadline
            .run("delete_by_id", async {
                let result = self.collection.delete_one(id_filter(id)).await?;
                Ok(DeleteResult {
                    deleted_count: result.deleted_count,
                })
            })
            .await
    }
}
