//! Typed HTTP client for the books API, used by the `books-client` smoke test.

use crate::domain::model::{Book, BookDetails, DeleteResult, InsertResult, UpdateResult};
use crate::utils::error::{BookError, Result};
use crate::utils::validation::validate_url;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

pub struct BooksClient {
    base_url: String,
    client: Client,
}

impl BooksClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let url = validate_url("base_url", base_url, &["http", "https"])?;
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: url.as_str().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn books_url(&self) -> String {
        format!("{}/books", self.base_url)
    }

    fn book_url(&self, id: &str) -> String {
        format!("{}/books/{}", self.base_url, id)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BookError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<T>().await?)
    }

    pub async fn list_books(&self) -> Result<Vec<Book>> {
        let response = self.client.get(self.books_url()).send().await?;
        Self::decode(response).await
    }

    pub async fn get_book(&self, id: &str) -> Result<Book> {
        let response = self.client.get(self.book_url(id)).send().await?;
        Self::decode(response).await
    }

    pub async fn create_book(&self, book: &BookDetails) -> Result<InsertResult> {
        let response = self.client.post(self.books_url()).json(book).send().await?;
        Self::decode(response).await
    }

    pub async fn update_book(&self, id: &str, book: &BookDetails) -> Result<UpdateResult> {
        tracing::debug!("Updating book with id {}", id);
        let response = self.client.put(self.book_url(id)).json(book).send().await?;
        Self::decode(response).await
    }

    pub async fn delete_book(&self, id: &str) -> Result<DeleteResult> {
        tracing::debug!("Deleting book with id {}", id);
        let response = self.client.delete(self.book_url(id)).send().await?;
        Self::decode(response).await
    }
}
