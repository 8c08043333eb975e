pub mod adapters;
pub mod client;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{InMemoryBookStore, MongoBookStore, MongoSettings};
pub use client::BooksClient;
pub use config::{CliConfig, TomlConfig};
pub use core::{
    handlers::AppState, router::build_router, server::BookServer, Book, BookDetails, BookId,
    BookStore, Deadline,
};
pub use utils::error::{BookError, Result};
