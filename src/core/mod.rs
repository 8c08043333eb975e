pub mod handlers;
pub mod router;
pub mod server;

pub use crate::domain::deadline::Deadline;
pub use crate::domain::model::{Book, BookDetails, BookId};
pub use crate::domain::ports::{BookStore, ConfigProvider};
pub use crate::utils::error::Result;
