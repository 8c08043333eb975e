// Adapters layer: concrete BookStore implementations.

pub mod memory;
pub mod mongo;

pub use memory::InMemoryBookStore;
pub use mongo::{MongoBookStore, MongoSettings};
