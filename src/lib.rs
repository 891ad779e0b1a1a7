// Library root for the mood journal API

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod store;

// Re-export commonly used types
pub use db::Database;
pub use error::ApiError;
pub use models::{JournalEntry, JournalPatch, NewJournalEntry};
pub use routes::create_router;
pub use store::{JournalStore, MemoryStore, SharedStore, StoreError};
