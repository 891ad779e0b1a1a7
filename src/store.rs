use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::models::journal::{JournalEntry, JournalFilter, JournalPatch, NewJournalEntry};

/// Failures raised by a store engine. Handlers never show these to clients.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("Path `{0}` is required")]
    MissingField(&'static str),

    #[error("Cast to string failed for field `{0}`")]
    InvalidField(&'static str),

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    #[error("Connection pool error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Shared handle injected into the router.
pub type SharedStore = Arc<dyn JournalStore>;

/// The `JournalEntry` collection. Every call is attempted exactly once.
#[async_trait]
pub trait JournalStore: Send + Sync {
    /// Insert a new entry; both `title` and `entry` must be non-empty.
    async fn insert(&self, new_entry: NewJournalEntry) -> Result<JournalEntry, StoreError>;

    async fn find(&self, filter: &JournalFilter) -> Result<Vec<JournalEntry>, StoreError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<JournalEntry>, StoreError>;

    /// Returns the post-update document, or `None` when the id is unknown.
    async fn update_by_id(
        &self,
        id: &str,
        patch: JournalPatch,
    ) -> Result<Option<JournalEntry>, StoreError>;

    /// Returns the deleted document, or `None` when the id is unknown.
    async fn delete_by_id(&self, id: &str) -> Result<Option<JournalEntry>, StoreError>;

    /// Connectivity probe run once at startup.
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// IDs are UUIDs; anything else is a store-side cast failure.
pub fn parse_id(id: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(id).map_err(|_| StoreError::InvalidId(id.to_string()))
}

/// プロセス内メモリに保持するストア。
/// ローカル開発とテスト用で、挿入順を保つために `Vec` を `RwLock` で包んでいる。
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<Vec<JournalEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JournalStore for MemoryStore {
    async fn insert(&self, new_entry: NewJournalEntry) -> Result<JournalEntry, StoreError> {
        let (title, entry) = new_entry.require_fields()?;
        let journal = JournalEntry::new(title, entry);

        self.entries.write().await.push(journal.clone());

        info!("Created journal entry with id: {}", journal.id);
        Ok(journal)
    }

    async fn find(&self, filter: &JournalFilter) -> Result<Vec<JournalEntry>, StoreError> {
        let entries = self.entries.read().await;
        Ok(entries.iter().filter(|j| filter.matches(j)).cloned().collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<JournalEntry>, StoreError> {
        let uuid = parse_id(id)?;
        let entries = self.entries.read().await;
        Ok(entries.iter().find(|j| j.id == uuid).cloned())
    }

    async fn update_by_id(
        &self,
        id: &str,
        patch: JournalPatch,
    ) -> Result<Option<JournalEntry>, StoreError> {
        let uuid = parse_id(id)?;
        let mut entries = self.entries.write().await;

        Ok(entries.iter_mut().find(|j| j.id == uuid).map(|journal| {
            journal.apply(patch);
            journal.clone()
        }))
    }

    async fn delete_by_id(&self, id: &str) -> Result<Option<JournalEntry>, StoreError> {
        let uuid = parse_id(id)?;
        let mut entries = self.entries.write().await;

        let position = entries.iter().position(|j| j.id == uuid);
        Ok(position.map(|index| entries.remove(index)))
    }
}
