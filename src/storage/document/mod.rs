//! Document store: JSON documents grouped into named collections, addressed by UUID.

pub mod memory;
pub mod postgres;

pub use memory::MemoryDocumentStore;
pub use postgres::PostgresDocumentStore;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// Collections used by the catalog service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Products,
    Categories,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Products => "products",
            Collection::Categories => "categories",
        }
    }
}

/// The catalog's datastore contract.
///
/// Documents are stored as-is; ids are assigned by the caller. Every operation is a single
/// round trip, and none spans more than one document write.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn insert(&self, collection: Collection, id: Uuid, doc: JsonValue) -> Result<()>;

    async fn get(&self, collection: Collection, id: Uuid) -> Result<Option<JsonValue>>;

    /// All documents of the collection, oldest first.
    async fn list(&self, collection: Collection) -> Result<Vec<JsonValue>>;

    /// Documents whose id is in `ids`. Unknown ids are skipped.
    async fn get_many(&self, collection: Collection, ids: &[Uuid]) -> Result<Vec<JsonValue>>;

    /// Removes a document and returns it as it was before removal.
    async fn delete(&self, collection: Collection, id: Uuid) -> Result<Option<JsonValue>>;

    /// Cheap connectivity check.
    async fn ping(&self) -> Result<()>;

    /// Releases the underlying connections. Called once at shutdown.
    async fn close(&self);
}
