pub mod app;
pub mod crypto;
pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::{CatalogService, DatabaseService};
pub use domain::{ServiceError, ServiceResult};
pub use infra::Config;
pub use storage::document::{DocumentStore, MemoryDocumentStore, PostgresDocumentStore};
