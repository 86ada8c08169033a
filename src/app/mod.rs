pub mod catalog_service;
pub mod database_service;

pub use catalog_service::CatalogService;
pub use database_service::DatabaseService;
