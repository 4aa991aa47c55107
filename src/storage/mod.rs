//! Storage backends for the movie catalog.
//!
//! Backends implement the [`MovieStorage`] capability trait and are
//! selected by configuration at construction. Every mutating call
//! persists durably before returning or reports a storage failure.

mod json_storage;
mod sqlite_storage;

pub use json_storage::JsonStorage;
pub use sqlite_storage::SqliteStorage;

use crate::config::{StorageBackend, StorageConfig};
use crate::error::CatalogError;
use crate::movie::Movie;

pub trait MovieStorage {
    /// Snapshot of the catalog in insertion order.
    fn list(&self) -> Result<Vec<Movie>, CatalogError>;
    /// Appends one record and persists.
    fn add(&mut self, movie: &Movie) -> Result<(), CatalogError>;
    /// Removes the record at `index` and persists.
    fn delete(&mut self, index: usize) -> Result<(), CatalogError>;
    /// Replaces the rating of the record at `index` and persists.
    fn update(&mut self, index: usize, rating: f64) -> Result<(), CatalogError>;
}

/// Opens the backend named by the configuration.
pub fn open_storage(config: &StorageConfig) -> Result<Box<dyn MovieStorage>, CatalogError> {
    match config.backend {
        StorageBackend::Json => Ok(Box::new(JsonStorage::open(&config.path)?)),
        StorageBackend::Sqlite => Ok(Box::new(SqliteStorage::open(&config.path)?)),
    }
}
