//! The record store seen by the HTTP layer.

use std::sync::Arc;

use async_trait::async_trait;
use configs::{StoreBackend, StoreConfig};
use models::Beer;
use tracing::info;

use crate::errors::ServiceError;
use crate::file::beer_store::FileBeerStore;
use crate::memory::beer_store::MemoryBeerStore;

pub use crate::storage::Upserted;

/// CRUD over beers keyed by name. Implementations guard the whole map with
/// one reader/writer lock and reject records with a blank name.
#[async_trait]
pub trait BeerStore: Send + Sync {
    /// Every stored beer, in no particular order.
    async fn list(&self) -> Vec<Beer>;
    async fn get(&self, name: &str) -> Result<Beer, ServiceError>;
    /// Fails with `AlreadyExists` if the name is taken.
    async fn add(&self, beer: Beer) -> Result<(), ServiceError>;
    /// Fails with `NotFound` if there is nothing to replace.
    async fn update(&self, beer: Beer) -> Result<(), ServiceError>;
    async fn remove(&self, name: &str) -> Result<(), ServiceError>;
    /// Create or replace in a single step.
    async fn upsert(&self, beer: Beer) -> Result<Upserted, ServiceError>;
}

/// Build the store selected by configuration.
pub async fn open_store(cfg: &StoreConfig) -> Result<Arc<dyn BeerStore>, ServiceError> {
    match cfg.backend {
        StoreBackend::Memory => {
            info!(backend = "memory", "opening beer store");
            Ok(Arc::new(MemoryBeerStore::new()))
        }
        StoreBackend::File => {
            info!(backend = "file", path = %cfg.path.display(), "opening beer store");
            let store: Arc<dyn BeerStore> = FileBeerStore::open(&cfg.path).await?;
            Ok(store)
        }
    }
}
