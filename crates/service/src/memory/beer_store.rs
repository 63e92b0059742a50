use models::Beer;
use tracing::debug;

use crate::errors::ServiceError;
use crate::storage::memory_map_store::MemoryMapStore;
use crate::storage::Upserted;
use crate::store::BeerStore;

/// Beer store that lives only as long as the process.
#[derive(Default)]
pub struct MemoryBeerStore {
    store: MemoryMapStore<String, Beer>,
}

impl MemoryBeerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl BeerStore for MemoryBeerStore {
    async fn list(&self) -> Vec<Beer> {
        self.store.list().await.into_iter().map(|(_, beer)| beer).collect()
    }

    async fn get(&self, name: &str) -> Result<Beer, ServiceError> {
        self.store.get(&name.to_string()).await.ok_or_else(|| ServiceError::not_found("beer", name))
    }

    async fn add(&self, beer: Beer) -> Result<(), ServiceError> {
        beer.validate()?;
        let name = beer.name.clone();
        self.store.insert_new(name.clone(), beer).await.map_err(|e| e.in_context_of("beer", &name))?;
        debug!(%name, "beer added");
        Ok(())
    }

    async fn update(&self, beer: Beer) -> Result<(), ServiceError> {
        beer.validate()?;
        let name = beer.name.clone();
        self.store.replace(name.clone(), beer).await.map_err(|e| e.in_context_of("beer", &name))?;
        debug!(%name, "beer updated");
        Ok(())
    }

    async fn remove(&self, name: &str) -> Result<(), ServiceError> {
        self.store.remove(&name.to_string()).await.map_err(|e| e.in_context_of("beer", name))?;
        debug!(%name, "beer removed");
        Ok(())
    }

    async fn upsert(&self, beer: Beer) -> Result<Upserted, ServiceError> {
        beer.validate()?;
        let name = beer.name.clone();
        let outcome = self.store.upsert(name.clone(), beer).await;
        debug!(%name, ?outcome, "beer upserted");
        Ok(outcome)
    }
}
