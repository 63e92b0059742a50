use std::{path::PathBuf, sync::Arc};

use models::Beer;
use tracing::{debug, info};

use crate::errors::ServiceError;
use crate::storage::json_map_store::JsonMapStore;
use crate::storage::Upserted;
use crate::store::BeerStore;

/// File-backed beer store.
/// Keeps a map of `name -> beer` persisted as one JSON object, rewritten in
/// full on every successful mutation.
pub struct FileBeerStore {
    store: Arc<JsonMapStore<String, Beer>>,
}

impl FileBeerStore {
    /// Load the store from `path`, creating an empty file if missing.
    /// Malformed content, or an entry stored under a key other than its
    /// name, fails the whole open.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let store = JsonMapStore::<String, Beer>::new(path).await?;
        store
            .verify(|key, beer| {
                if key != &beer.name {
                    return Err(format!("stored under key `{key}` but named `{}`", beer.name));
                }
                beer.validate().map_err(|e| e.to_string())
            })
            .await?;
        let beers = store.len().await;
        info!(path = %store.path().display(), beers, "beer store loaded");
        Ok(Arc::new(Self { store }))
    }
}

#[async_trait::async_trait]
impl BeerStore for FileBeerStore {
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
        let outcome = self.store.upsert(name.clone(), beer).await?;
        debug!(%name, ?outcome, "beer upserted");
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::json_map_store::staging_path;
    use crate::test_support::{assert_concurrent_upsert_creates_once, assert_store_contract, temp_store_path};
    use tokio::fs;

    fn sorted(mut beers: Vec<Beer>) -> Vec<Beer> {
        beers.sort_by(|a, b| a.name.cmp(&b.name));
        beers
    }

    #[tokio::test]
    async fn file_store_contract() -> anyhow::Result<()> {
        let path = temp_store_path();
        let store = FileBeerStore::open(&path).await?;
        assert_store_contract(store.as_ref()).await?;
        let _ = fs::remove_dir_all(path.parent().unwrap()).await;
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_upserts_create_once() -> anyhow::Result<()> {
        let path = temp_store_path();
        let store = FileBeerStore::open(&path).await?;
        assert_concurrent_upsert_creates_once(store).await?;

        // the last write won on disk as well
        let reopened = FileBeerStore::open(&path).await?;
        assert_eq!(reopened.list().await.len(), 1);

        let _ = fs::remove_dir_all(path.parent().unwrap()).await;
        Ok(())
    }

    #[tokio::test]
    async fn reopen_reproduces_records() -> anyhow::Result<()> {
        let path = temp_store_path();
        let store = FileBeerStore::open(&path).await?;
        store.add(Beer::new("ipa").with_style("IPA").with_abv(6.5)).await?;
        store.add(Beer::new("stout").with_style("Stout")).await?;
        store.add(Beer::new("pils")).await?;
        store.update(Beer::new("pils").with_style("Pilsner")).await?;
        store.remove("stout").await?;
        let before = sorted(store.list().await);
        drop(store);

        let reopened = FileBeerStore::open(&path).await?;
        assert_eq!(sorted(reopened.list().await), before);

        // on disk it is a single object keyed by name
        let raw: serde_json::Value = serde_json::from_slice(&fs::read(&path).await?)?;
        assert_eq!(raw["pils"]["style"], "Pilsner");
        assert!(raw.get("stout").is_none());

        let _ = fs::remove_dir_all(path.parent().unwrap()).await;
        Ok(())
    }

    #[tokio::test]
    async fn write_failure_leaves_memory_and_disk_untouched() -> anyhow::Result<()> {
        let path = temp_store_path();
        let store = FileBeerStore::open(&path).await?;
        store.add(Beer::new("ipa").with_style("IPA")).await?;
        let disk_before = fs::read(&path).await?;
        let mem_before = sorted(store.list().await);

        fs::create_dir(staging_path(&path)).await?;

        let err = store.add(Beer::new("lager")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Persistence(_)));
        let err = store.update(Beer::new("ipa").with_style("Session IPA")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Persistence(_)));
        let err = store.remove("ipa").await.unwrap_err();
        assert!(matches!(err, ServiceError::Persistence(_)));
        let err = store.upsert(Beer::new("porter")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Persistence(_)));

        assert_eq!(sorted(store.list().await), mem_before);
        assert_eq!(fs::read(&path).await?, disk_before);

        // once the disk recovers the store keeps working
        fs::remove_dir(staging_path(&path)).await?;
        store.add(Beer::new("lager")).await?;
        assert_eq!(FileBeerStore::open(&path).await?.list().await.len(), 2);

        let _ = fs::remove_dir_all(path.parent().unwrap()).await;
        Ok(())
    }

    #[tokio::test]
    async fn open_rejects_bad_files() -> anyhow::Result<()> {
        let path = temp_store_path();
        fs::create_dir_all(path.parent().unwrap()).await?;

        fs::write(&path, b"").await?;
        assert!(matches!(FileBeerStore::open(&path).await, Err(ServiceError::Load(_))));

        fs::write(&path, br#"[{"name":"ipa"}]"#).await?;
        assert!(matches!(FileBeerStore::open(&path).await, Err(ServiceError::Load(_))));

        fs::write(&path, br#"{"ipa":{"name":"stout"}}"#).await?;
        assert!(matches!(FileBeerStore::open(&path).await, Err(ServiceError::Load(_))));

        fs::write(&path, br#"{"ipa":{"name":"ipa","style":"IPA"}}"#).await?;
        let store = FileBeerStore::open(&path).await?;
        assert_eq!(store.get("ipa").await?.style(), Some("IPA"));

        let _ = fs::remove_dir_all(path.parent().unwrap()).await;
        Ok(())
    }
}
