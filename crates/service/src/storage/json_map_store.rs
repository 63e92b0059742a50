use std::{
    collections::HashMap,
    fmt::Display,
    hash::Hash,
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::{fs, sync::RwLock};
use tracing::{debug, error, warn};

use super::{Undo, Upserted};
use crate::errors::ServiceError;

/// Generic JSON file-backed key-value map store.
///
/// Keeps a `HashMap<K, V>` in memory and mirrors it to a JSON object on disk.
/// Every successful mutation rewrites the whole file while the write lock is
/// still held; if the write fails the in-memory change is undone, so memory
/// and disk never diverge.
pub struct JsonMapStore<K, V> {
    inner: RwLock<HashMap<K, V>>,
    file_path: PathBuf,
}

/// `<file>.tmp` next to the target; written first, then renamed over it.
pub(crate) fn staging_path(path: &Path) -> PathBuf {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
    path.with_extension(format!("{ext}.tmp"))
}

impl<K, V> JsonMapStore<K, V>
where
    K: Eq + Hash + Clone + Display + serde::Serialize + serde::de::DeserializeOwned,
    V: Clone + serde::Serialize + serde::de::DeserializeOwned,
{
    /// Open the store at `path`. A missing file is created holding `{}`;
    /// an unreadable, empty or malformed file is an error.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        let map = Self::load(&file_path).await?;
        let store = Self { inner: RwLock::new(map), file_path };
        if fs::metadata(&store.file_path).await.is_err() {
            if let Some(parent) = store.file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).await.map_err(|e| ServiceError::Load(e.to_string()))?;
            }
            let map = store.inner.read().await;
            store.persist(&*map).await.map_err(|e| ServiceError::Load(e.to_string()))?;
        }
        Ok(Arc::new(store))
    }

    async fn load(path: &Path) -> Result<HashMap<K, V>, ServiceError> {
        let bytes = match fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => return Err(ServiceError::Load(format!("{}: {e}", path.display()))),
        };
        serde_json::from_slice(&bytes).map_err(|e| ServiceError::Load(format!("{}: {e}", path.display())))
    }

    async fn persist(&self, map: &HashMap<K, V>) -> Result<(), ServiceError> {
        let data = serde_json::to_vec(map).map_err(|e| ServiceError::Persistence(e.to_string()))?;
        let tmp = staging_path(&self.file_path);
        fs::write(&tmp, data).await.map_err(|e| ServiceError::Persistence(format!("{}: {e}", tmp.display())))?;
        if let Err(e) = fs::rename(&tmp, &self.file_path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(ServiceError::Persistence(format!("{}: {e}", self.file_path.display())));
        }
        Ok(())
    }

    /// Apply a checked mutation and persist it, undoing it if the write fails.
    async fn commit<T, F>(&self, f: F) -> Result<T, ServiceError>
    where
        F: FnOnce(&mut HashMap<K, V>) -> Result<(T, Undo<K, V>), ServiceError>,
    {
        let mut map = self.inner.write().await;
        let (out, undo) = f(&mut *map)?;
        if let Err(e) = self.persist(&*map).await {
            undo.apply(&mut *map);
            error!(path = %self.file_path.display(), error = %e, "persist failed; mutation rolled back");
            return Err(e);
        }
        debug!(path = %self.file_path.display(), entries = map.len(), "store persisted");
        Ok(out)
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// List all entries as `(key, value)` pairs, in no particular order.
    pub async fn list(&self) -> Vec<(K, V)> {
        let map = self.inner.read().await;
        map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    /// Get value by key.
    pub async fn get(&self, key: &K) -> Option<V> {
        let map = self.inner.read().await;
        map.get(key).cloned()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Insert a key that must not exist yet, and persist.
    pub async fn insert_new(&self, key: K, value: V) -> Result<(), ServiceError> {
        self.commit(|map| super::insert_new(map, key, value).map(|undo| ((), undo))).await
    }

    /// Replace the value of an existing key, and persist.
    pub async fn replace(&self, key: K, value: V) -> Result<(), ServiceError> {
        self.commit(|map| super::replace(map, key, value).map(|undo| ((), undo))).await
    }

    /// Insert or replace under one lock acquisition, and persist.
    pub async fn upsert(&self, key: K, value: V) -> Result<Upserted, ServiceError> {
        self.commit(|map| Ok(super::upsert(map, key, value))).await
    }

    /// Remove an existing key and persist; returns the removed value.
    pub async fn remove(&self, key: &K) -> Result<V, ServiceError> {
        self.commit(|map| super::remove(map, key)).await
    }

    /// Check every loaded entry; used by typed wrappers to reject files whose
    /// keys disagree with the values they hold.
    pub async fn verify<F>(&self, check: F) -> Result<(), ServiceError>
    where
        F: Fn(&K, &V) -> Result<(), String>,
    {
        let map = self.inner.read().await;
        for (k, v) in map.iter() {
            if let Err(reason) = check(k, v) {
                warn!(path = %self.file_path.display(), key = %k, %reason, "invalid entry in backing file");
                return Err(ServiceError::Load(format!("{}: entry `{k}`: {reason}", self.file_path.display())));
            }
        }
        Ok(())
    }
}
