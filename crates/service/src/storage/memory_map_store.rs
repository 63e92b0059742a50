use std::{collections::HashMap, fmt::Display, hash::Hash};
use tokio::sync::RwLock;

use super::Upserted;
use crate::errors::ServiceError;

/// Key-unique map guarded by a single reader/writer lock, never persisted.
pub struct MemoryMapStore<K, V> {
    inner: RwLock<HashMap<K, V>>,
}

impl<K, V> Default for MemoryMapStore<K, V> {
    fn default() -> Self {
        Self { inner: RwLock::new(HashMap::new()) }
    }
}

impl<K, V> MemoryMapStore<K, V>
where
    K: Eq + Hash + Clone + Display,
    V: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// List all entries as `(key, value)` pairs, in no particular order.
    pub async fn list(&self) -> Vec<(K, V)> {
        let map = self.inner.read().await;
        map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    pub async fn get(&self, key: &K) -> Option<V> {
        let map = self.inner.read().await;
        map.get(key).cloned()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// Insert a key that must not exist yet.
    pub async fn insert_new(&self, key: K, value: V) -> Result<(), ServiceError> {
        let mut map = self.inner.write().await;
        super::insert_new(&mut *map, key, value).map(|_| ())
    }

    /// Replace the value of a key that must already exist.
    pub async fn replace(&self, key: K, value: V) -> Result<(), ServiceError> {
        let mut map = self.inner.write().await;
        super::replace(&mut *map, key, value).map(|_| ())
    }

    pub async fn upsert(&self, key: K, value: V) -> Upserted {
        let mut map = self.inner.write().await;
        super::upsert(&mut *map, key, value).0
    }

    /// Remove a key that must exist; returns the removed value.
    pub async fn remove(&self, key: &K) -> Result<V, ServiceError> {
        let mut map = self.inner.write().await;
        super::remove(&mut *map, key).map(|(removed, _)| removed)
    }
}
