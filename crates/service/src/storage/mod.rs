//! Storage abstractions for service layer
//!
//! Map stores keyed by a unique key, one kept purely in memory and one
//! persisted as a JSON object. Both share the checked mutations below so
//! the uniqueness rules are identical.

use std::{collections::HashMap, fmt::Display, hash::Hash};

use crate::errors::ServiceError;

pub mod json_map_store;
pub mod memory_map_store;

/// Whether an upsert created a new entry or replaced an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upserted {
    Created,
    Updated,
}

/// Inverse of a mutation that was already applied to a map.
pub(crate) enum Undo<K, V> {
    Remove(K),
    Restore(K, V),
}

impl<K: Eq + Hash, V> Undo<K, V> {
    pub(crate) fn apply(self, map: &mut HashMap<K, V>) {
        match self {
            Undo::Remove(key) => {
                map.remove(&key);
            }
            Undo::Restore(key, value) => {
                map.insert(key, value);
            }
        }
    }
}

pub(crate) fn insert_new<K, V>(map: &mut HashMap<K, V>, key: K, value: V) -> Result<Undo<K, V>, ServiceError>
where
    K: Eq + Hash + Clone + Display,
{
    if map.contains_key(&key) {
        return Err(ServiceError::already_exists("entry", &key.to_string()));
    }
    map.insert(key.clone(), value);
    Ok(Undo::Remove(key))
}

pub(crate) fn replace<K, V>(map: &mut HashMap<K, V>, key: K, value: V) -> Result<Undo<K, V>, ServiceError>
where
    K: Eq + Hash + Clone + Display,
{
    let Some(slot) = map.get_mut(&key) else {
        return Err(ServiceError::not_found("entry", &key.to_string()));
    };
    let previous = std::mem::replace(slot, value);
    Ok(Undo::Restore(key, previous))
}

pub(crate) fn upsert<K, V>(map: &mut HashMap<K, V>, key: K, value: V) -> (Upserted, Undo<K, V>)
where
    K: Eq + Hash + Clone,
{
    match map.insert(key.clone(), value) {
        Some(previous) => (Upserted::Updated, Undo::Restore(key, previous)),
        None => (Upserted::Created, Undo::Remove(key)),
    }
}

pub(crate) fn remove<K, V>(map: &mut HashMap<K, V>, key: &K) -> Result<(V, Undo<K, V>), ServiceError>
where
    K: Eq + Hash + Clone + Display,
    V: Clone,
{
    let Some(removed) = map.remove(key) else {
        return Err(ServiceError::not_found("entry", &key.to_string()));
    };
    Ok((removed.clone(), Undo::Restore(key.clone(), removed)))
}
