//! Loading and saving the wheel collection through a key-value store.
//!
//! The store only ever sees one key ([`COLLECTION_KEY`]) holding the JSON
//! snapshot. Loading never fails: anything unusable falls back to the
//! default collection. Saving is fire-and-forget through [`Persister`].

mod saver;
mod snapshot;

use std::{
    collections::HashMap,
    future::Future,
    sync::{Arc, Mutex, PoisonError},
};

use anyhow::Result;
use log::{info, warn};

use crate::wheels::store::CollectionStore;

pub use saver::Persister;
pub use snapshot::{PersistedCollection, COLLECTION_KEY};

/// Minimal get/set storage the collection is persisted into.
pub trait KeyValueStore: Send + Sync + 'static {
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>>> + Send;

    fn set(&self, key: &str, value: String) -> impl Future<Output = Result<()>> + Send;
}

/// Process-local store, used when no device storage is wired up and in tests.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: impl Into<String>) -> Self {
        let store = Self::new();
        store.put(key, value.into());
        store
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn put(&self, key: &str, value: String) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value);
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.value(key))
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.put(key, value);
        Ok(())
    }
}

/// Reads the stored collection, falling back to a fresh single-wheel
/// collection when nothing usable is stored.
pub async fn load_collection<S: KeyValueStore>(store: &S) -> CollectionStore {
    let raw = match store.get(COLLECTION_KEY).await {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            info!("No stored wheel collection; starting with defaults");
            return CollectionStore::new();
        }
        Err(err) => {
            warn!("Failed to read stored wheel collection, using defaults: {err:#}");
            return CollectionStore::new();
        }
    };

    let persisted = match PersistedCollection::decode(&raw) {
        Ok(persisted) => persisted,
        Err(err) => {
            warn!("Stored wheel collection is corrupt, using defaults: {err:#}");
            return CollectionStore::new();
        }
    };

    match CollectionStore::from_persisted(persisted) {
        Some(store) => {
            info!("Loaded {} wheel(s) from storage", store.wheels().len());
            store
        }
        None => {
            warn!("Stored wheel collection has no wheels, using defaults");
            CollectionStore::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use super::*;
    use crate::wheels::models::DEFAULT_SEGMENT_LABEL;

    struct UnreadableStore;

    impl KeyValueStore for UnreadableStore {
        async fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(anyhow!("disk on fire"))
        }

        async fn set(&self, _key: &str, _value: String) -> Result<()> {
            Err(anyhow!("disk on fire"))
        }
    }

    fn assert_default(store: &CollectionStore) {
        assert_eq!(store.wheels().len(), 1);
        let wheel = store.active_wheel().unwrap();
        assert_eq!(wheel.name, "Wheel 1");
        assert_eq!(wheel.segments.len(), 1);
        assert_eq!(wheel.segments[0].label, DEFAULT_SEGMENT_LABEL);
    }

    #[tokio::test]
    async fn round_trip_reproduces_wheels_and_active_id() {
        let mut original = CollectionStore::new();
        let first = original.wheels()[0].id.clone();
        original.add_segment(&first);
        original.rename_wheel(&first, "Dinner");
        let second = original.create_wheel();
        original.add_segment(&second);
        original.add_segment(&second);
        original.set_active_wheel(&first);

        let memory = MemoryStore::with_entry(COLLECTION_KEY, original.persisted().encode().unwrap());
        let loaded = load_collection(&memory).await;

        assert_eq!(loaded.wheels(), original.wheels());
        assert_eq!(loaded.active_wheel_id(), Some(first.as_str()));
        assert!(loaded.selected_segment_id().is_none());
    }

    #[tokio::test]
    async fn missing_snapshot_falls_back_to_default() {
        assert_default(&load_collection(&MemoryStore::new()).await);
    }

    #[tokio::test]
    async fn corrupt_snapshot_falls_back_to_default() {
        let memory = MemoryStore::with_entry(COLLECTION_KEY, "{\"wheels\": [");
        assert_default(&load_collection(&memory).await);
    }

    #[tokio::test]
    async fn empty_snapshot_falls_back_to_default() {
        let memory = MemoryStore::with_entry(COLLECTION_KEY, r#"{"wheels": [], "activeWheelId": null}"#);
        assert_default(&load_collection(&memory).await);
    }

    #[tokio::test]
    async fn read_failure_falls_back_to_default() {
        assert_default(&load_collection(&UnreadableStore).await);
    }
}
