use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use serde_json::Value;

use crate::db::store::{
    ChangeListener, KeyValueStore, StoreChange, StoreError, StoreResult, Subscribers,
    SubscriptionId, SYNC_NAMESPACE,
};

/// In-process store, used for embedding and for tests.
///
/// `set_available(false)` makes every read and write fail with
/// `StoreError::Unavailable` without touching the stored values.
#[derive(Debug)]
pub struct MemoryStore {
    namespace: String,
    values: Mutex<HashMap<String, Value>>,
    available: AtomicBool,
    subscribers: Subscribers,
}

impl MemoryStore {
    /// Empty store in the synchronized namespace.
    pub fn new() -> Self {
        Self::with_namespace(SYNC_NAMESPACE)
    }

    pub fn with_namespace(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            values: Mutex::new(HashMap::new()),
            available: AtomicBool::new(true),
            subscribers: Subscribers::new(),
        }
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable(format!("memory store `{}` is offline", self.namespace)))
        }
    }

    fn values(&self) -> StoreResult<std::sync::MutexGuard<'_, HashMap<String, Value>>> {
        self.values.lock().map_err(|_| StoreError::Unavailable("memory store lock poisoned".into()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for MemoryStore {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        self.check_available()?;
        Ok(self.values()?.get(key).cloned())
    }

    fn set(&self, entries: &[(&str, Value)]) -> StoreResult<()> {
        self.check_available()?;
        let mut changed = Vec::new();
        {
            let mut values = self.values()?;
            for (key, value) in entries {
                if values.get(*key) != Some(value) {
                    values.insert((*key).to_string(), value.clone());
                    changed.push(*key);
                }
            }
        }
        self.subscribers.notify(&StoreChange::new(self.namespace.clone(), changed));
        Ok(())
    }

    fn subscribe(&self, listener: ChangeListener) -> SubscriptionId {
        self.subscribers.add(listener)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }
}
