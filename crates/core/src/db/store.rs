use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::Value;
use thiserror::Error;

/// Namespace whose changes drive menu synchronization.
pub const SYNC_NAMESPACE: &str = "sync";

/// Minimum schema version we know how to handle.
///
/// `0` means "no schema yet" (fresh DB).
pub const MIN_SUPPORTED_SCHEMA_VERSION: i32 = 0;

/// Latest schema version this crate knows about.
pub const CURRENT_SCHEMA_VERSION: i32 = 2;

/// Error type for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying SQLite error.
    #[error("SQLite error: {0}")]
    Sql(#[from] rusqlite::Error),

    /// The store cannot be reached right now.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A stored value could not be decoded into the expected shape.
    #[error("Stored value for key `{key}` is malformed: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A value could not be encoded for storage.
    #[error("Failed to encode value for key `{key}`: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The database was created with a newer schema version than we support.
    #[error(
        "Unsupported schema version {found}; supported range is {min_supported}..={max_supported}"
    )]
    UnsupportedSchemaVersion { found: i32, min_supported: i32, max_supported: i32 },
}

/// Convenience result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Notification that one or more keys of a namespace changed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreChange {
    pub namespace: String,
    pub changed_keys: BTreeSet<String>,
}

impl StoreChange {
    pub fn new<I, K>(namespace: impl Into<String>, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self {
            namespace: namespace.into(),
            changed_keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// True if this change is in `namespace` and touches any of `keys`.
    pub fn touches(&self, namespace: &str, keys: &[&str]) -> bool {
        self.namespace == namespace && keys.iter().any(|k| self.changed_keys.contains(*k))
    }
}

/// Callback invoked for every change, regardless of which writer caused it.
pub type ChangeListener = Arc<dyn Fn(&StoreChange) + Send + Sync>;

/// Handle returned by `subscribe`, used to unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// External key-value persistence with change notifications.
///
/// Values are JSON. `set` replaces every given key atomically and emits at
/// most one `StoreChange` listing the keys whose value actually changed.
pub trait KeyValueStore: Send + Sync {
    fn namespace(&self) -> &str;
    fn get(&self, key: &str) -> StoreResult<Option<Value>>;
    fn set(&self, entries: &[(&str, Value)]) -> StoreResult<()>;
    fn subscribe(&self, listener: ChangeListener) -> SubscriptionId;
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

/// Listener registry shared by store implementations.
#[derive(Default)]
pub struct Subscribers {
    next_id: AtomicU64,
    listeners: Mutex<Vec<(SubscriptionId, ChangeListener)>>,
}

impl Subscribers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, listener: ChangeListener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.lock().push((id, listener));
        id
    }

    pub fn remove(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.lock();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deliver `change` to every listener. Listeners run outside the lock so
    /// they may subscribe or unsubscribe themselves.
    pub fn notify(&self, change: &StoreChange) {
        if change.changed_keys.is_empty() {
            return;
        }
        let snapshot: Vec<ChangeListener> =
            self.lock().iter().map(|(_, listener)| Arc::clone(listener)).collect();
        for listener in snapshot {
            listener(change);
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(SubscriptionId, ChangeListener)>> {
        self.listeners.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscribers").field("len", &self.len()).finish()
    }
}
