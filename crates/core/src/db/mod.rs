//! Persistent state: the key-value store seam, its implementations, the typed
//! location accessor, and profile configuration/layout on disk.

pub mod accessor;
pub mod config;
pub mod context;
pub mod layout;
pub mod memory_store;
pub mod sqlite_store;
pub mod store;
pub mod util;

pub use accessor::LocationStore;
pub use config::{DbConfig, ProfileConfig, DEFAULT_MAX_LOCATIONS};
pub use context::ProfileContext;
pub use layout::ProfileLayout;
pub use memory_store::MemoryStore;
pub use sqlite_store::{EntryInfo, SqliteStore};
pub use store::{
    ChangeListener, KeyValueStore, StoreChange, StoreError, StoreResult, Subscribers,
    SubscriptionId, CURRENT_SCHEMA_VERSION, SYNC_NAMESPACE,
};
pub use util::{load_profile_config, open_profile_store};
