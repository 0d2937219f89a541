use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use crate::db::{open_profile_store, LocationStore, ProfileConfig, ProfileLayout, SqliteStore};

/// Convenience wrapper bundling layout, config, store path, and an open store.
#[derive(Debug)]
pub struct ProfileContext {
    pub layout: ProfileLayout,
    pub config: ProfileConfig,
    pub db_path: PathBuf,
    pub store: Arc<SqliteStore>,
}

impl ProfileContext {
    /// Load profile config and open the store for a given root.
    pub fn from_root(root: impl AsRef<Path>) -> Result<Self> {
        let layout = ProfileLayout::new(root);
        let (config, db_path, store) = open_profile_store(&layout)?;
        Ok(Self { layout, config, db_path, store: Arc::new(store) })
    }

    /// Typed accessor over this profile's store.
    pub fn locations(&self) -> LocationStore {
        LocationStore::new(self.store.clone())
    }
}
