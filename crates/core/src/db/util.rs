use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::db::{ProfileConfig, ProfileLayout, SqliteStore};

/// Load the profile config JSON from disk for a given layout.
pub fn load_profile_config(layout: &ProfileLayout) -> Result<ProfileConfig> {
    let config_json = std::fs::read_to_string(&layout.config_path).with_context(|| {
        format!("Failed to read profile config at {}", layout.config_path.display())
    })?;
    let config: ProfileConfig =
        serde_json::from_str(&config_json).context("Failed to parse profile config JSON")?;
    Ok(config)
}

/// Resolve the store path (respecting relative/absolute config) and open the store.
pub fn open_profile_store(layout: &ProfileLayout) -> Result<(ProfileConfig, PathBuf, SqliteStore)> {
    let config = load_profile_config(layout)?;
    let config_db_path = std::path::Path::new(&config.db.path);
    let db_path = if config_db_path.is_absolute() {
        config_db_path.to_path_buf()
    } else {
        layout.root.join(config_db_path)
    };
    let store = SqliteStore::open(&db_path, config.namespace.clone())
        .with_context(|| format!("Failed to open profile store at {}", db_path.display()))?;
    Ok((config, db_path, store))
}
