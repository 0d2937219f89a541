use std::fs;

use anyhow::{Context, Result};
use directions_core::db::{ProfileConfig, SqliteStore};
use serde::Serialize;

use crate::commands::{layout_for, open_profile, print_file_status};
use crate::infer_profile_name;

#[derive(Serialize)]
pub struct ProfileInfoSnapshot {
    pub name: String,
    pub root: String,
    pub config_file: String,
    pub config_version: String,
    pub db_path: String,
    pub namespace: String,
    pub max_locations: usize,
    pub location_count: usize,
    pub map_search_enabled: bool,
    pub entries: Vec<directions_core::db::EntryInfo>,
}

/// Initialize a new profile at `root`.
pub fn init_profile_command(root: &str, name: Option<String>) -> Result<()> {
    let layout = layout_for(root)?;

    let profile_name = match name {
        Some(n) => n,
        None => infer_profile_name(&layout.root),
    };

    fs::create_dir_all(&layout.meta_dir)
        .with_context(|| format!("Failed to create meta dir: {}", layout.meta_dir.display()))?;

    let config = ProfileConfig::new(&profile_name, layout.db_path_relative_string());
    let json = serde_json::to_string_pretty(&config)?;
    fs::write(&layout.config_path, json).with_context(|| {
        format!("Failed to write profile config: {}", layout.config_path.display())
    })?;

    // Create the store immediately so follow-on commands can rely on it.
    SqliteStore::open(&layout.db_path, config.namespace.clone()).with_context(|| {
        format!("Failed to initialize profile store at {}", layout.db_path.display())
    })?;

    tracing::info!(profile = %profile_name, root = %layout.root.display(), "profile initialized");

    println!("Initialized quick-directions profile:");
    println!("  Name: {}", profile_name);
    println!("  Root: {}", layout.root.display());
    println!("  Config: {}", layout.config_path.display());
    println!("  Store path (relative): {}", config.db.path);

    Ok(())
}

/// Show basic information about an existing profile.
pub fn profile_info_command(root: &str, json: bool) -> Result<()> {
    let ctx = open_profile(root)?;
    let locations = ctx.locations();
    let location_count = locations.get_locations().context("Failed to read locations")?.len();
    let map_search_enabled =
        locations.get_map_search_enabled().context("Failed to read map search flag")?;
    let entries = ctx.store.entries().context("Failed to list store entries")?;

    if json {
        let snapshot = ProfileInfoSnapshot {
            name: ctx.config.name.clone(),
            root: ctx.layout.root.display().to_string(),
            config_file: ctx.layout.config_path.display().to_string(),
            config_version: ctx.config.config_version.clone(),
            db_path: ctx.db_path.display().to_string(),
            namespace: ctx.config.namespace.clone(),
            max_locations: ctx.config.max_locations,
            location_count,
            map_search_enabled,
            entries,
        };
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    println!("quick-directions Profile Info");
    println!("=============================");
    println!("Name: {}", ctx.config.name);
    println!("Root: {}", ctx.layout.root.display());
    println!("Config version: {}", ctx.config.config_version);
    println!("Namespace: {}", ctx.config.namespace);
    println!("Locations: {} (max {})", location_count, ctx.config.max_locations);
    println!("Map search: {}", if map_search_enabled { "on" } else { "off" });
    println!();
    println!("Files:");
    print_file_status("Config", &ctx.layout.config_path);
    print_file_status("Store", &ctx.db_path);
    if !entries.is_empty() {
        println!();
        println!("Store keys:");
        for entry in entries {
            println!(
                "- {} (revision {}, updated {})",
                entry.key,
                entry.revision,
                entry.updated_at.as_deref().unwrap_or("unknown")
            );
        }
    }

    Ok(())
}
