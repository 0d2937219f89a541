use std::path::Path;

use anyhow::{anyhow, Result};
use directions_core::db::{ProfileContext, ProfileLayout};
use directions_core::model::MenuEntry;
use directions_core::services::LocationEditor;

use crate::canonicalize_or_current;

/// Resolve `root` and open its profile (config + store).
pub fn open_profile(root: &str) -> Result<ProfileContext> {
    let root_path = canonicalize_or_current(root)?;
    ProfileContext::from_root(&root_path)
}

/// Settings editor honoring the profile's configured location limit.
pub fn editor_for(ctx: &ProfileContext) -> LocationEditor {
    LocationEditor::new(ctx.locations()).with_max_locations(ctx.config.max_locations)
}

/// Compute the layout for `root` without touching the filesystem.
pub fn layout_for(root: &str) -> Result<ProfileLayout> {
    Ok(ProfileLayout::new(canonicalize_or_current(root)?))
}

/// Helper to print whether a file exists.
pub fn print_file_status(label: &str, path: &Path) {
    let exists = path.is_file();
    println!("- {label}: {} ({})", if exists { "OK" } else { "MISSING" }, path.display());
}

/// Parse an on/off switch value.
pub fn parse_switch(value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        other => Err(anyhow!("Invalid switch value '{}'. Allowed: on, off, true, false", other)),
    }
}

/// Render menu entries as an indented tree, one entry per line.
pub fn format_menu(entries: &[MenuEntry]) -> Vec<String> {
    entries
        .iter()
        .map(|entry| {
            let indent = if entry.parent_id.is_some() { "  " } else { "" };
            format!("{indent}{} [{}]", entry.label, entry.id)
        })
        .collect()
}
