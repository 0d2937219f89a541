use anyhow::{Context, Result};
use directions_core::model::MenuItemId;
use serde::Serialize;

use crate::commands::{editor_for, open_profile, parse_switch};

#[derive(Debug, Serialize)]
pub struct LocationInfo {
    pub index: usize,
    pub id: String,
    pub name: String,
    pub address: String,
}

/// Append a location to the profile's list.
pub fn add_location_command(root: &str, name: &str, address: &str) -> Result<()> {
    let ctx = open_profile(root)?;
    let index = editor_for(&ctx).add(name, address).context("Failed to add location")?;

    println!("Added location:");
    println!("  Index: {}", index);
    println!("  Name: {}", name.trim());
    println!("  Address: {}", address.trim());

    Ok(())
}

/// Replace the location at `index`.
pub fn edit_location_command(root: &str, index: usize, name: &str, address: &str) -> Result<()> {
    let ctx = open_profile(root)?;
    let updated = editor_for(&ctx)
        .edit(index, name, address)
        .with_context(|| format!("Failed to edit location {index}"))?;

    println!("Updated location {}:", index);
    println!("  Name: {}", updated.name);
    println!("  Address: {}", updated.address);

    Ok(())
}

pub fn delete_location_command(root: &str, index: usize) -> Result<()> {
    let ctx = open_profile(root)?;
    let removed = editor_for(&ctx)
        .remove(index)
        .with_context(|| format!("Failed to delete location {index}"))?;

    println!("Deleted location {}: {}", index, removed.name);

    Ok(())
}

/// Reorder: move the location at `from` to position `to`.
pub fn move_location_command(root: &str, from: usize, to: usize) -> Result<()> {
    let ctx = open_profile(root)?;
    editor_for(&ctx)
        .move_to(from, to)
        .with_context(|| format!("Failed to move location {from} to {to}"))?;

    println!("Moved location {} to position {}", from, to);

    Ok(())
}

/// List saved locations in menu order.
pub fn list_locations_command(root: &str, json: bool) -> Result<()> {
    let ctx = open_profile(root)?;
    let locations = editor_for(&ctx).list().context("Failed to list locations")?;

    let infos: Vec<LocationInfo> = locations
        .into_iter()
        .enumerate()
        .map(|(index, location)| LocationInfo {
            index,
            id: MenuItemId::Location(index).to_string(),
            name: location.name,
            address: location.address,
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&infos)?);
        return Ok(());
    }

    if infos.is_empty() {
        println!("Locations: (none)");
        return Ok(());
    }

    println!("Locations:");
    for info in infos {
        println!("- [{}] {}: {}", info.index, info.name, info.address);
    }

    Ok(())
}

/// Toggle the map-search menu entry.
pub fn set_map_search_command(root: &str, value: &str) -> Result<()> {
    let enabled = parse_switch(value)?;
    let ctx = open_profile(root)?;
    editor_for(&ctx).set_map_search(enabled).context("Failed to update map search flag")?;

    println!("Map search: {}", if enabled { "on" } else { "off" });

    Ok(())
}
