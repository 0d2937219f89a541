use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use directions_core::db::ProfileContext;
use directions_core::services::{
    Activation, IgnoreReason, MenuSynchronizer, RecordingMenu, RecordingNavigator, SyncWorker,
};

use crate::commands::{format_menu, open_profile};

/// Synchronizer wired to in-memory hosts, for inspecting what a browser would show.
pub fn simulated_synchronizer(
    ctx: &ProfileContext,
) -> (Arc<MenuSynchronizer>, Arc<RecordingMenu>, Arc<RecordingNavigator>) {
    let menu = Arc::new(RecordingMenu::new());
    let navigator = Arc::new(RecordingNavigator::new());
    let synchronizer =
        Arc::new(MenuSynchronizer::new(ctx.locations(), menu.clone(), navigator.clone()));
    (synchronizer, menu, navigator)
}

/// Run one synchronization pass and print the resulting menu.
pub fn show_menu_command(root: &str, json: bool) -> Result<()> {
    let ctx = open_profile(root)?;
    let (synchronizer, _menu, _navigator) = simulated_synchronizer(&ctx);
    let entries = synchronizer.synchronize().context("Failed to build menu")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!("Menu:");
    for line in format_menu(&entries) {
        println!("  {line}");
    }

    Ok(())
}

/// Simulate a click on menu entry `id` with the given selected text.
pub fn activate_command(root: &str, id: &str, selection: Option<&str>, json: bool) -> Result<()> {
    let ctx = open_profile(root)?;
    let (synchronizer, _menu, _navigator) = simulated_synchronizer(&ctx);
    let activation = synchronizer
        .on_menu_activated(id, selection)
        .with_context(|| format!("Failed to activate menu entry '{id}'"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&activation)?);
        return Ok(());
    }

    match activation {
        Activation::OpenedSettings => println!("Open settings"),
        Activation::OpenedTab(url) => println!("Open tab: {url}"),
        Activation::Ignored(reason) => println!("Ignored: {}", describe_ignore(&reason)),
    }

    Ok(())
}

/// Keep a simulated menu in sync with the profile store, printing it whenever
/// it changes. Writes from other processes are picked up by polling.
pub fn watch_command(root: &str, interval_ms: u64, max_polls: Option<u64>) -> Result<()> {
    let ctx = open_profile(root)?;
    let (synchronizer, menu, _navigator) = simulated_synchronizer(&ctx);
    let worker = SyncWorker::spawn(synchronizer).context("Failed to start menu sync worker")?;

    worker.notify_startup();
    if !worker.flush() {
        return Err(anyhow!("Menu sync worker stopped unexpectedly"));
    }
    let mut shown = menu.entries();
    print_watch_snapshot(&shown);

    let interval = Duration::from_millis(interval_ms);
    let mut polls = 0u64;
    while max_polls.map_or(true, |max| polls < max) {
        thread::sleep(interval);
        polls += 1;

        ctx.store.poll_external_changes().context("Failed to poll profile store")?;
        if !worker.flush() {
            return Err(anyhow!("Menu sync worker stopped unexpectedly"));
        }
        let current = menu.entries();
        if current != shown {
            print_watch_snapshot(&current);
            shown = current;
        }
    }

    tracing::info!(
        polls,
        passes = worker.passes_completed(),
        failed = worker.passes_failed(),
        "watch finished"
    );
    worker.shutdown();
    Ok(())
}

fn print_watch_snapshot(entries: &[directions_core::model::MenuEntry]) {
    println!("Menu updated:");
    for line in format_menu(entries) {
        println!("  {line}");
    }
}

fn describe_ignore(reason: &IgnoreReason) -> String {
    match reason {
        IgnoreReason::EmptySelection => "no text selected".to_string(),
        IgnoreReason::StaleIndex(index) => format!("no location at index {index}"),
        IgnoreReason::UnrecognizedId => "unrecognized menu entry".to_string(),
    }
}
