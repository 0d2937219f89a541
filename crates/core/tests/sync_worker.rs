use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use directions_core::db::{KeyValueStore, LocationStore, MemoryStore, StoreChange};
use directions_core::model::Location;
use directions_core::services::{
    is_relevant, render, MenuOp, MenuSynchronizer, RecordingMenu, RecordingNavigator, SyncWorker,
};
use serde_json::json;

fn setup() -> (Arc<MemoryStore>, LocationStore, Arc<RecordingMenu>, SyncWorker) {
    let raw = Arc::new(MemoryStore::new());
    let store = LocationStore::new(raw.clone());
    let menu = Arc::new(RecordingMenu::new());
    let sync = Arc::new(MenuSynchronizer::new(
        store.clone(),
        menu.clone(),
        Arc::new(RecordingNavigator::new()),
    ));
    let worker = SyncWorker::spawn(sync).expect("spawn worker");
    (raw, store, menu, worker)
}

#[test]
fn install_builds_initial_menu() {
    let (_raw, _store, menu, worker) = setup();
    worker.notify_installed();
    assert!(worker.flush());

    assert_eq!(menu.entries(), render(&[], false));
    assert_eq!(worker.passes_completed(), 1);
}

#[test]
fn location_and_flag_changes_trigger_passes() {
    let (_raw, store, menu, worker) = setup();

    store.set_locations(&[Location::new("Home", "1 Main St")]).expect("set");
    assert!(worker.flush());
    assert_eq!(menu.entries()[0].label, "Directions from Home");

    store.set_map_search_enabled(true).expect("flag");
    assert!(worker.flush());
    let ids: Vec<String> = menu.entries().into_iter().map(|e| e.id).collect();
    assert_eq!(ids, vec!["quick-directions-parent", "location-0", "map-search"]);
    assert_eq!(worker.passes_completed(), 2);
}

#[test]
fn unrelated_keys_do_not_trigger_passes() {
    let (raw, _store, menu, worker) = setup();
    raw.set(&[("theme", json!("dark"))]).expect("set");
    assert!(worker.flush());

    assert_eq!(worker.passes_completed(), 0);
    assert!(menu.ops().is_empty());
}

#[test]
fn relevance_requires_matching_namespace_and_key() {
    assert!(is_relevant(&StoreChange::new("sync", ["locations"]), "sync"));
    assert!(is_relevant(&StoreChange::new("sync", ["theme", "mapSearchEnabled"]), "sync"));
    assert!(!is_relevant(&StoreChange::new("local", ["locations"]), "sync"));
    assert!(!is_relevant(&StoreChange::new("sync", ["theme"]), "sync"));
}

#[test]
fn failed_pass_keeps_previous_menu_and_worker_recovers() {
    let (raw, store, menu, worker) = setup();
    store.set_locations(&[Location::new("Home", "1 Main St")]).expect("set");
    assert!(worker.flush());
    let before = menu.entries();

    raw.set_available(false);
    worker.notify_startup();
    assert!(worker.flush());
    assert_eq!(worker.passes_failed(), 1);
    assert_eq!(menu.entries(), before);

    raw.set_available(true);
    store.set_locations(&[]).expect("clear");
    assert!(worker.flush());
    assert_eq!(menu.entries(), render(&[], false));
    assert_eq!(worker.passes_completed(), 2);
}

#[test]
fn bursts_of_changes_never_interleave_passes() {
    let (_raw, store, menu, worker) = setup();

    let writers: Vec<_> = (0..4)
        .map(|t| {
            let store = store.clone();
            thread::spawn(move || {
                for i in 0..10 {
                    let list: Vec<Location> = (0..=(t + i) % 5)
                        .map(|n| Location::new(format!("L{n}"), format!("{n} St")))
                        .collect();
                    store.set_locations(&list).expect("write");
                }
            })
        })
        .collect();
    for writer in writers {
        writer.join().expect("writer");
    }
    assert!(worker.flush());

    // Within every pass each id is created at most once.
    let mut created = HashSet::new();
    for op in menu.ops() {
        match op {
            MenuOp::RemoveAll => created.clear(),
            MenuOp::Create(id) => assert!(created.insert(id.clone()), "duplicate {id}"),
        }
    }

    let expected = render(&store.get_locations().expect("final"), false);
    assert_eq!(menu.entries(), expected);
}

#[test]
fn shutdown_releases_subscription() {
    let (raw, _store, _menu, worker) = setup();
    assert_eq!(raw.subscriber_count(), 1);
    worker.shutdown();
    assert_eq!(raw.subscriber_count(), 0);
}

#[test]
fn drop_releases_subscription() {
    let (raw, store, _menu, worker) = setup();
    drop(worker);
    assert_eq!(raw.subscriber_count(), 0);
    // Writes after the worker is gone are harmless.
    store.set_map_search_enabled(true).expect("set");
}
