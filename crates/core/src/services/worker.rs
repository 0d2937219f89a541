//! Serialized synchronization worker.
//!
//! Every trigger (install, startup, store change) goes through one FIFO queue
//! drained by a dedicated thread, so passes run strictly one after another and
//! the entries of two passes never interleave on the host.

use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::db::{StoreChange, SubscriptionId};
use crate::model::{LOCATIONS_KEY, MAP_SEARCH_KEY};
use crate::services::menu::MenuSynchronizer;

/// Keys whose changes require a new pass.
pub const MENU_STATE_KEYS: [&str; 2] = [LOCATIONS_KEY, MAP_SEARCH_KEY];

/// True if `change` affects the menu synchronized from `namespace`.
pub fn is_relevant(change: &StoreChange, namespace: &str) -> bool {
    change.touches(namespace, &MENU_STATE_KEYS)
}

enum Trigger {
    Installed,
    Startup,
    Changed(StoreChange),
    Flush(Sender<()>),
    Shutdown,
}

#[derive(Debug, Default)]
struct WorkerStats {
    passes_completed: AtomicU64,
    passes_failed: AtomicU64,
}

/// Handle to the background thread running synchronization passes.
///
/// Dropping the handle unsubscribes from the store and joins the thread.
pub struct SyncWorker {
    synchronizer: Arc<MenuSynchronizer>,
    tx: Sender<Trigger>,
    handle: Option<JoinHandle<()>>,
    subscription: Option<SubscriptionId>,
    stats: Arc<WorkerStats>,
}

impl SyncWorker {
    /// Start the worker and subscribe it to the synchronizer's store.
    pub fn spawn(synchronizer: Arc<MenuSynchronizer>) -> io::Result<Self> {
        let (tx, rx) = mpsc::channel();
        let stats = Arc::new(WorkerStats::default());

        let handle = {
            let synchronizer = Arc::clone(&synchronizer);
            let stats = Arc::clone(&stats);
            thread::Builder::new()
                .name("menu-sync".into())
                .spawn(move || run(&synchronizer, &rx, &stats))?
        };

        let listener_tx = tx.clone();
        let subscription = synchronizer.store().subscribe(Arc::new(move |change: &StoreChange| {
            // The worker may already be gone during shutdown.
            let _ = listener_tx.send(Trigger::Changed(change.clone()));
        }));

        Ok(Self { synchronizer, tx, handle: Some(handle), subscription: Some(subscription), stats })
    }

    /// Queue the pass that follows installation (or reinstallation).
    pub fn notify_installed(&self) {
        self.send(Trigger::Installed);
    }

    /// Queue the pass that follows a host restart.
    pub fn notify_startup(&self) {
        self.send(Trigger::Startup);
    }

    /// Block until every trigger queued before this call has been processed.
    ///
    /// Returns `false` if the worker is no longer running.
    pub fn flush(&self) -> bool {
        let (ack_tx, ack_rx) = mpsc::channel();
        if self.tx.send(Trigger::Flush(ack_tx)).is_err() {
            return false;
        }
        ack_rx.recv().is_ok()
    }

    pub fn passes_completed(&self) -> u64 {
        self.stats.passes_completed.load(Ordering::SeqCst)
    }

    pub fn passes_failed(&self) -> u64 {
        self.stats.passes_failed.load(Ordering::SeqCst)
    }

    /// Unsubscribe, drain nothing further, and join the thread.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn send(&self, trigger: Trigger) {
        if self.tx.send(trigger).is_err() {
            tracing::warn!("menu sync worker is not running; trigger dropped");
        }
    }

    fn stop(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.synchronizer.store().unsubscribe(id);
        }
        if let Some(handle) = self.handle.take() {
            let _ = self.tx.send(Trigger::Shutdown);
            if handle.join().is_err() {
                tracing::warn!("menu sync worker panicked");
            }
        }
    }
}

impl Drop for SyncWorker {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for SyncWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncWorker")
            .field("running", &self.handle.is_some())
            .field("stats", &self.stats)
            .finish()
    }
}

fn run(synchronizer: &MenuSynchronizer, rx: &Receiver<Trigger>, stats: &WorkerStats) {
    let namespace = synchronizer.store().namespace().to_string();

    for trigger in rx {
        let reason = match trigger {
            Trigger::Shutdown => break,
            Trigger::Flush(ack) => {
                let _ = ack.send(());
                continue;
            }
            Trigger::Installed => "installed",
            Trigger::Startup => "startup",
            Trigger::Changed(change) => {
                if !is_relevant(&change, &namespace) {
                    tracing::debug!(
                        namespace = %change.namespace,
                        keys = ?change.changed_keys,
                        "store change does not affect the menu"
                    );
                    continue;
                }
                "store change"
            }
        };

        match synchronizer.synchronize() {
            Ok(_) => {
                stats.passes_completed.fetch_add(1, Ordering::SeqCst);
            }
            Err(err) => {
                stats.passes_failed.fetch_add(1, Ordering::SeqCst);
                tracing::warn!(trigger = reason, error = %err, "menu synchronization pass failed");
            }
        }
    }
}
