use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use serde::Serialize;
use thiserror::Error;

use crate::model::MenuEntry;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("Menu entry `{0}` already exists")]
    DuplicateId(String),
    #[error("Parent entry `{parent}` of `{id}` does not exist")]
    UnknownParent { id: String, parent: String },
    #[error("Host unavailable: {0}")]
    Unavailable(String),
}

/// Context-menu tree owned by the host environment.
pub trait MenuHost: Send + Sync {
    fn remove_all(&self) -> Result<(), HostError>;
    fn create(&self, entry: &MenuEntry) -> Result<(), HostError>;
}

/// Side effects reachable from a menu click.
pub trait Navigator: Send + Sync {
    /// Open `url` in a new foreground tab. Fire-and-forget.
    fn open_in_new_tab(&self, url: &str) -> Result<(), HostError>;
    /// Bring up the settings surface.
    fn open_settings(&self) -> Result<(), HostError>;
}

/// One mutation applied to a `RecordingMenu`, in call order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum MenuOp {
    RemoveAll,
    Create(String),
}

#[derive(Debug, Default)]
struct MenuState {
    entries: Vec<MenuEntry>,
    ops: Vec<MenuOp>,
}

/// In-memory menu host that behaves like a browser menu tree: identifiers are
/// unique and children must reference an existing parent.
#[derive(Debug)]
pub struct RecordingMenu {
    state: Mutex<MenuState>,
    available: AtomicBool,
}

impl RecordingMenu {
    pub fn new() -> Self {
        Self { state: Mutex::new(MenuState::default()), available: AtomicBool::new(true) }
    }

    /// Current entries in creation order.
    pub fn entries(&self) -> Vec<MenuEntry> {
        self.state().entries.clone()
    }

    /// Every mutation seen so far.
    pub fn ops(&self) -> Vec<MenuOp> {
        self.state().ops.clone()
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), HostError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(HostError::Unavailable("menu host offline".into()))
        }
    }

    fn state(&self) -> MutexGuard<'_, MenuState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for RecordingMenu {
    fn default() -> Self {
        Self::new()
    }
}

impl MenuHost for RecordingMenu {
    fn remove_all(&self) -> Result<(), HostError> {
        self.check_available()?;
        let mut state = self.state();
        state.entries.clear();
        state.ops.push(MenuOp::RemoveAll);
        Ok(())
    }

    fn create(&self, entry: &MenuEntry) -> Result<(), HostError> {
        self.check_available()?;
        let mut state = self.state();
        if state.entries.iter().any(|e| e.id == entry.id) {
            return Err(HostError::DuplicateId(entry.id.clone()));
        }
        if let Some(parent) = &entry.parent_id {
            if !state.entries.iter().any(|e| &e.id == parent) {
                return Err(HostError::UnknownParent {
                    id: entry.id.clone(),
                    parent: parent.clone(),
                });
            }
        }
        state.entries.push(entry.clone());
        state.ops.push(MenuOp::Create(entry.id.clone()));
        Ok(())
    }
}

/// A side effect requested through a `Navigator`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "url", rename_all = "snake_case")]
pub enum Navigation {
    Settings,
    Tab(String),
}

/// Navigator that records requests instead of performing them.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    requests: Mutex<Vec<Navigation>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> Vec<Navigation> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Navigation>> {
        self.requests.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Navigator for RecordingNavigator {
    fn open_in_new_tab(&self, url: &str) -> Result<(), HostError> {
        self.lock().push(Navigation::Tab(url.to_string()));
        Ok(())
    }

    fn open_settings(&self) -> Result<(), HostError> {
        self.lock().push(Navigation::Settings);
        Ok(())
    }
}
