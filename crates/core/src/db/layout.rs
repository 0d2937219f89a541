use std::path::{Path, PathBuf};

/// Logical layout of a profile on disk.
///
/// This is derived from a chosen root path. It does *not* perform any IO itself.
#[derive(Debug, Clone)]
pub struct ProfileLayout {
    /// Root directory of the profile.
    pub root: PathBuf,
    /// Directory for profile metadata (.quick-directions).
    pub meta_dir: PathBuf,
    /// Path to the profile config file (JSON).
    pub config_path: PathBuf,
    /// Path to the SQLite store.
    pub db_path: PathBuf,
}

impl ProfileLayout {
    /// Compute the default layout for a profile rooted at `root`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        let meta_dir = root.join(".quick-directions");
        let config_path = meta_dir.join("profile.json");
        let db_path = meta_dir.join("store.db");

        Self { root, meta_dir, config_path, db_path }
    }

    /// Store path suitable for `ProfileConfig`, relative to `root` when possible.
    pub fn db_path_relative_string(&self) -> String {
        match self.db_path.strip_prefix(&self.root) {
            Ok(rel) => rel.to_string_lossy().to_string(),
            Err(_) => self.db_path.to_string_lossy().to_string(),
        }
    }
}
