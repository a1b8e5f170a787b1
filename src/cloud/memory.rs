//! In-memory cloud tree.
//!
//! Folders and files are keyed by normalized path (`""` is the root, which
//! always exists). Listings come back folders first, each group sorted by
//! name. Failure injection and latency make it usable for screen tests.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;
use std::time::Duration;

use crate::cloud::CloudClient;
use crate::error::{AppError, Result};
use crate::models::RemoteEntry;
use crate::path;

#[derive(Debug, Default)]
struct MemoryTree {
    folders: BTreeSet<String>,
    files: BTreeMap<String, Vec<u8>>,
}

impl MemoryTree {
    fn folder_exists(&self, normalized: &str) -> bool {
        normalized.is_empty() || self.folders.contains(normalized)
    }

    fn entry_exists(&self, normalized: &str) -> bool {
        self.folder_exists(normalized) || self.files.contains_key(normalized)
    }

    fn insert_folder_with_ancestors(&mut self, normalized: &str) {
        let mut current = Some(normalized);
        while let Some(p) = current {
            if p.is_empty() {
                break;
            }
            self.folders.insert(p.to_string());
            current = path::parent(p);
        }
    }

    /// Parent of a new entry must already be a folder and the entry itself must not exist.
    fn check_creatable(&self, normalized: &str) -> Result<()> {
        if normalized.is_empty() {
            return Err(AppError::Transport("path/conflict: root".to_string()));
        }
        let parent = path::parent(normalized).unwrap_or("");
        if !self.folder_exists(parent) {
            return Err(AppError::Transport(format!("path/not_found: {}", parent)));
        }
        if self.entry_exists(normalized) {
            return Err(AppError::Transport(format!("path/conflict: {}", normalized)));
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryCloud {
    tree: RwLock<MemoryTree>,
    failing: AtomicBool,
    latency: Option<Duration>,
    calls: AtomicUsize,
}

impl MemoryCloud {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a folder and any missing ancestors.
    pub fn with_folder(self, folder: &str) -> Self {
        if let Ok(normalized) = path::normalize(folder) {
            if let Ok(mut tree) = self.tree.write() {
                tree.insert_folder_with_ancestors(&normalized);
            }
        }
        self
    }

    /// Adds a file and any missing ancestor folders.
    pub fn with_file(self, file: &str, body: &[u8]) -> Self {
        if let Ok(normalized) = path::normalize(file) {
            if let Ok(mut tree) = self.tree.write() {
                if let Some(parent) = path::parent(&normalized) {
                    tree.insert_folder_with_ancestors(parent);
                }
                tree.files.insert(normalized, body.to_vec());
            }
        }
        self
    }

    /// Every call waits this long before touching the tree.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Makes every subsequent call fail with a transport error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of remote calls issued so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn file(&self, file: &str) -> Option<Vec<u8>> {
        let normalized = path::normalize(file).ok()?;
        self.tree.read().ok()?.files.get(&normalized).cloned()
    }

    pub fn has_folder(&self, folder: &str) -> bool {
        match (path::normalize(folder), self.tree.read()) {
            (Ok(normalized), Ok(tree)) => tree.folder_exists(&normalized),
            _ => false,
        }
    }

    async fn begin_call(&self, op: &str, target: &str) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::Transport(format!("{} {}: network unreachable", op, target)));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl CloudClient for MemoryCloud {
    async fn list_children(&self, folder: &str) -> Result<Vec<RemoteEntry>> {
        self.begin_call("list_folder", folder).await?;
        let normalized = path::normalize(folder)?;
        let tree = self.tree.read().map_err(|_| AppError::lock_poisoned())?;

        if !tree.folder_exists(&normalized) {
            return Err(AppError::Transport(format!("path/not_found: {}", folder)));
        }

        let is_child = |p: &str| path::parent(p) == Some(normalized.as_str());
        let folders = tree
            .folders
            .iter()
            .filter(|p| is_child(p.as_str()))
            .map(|p| RemoteEntry::folder(path::file_name(p)));
        let files = tree
            .files
            .iter()
            .filter(|(p, _)| is_child(p.as_str()))
            .map(|(p, body)| RemoteEntry::file(path::file_name(p), body.len() as u64));

        Ok(folders.chain(files).collect())
    }

    async fn upload_file(&self, file: &str, body: &[u8]) -> Result<()> {
        self.begin_call("upload", file).await?;
        let normalized = path::normalize(file)?;
        let mut tree = self.tree.write().map_err(|_| AppError::lock_poisoned())?;
        tree.check_creatable(&normalized)?;
        tree.files.insert(normalized, body.to_vec());
        Ok(())
    }

    async fn create_folder(&self, folder: &str) -> Result<()> {
        self.begin_call("create_folder", folder).await?;
        let normalized = path::normalize(folder)?;
        let mut tree = self.tree.write().map_err(|_| AppError::lock_poisoned())?;
        tree.check_creatable(&normalized)?;
        tree.folders.insert(normalized);
        Ok(())
    }
}
