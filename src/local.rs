//! On-device file layer used for the create-form duplicate check.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::Result;
use crate::path;

pub trait LocalStore: Send + Sync {
    /// Local path that mirrors `name` inside the remote directory `dir`.
    fn local_path(&self, dir: &str, name: &str) -> Result<PathBuf>;

    fn exists(&self, path: &Path) -> bool;
}

pub type SharedLocalStore = Arc<dyn LocalStore>;

/// Mirror rooted at a directory on disk.
#[derive(Debug, Clone)]
pub struct LocalDirectory {
    root: PathBuf,
}

impl LocalDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl LocalStore for LocalDirectory {
    fn local_path(&self, dir: &str, name: &str) -> Result<PathBuf> {
        path::validate_name(name)?;
        Ok(path::local_path(&self.root, dir)?.join(name))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

#[cfg(any(test, feature = "test-util"))]
pub use memory::MemoryStore;

#[cfg(any(test, feature = "test-util"))]
mod memory {
    use std::collections::HashSet;
    use std::path::{Path, PathBuf};
    use std::sync::RwLock;

    use super::LocalStore;
    use crate::error::Result;
    use crate::path;

    /// Fixed set of existing paths, for tests.
    #[derive(Debug, Default)]
    pub struct MemoryStore {
        existing: RwLock<HashSet<PathBuf>>,
    }

    impl MemoryStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_entry(self, dir: &str, name: &str) -> Self {
            if let Ok(p) = self.local_path(dir, name) {
                if let Ok(mut existing) = self.existing.write() {
                    existing.insert(p);
                }
            }
            self
        }
    }

    impl LocalStore for MemoryStore {
        fn local_path(&self, dir: &str, name: &str) -> Result<PathBuf> {
            path::validate_name(name)?;
            Ok(path::local_path(Path::new("/"), dir)?.join(name))
        }

        fn exists(&self, path: &Path) -> bool {
            self.existing
                .read()
                .map(|existing| existing.contains(path))
                .unwrap_or(false)
        }
    }
}
