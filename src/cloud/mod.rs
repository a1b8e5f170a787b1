//! Cloud storage seam.
//!
//! - `CloudClient`: the three remote capabilities the screens consume
//! - `memory`: in-process tree for tests (`test-util` feature)
//! - `local_fs`: serves a local directory as the remote tree
//! - `activity`: process-wide network activity indicator

pub mod activity;
pub mod local_fs;
#[cfg(any(test, feature = "test-util"))]
pub mod memory;

use std::sync::Arc;

use crate::error::Result;
use crate::models::RemoteEntry;

pub use activity::{ActivityGuard, NetworkActivity};
pub use local_fs::LocalFsCloud;
#[cfg(any(test, feature = "test-util"))]
pub use memory::MemoryCloud;

/// Remote storage capabilities. Failures are reported as `AppError::Transport`.
#[async_trait::async_trait]
pub trait CloudClient: Send + Sync {
    /// Immediate children of `path` (`""` for the root) in server order.
    async fn list_children(&self, path: &str) -> Result<Vec<RemoteEntry>>;

    /// Creates a file at `path`. Existing entries are a conflict, not an overwrite.
    async fn upload_file(&self, path: &str, body: &[u8]) -> Result<()>;

    async fn create_folder(&self, path: &str) -> Result<()>;
}

pub type SharedClient = Arc<dyn CloudClient>;
