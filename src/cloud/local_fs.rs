//! Local directory served as the remote tree.
//!
//! Remote paths are mapped under `root`; hidden entries are skipped and
//! listings are sorted case-insensitively. Any IO failure is reported the
//! way a remote client would report it, as `AppError::Transport`.

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

use crate::cloud::CloudClient;
use crate::error::{AppError, Result};
use crate::models::{EntryKind, RemoteEntry};
use crate::path;

#[derive(Debug, Clone)]
pub struct LocalFsCloud {
    root: PathBuf,
}

impl LocalFsCloud {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, remote: &str) -> Result<PathBuf> {
        path::local_path(&self.root, remote)
    }
}

fn transport(op: &str, remote: &str, err: std::io::Error) -> AppError {
    AppError::Transport(format!("{} {}: {}", op, remote, err))
}

async fn ensure_creatable(target: &Path, remote: &str) -> Result<()> {
    if tokio::fs::try_exists(target).await.unwrap_or(false) {
        return Err(AppError::Transport(format!("path/conflict: {}", remote)));
    }
    let parent_is_dir = match target.parent() {
        Some(parent) => tokio::fs::metadata(parent)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false),
        None => false,
    };
    if !parent_is_dir {
        return Err(AppError::Transport(format!("path/not_found: parent of {}", remote)));
    }
    Ok(())
}

#[async_trait::async_trait]
impl CloudClient for LocalFsCloud {
    async fn list_children(&self, remote: &str) -> Result<Vec<RemoteEntry>> {
        let dir = self.resolve(remote)?;
        tracing::debug!("Listing {:?} from {:?}", remote, dir);

        let mut read_dir = tokio::fs::read_dir(&dir)
            .await
            .map_err(|e| transport("list_folder", remote, e))?;

        let mut entries = Vec::new();
        while let Some(entry) = read_dir
            .next_entry()
            .await
            .map_err(|e| transport("list_folder", remote, e))?
        {
            let name = entry.file_name().to_string_lossy().to_string();

            // Skip hidden files/directories
            if name.starts_with('.') {
                continue;
            }

            let metadata = match entry.metadata().await {
                Ok(m) => m,
                Err(e) => {
                    tracing::warn!("Skipping {:?}: {}", entry.path(), e);
                    continue;
                }
            };

            let kind = if metadata.is_dir() {
                EntryKind::Folder
            } else {
                EntryKind::File
            };

            entries.push(RemoteEntry {
                name,
                kind,
                size: (kind == EntryKind::File).then(|| metadata.len()),
                modified: metadata.modified().ok().map(DateTime::<Utc>::from),
            });
        }

        entries.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

        Ok(entries)
    }

    async fn upload_file(&self, remote: &str, body: &[u8]) -> Result<()> {
        let target = self.resolve(remote)?;
        ensure_creatable(&target, remote).await?;
        tokio::fs::write(&target, body)
            .await
            .map_err(|e| transport("upload", remote, e))?;
        tracing::info!("Uploaded {} bytes to {}", body.len(), remote);
        Ok(())
    }

    async fn create_folder(&self, remote: &str) -> Result<()> {
        let target = self.resolve(remote)?;
        ensure_creatable(&target, remote).await?;
        tokio::fs::create_dir(&target)
            .await
            .map_err(|e| transport("create_folder", remote, e))?;
        tracing::info!("Created folder {}", remote);
        Ok(())
    }
}
