use crate::cloud::{NetworkActivity, SharedClient};
use crate::error::{AppError, Result};
use crate::models::{DirectoryEntry, RemoteEntry};
use crate::path;

/// Lists the folders directly below a remote path.
#[derive(Clone)]
pub struct RemoteDirectoryLister {
    client: SharedClient,
    activity: NetworkActivity,
}

impl RemoteDirectoryLister {
    pub fn new(client: SharedClient, activity: NetworkActivity) -> Self {
        Self { client, activity }
    }

    /// Folders in server order. Zero folders is `EmptyResult`, even when files exist.
    pub async fn list(&self, remote: &str) -> Result<Vec<DirectoryEntry>> {
        path::normalize(remote)?;

        let entries = {
            let _activity = self.activity.begin();
            tracing::info!("Listing folders under {:?}", remote);
            self.client.list_children(remote).await?
        };

        let directories: Vec<DirectoryEntry> = entries
            .iter()
            .filter_map(RemoteEntry::to_directory_entry)
            .collect();

        tracing::debug!(
            "{:?}: {} entries, {} directories",
            remote,
            entries.len(),
            directories.len()
        );

        if directories.is_empty() {
            return Err(AppError::EmptyResult(remote.to_string()));
        }
        Ok(directories)
    }
}
