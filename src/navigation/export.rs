use crate::cloud::{NetworkActivity, SharedClient};
use crate::error::Result;

/// Uploads a payload to an already resolved destination.
///
/// Performs no existence check of its own; a name clash comes back from the
/// client as a transport error.
#[derive(Clone)]
pub struct ExportTrigger {
    client: SharedClient,
    activity: NetworkActivity,
}

impl ExportTrigger {
    pub fn new(client: SharedClient, activity: NetworkActivity) -> Self {
        Self { client, activity }
    }

    pub async fn export(&self, destination: &str, payload: &[u8]) -> Result<()> {
        let _activity = self.activity.begin();
        tracing::info!("Exporting {} bytes to {}", payload.len(), destination);
        self.client.upload_file(destination, payload).await
    }
}
