//! Profile directory loader.

use teamfinder_core::directory::DirectoryEntry;
use teamfinder_core::error::Result;
use teamfinder_core::gateway::RecordStore;

/// Fetches every profile together with its resolved skills.
#[derive(Clone)]
pub struct ProfileDirectoryLoader {
    store: RecordStore,
}

impl ProfileDirectoryLoader {
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }

    pub async fn load(&self) -> Result<Vec<DirectoryEntry>> {
        let entries = self.store.list_directory().await?;
        tracing::debug!(count = entries.len(), "Loaded profile directory");
        Ok(entries)
    }
}
