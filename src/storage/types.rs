use serde::Deserialize;

/// When a [`FileBackend`](super::FileBackend) writes its snapshot to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum SyncPolicy {
    /// Persist after every mutating call.
    EveryWrite,
    /// Persist only on explicit `flush()` and when the backend is dropped.
    OnFlush,
}

impl Default for SyncPolicy {
    fn default() -> Self {
        SyncPolicy::EveryWrite
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub path: String,
    pub sync_policy: SyncPolicy,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: "data/prefs.bin".to_string(),
            sync_policy: SyncPolicy::EveryWrite,
        }
    }
}
