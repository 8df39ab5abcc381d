use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::storage::backend::Backend;
use crate::storage::error::StorageError;
use crate::storage::memory::MemoryBackend;
use crate::storage::snapshot;
use crate::storage::types::{StorageConfig, SyncPolicy};

/// In-memory map mirrored to a single snapshot file.
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    sync_policy: SyncPolicy,
    inner: MemoryBackend,
    dirty: AtomicBool,
    // Held across snapshot + save so files land on disk in write order.
    writer: Mutex<()>,
}

impl FileBackend {
    /// Opens the snapshot at `config.path`, starting empty if it is missing.
    ///
    /// A corrupt snapshot is moved aside and the backend starts empty: stored
    /// values are caches, so losing them is preferable to refusing to start.
    pub fn open(config: &StorageConfig) -> Result<Self, StorageError> {
        let path = PathBuf::from(&config.path);

        let state = match snapshot::load(&path) {
            Ok(Some(state)) => state,
            Ok(None) => Default::default(),
            Err(StorageError::Corrupt { path: p, reason }) => {
                let moved = snapshot::quarantine(&path)?;
                tracing::warn!(
                    path = %p,
                    moved_to = %moved.display(),
                    reason = %reason,
                    "Corrupt snapshot, starting empty"
                );
                Default::default()
            }
            Err(e) => return Err(e),
        };

        Ok(Self {
            path,
            sync_policy: config.sync_policy,
            inner: MemoryBackend::from_map(state),
            dirty: AtomicBool::new(false),
            writer: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), StorageError> {
        let _writer = self.writer.lock();

        // Cleared before the snapshot: a write landing after it marks us dirty again.
        self.dirty.store(false, Ordering::Release);
        let state = self.inner.snapshot();
        if let Err(e) = snapshot::save(&self.path, &state) {
            self.dirty.store(true, Ordering::Release);
            return Err(e);
        }
        Ok(())
    }

    fn after_write(&self) -> Result<(), StorageError> {
        self.dirty.store(true, Ordering::Release);
        match self.sync_policy {
            SyncPolicy::EveryWrite => self.persist(),
            SyncPolicy::OnFlush => Ok(()),
        }
    }
}

impl Backend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
        self.inner.set(key, value)?;
        self.after_write()
    }

    fn remove(&self, key: &str) -> Result<bool, StorageError> {
        let removed = self.inner.remove(key)?;
        if removed {
            self.after_write()?;
        }
        Ok(removed)
    }

    fn contains(&self, key: &str) -> Result<bool, StorageError> {
        self.inner.contains(key)
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        self.inner.keys()
    }

    fn flush(&self) -> Result<(), StorageError> {
        if self.dirty.load(Ordering::Acquire) {
            self.persist()?;
        }
        Ok(())
    }
}

impl Drop for FileBackend {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            tracing::error!(path = %self.path.display(), error = %e, "Failed to persist snapshot on drop");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use tempfile::TempDir;

    fn config(dir: &TempDir, sync_policy: SyncPolicy) -> StorageConfig {
        StorageConfig {
            path: dir.path().join("prefs.bin").to_str().unwrap().to_string(),
            sync_policy,
        }
    }

    #[test]
    fn test_every_write_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let cfg = config(&dir, SyncPolicy::EveryWrite);

        {
            let backend = FileBackend::open(&cfg).unwrap();
            backend.set("k", b"v".to_vec()).unwrap();
            backend.set("gone", b"x".to_vec()).unwrap();
            backend.remove("gone").unwrap();
            assert!(backend.path().exists());
        }

        let backend = FileBackend::open(&cfg).unwrap();
        assert_eq!(backend.get("k").unwrap(), Some(b"v".to_vec()));
        assert_eq!(backend.get("gone").unwrap(), None);
    }

    #[test]
    fn test_on_flush_writes_lazily() {
        let dir = TempDir::new().unwrap();
        let cfg = config(&dir, SyncPolicy::OnFlush);

        let backend = FileBackend::open(&cfg).unwrap();
        backend.set("k", b"v".to_vec()).unwrap();
        assert!(!backend.path().exists());

        backend.flush().unwrap();
        assert!(backend.path().exists());

        backend.set("k2", b"v2".to_vec()).unwrap();
        drop(backend);

        let backend = FileBackend::open(&cfg).unwrap();
        assert_eq!(backend.get("k2").unwrap(), Some(b"v2".to_vec()));
    }

    #[test]
    fn test_concurrent_writers_all_persist() {
        let dir = TempDir::new().unwrap();
        let cfg = config(&dir, SyncPolicy::EveryWrite);
        let backend = Arc::new(FileBackend::open(&cfg).unwrap());

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let backend = backend.clone();
                thread::spawn(move || {
                    for i in 0..50 {
                        backend
                            .set(&format!("key_{}_{}", t, i), vec![t as u8, i as u8])
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        // skip the flush on drop: every acknowledged write must already be on disk
        let backend = Arc::try_unwrap(backend).unwrap();
        std::mem::forget(backend);

        let reopened = FileBackend::open(&cfg).unwrap();
        assert_eq!(reopened.keys().unwrap().len(), 400);
        assert_eq!(reopened.get("key_7_49").unwrap(), Some(vec![7, 49]));
    }

    #[test]
    fn test_corrupt_snapshot_starts_empty() {
        let dir = TempDir::new().unwrap();
        let cfg = config(&dir, SyncPolicy::EveryWrite);
        std::fs::write(&cfg.path, b"garbage garbage").unwrap();

        let backend = FileBackend::open(&cfg).unwrap();
        assert!(backend.keys().unwrap().is_empty());
        assert!(dir.path().join("prefs.bin.corrupt").exists());
    }
}
