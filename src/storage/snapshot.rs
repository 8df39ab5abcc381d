use crc32fast::Hasher;
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::storage::error::StorageError;

const MAGIC: &[u8; 4] = b"PFS1";
const HEADER_LEN: usize = 8; // magic + crc32

pub type SnapshotState = HashMap<String, Vec<u8>>;

/// Layout: `MAGIC | crc32(payload) LE | bincode(payload)`.
pub fn encode(state: &SnapshotState) -> Result<Vec<u8>, StorageError> {
    let payload = bincode::serialize(state)?;

    let mut hasher = Hasher::new();
    hasher.update(&payload);
    let checksum = hasher.finalize();

    let mut buf = Vec::with_capacity(HEADER_LEN + payload.len());
    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&checksum.to_le_bytes());
    buf.extend_from_slice(&payload);
    Ok(buf)
}

pub fn decode(path: &Path, data: &[u8]) -> Result<SnapshotState, StorageError> {
    let corrupt = |reason: String| StorageError::Corrupt {
        path: path.display().to_string(),
        reason,
    };

    if data.len() < HEADER_LEN {
        return Err(corrupt("too short".to_string()));
    }
    if &data[..4] != MAGIC {
        return Err(corrupt("bad magic".to_string()));
    }

    let mut stored = [0u8; 4];
    stored.copy_from_slice(&data[4..HEADER_LEN]);
    let stored = u32::from_le_bytes(stored);

    let payload = &data[HEADER_LEN..];
    let mut hasher = Hasher::new();
    hasher.update(payload);
    let computed = hasher.finalize();
    if stored != computed {
        return Err(corrupt(format!(
            "checksum mismatch: expected {}, got {}",
            computed, stored
        )));
    }

    bincode::deserialize(payload).map_err(|e| corrupt(e.to_string()))
}

/// Writes to `<path>.tmp` and renames it over `path`.
pub fn save(path: &Path, state: &SnapshotState) -> Result<(), StorageError> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
    }

    let serialized = encode(state)?;
    let tmp = sibling(path, "tmp");

    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&tmp)?;
    file.write_all(&serialized)?;
    file.sync_all()?;
    drop(file);

    fs::rename(&tmp, path)?;

    tracing::debug!(path = %path.display(), entries = state.len(), "Snapshot saved");
    Ok(())
}

/// `Ok(None)` if there is no snapshot at `path` yet.
pub fn load(path: &Path) -> Result<Option<SnapshotState>, StorageError> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let state = decode(path, &data)?;
    tracing::info!(path = %path.display(), entries = state.len(), "Snapshot loaded");
    Ok(Some(state))
}

/// Moves an unreadable snapshot to `<path>.corrupt` so the next save does not destroy it.
pub fn quarantine(path: &Path) -> Result<PathBuf, StorageError> {
    let target = sibling(path, "corrupt");
    fs::rename(path, &target)?;
    Ok(target)
}

fn sibling(path: &Path, ext: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> SnapshotState {
        let mut state = HashMap::new();
        state.insert("a".to_string(), b"1".to_vec());
        state.insert("b".to_string(), b"two".to_vec());
        state
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("prefs.bin");

        save(&path, &sample()).unwrap();
        let loaded = load(&path).unwrap().unwrap();
        assert_eq!(loaded, sample());
        assert!(!sibling(&path, "tmp").exists());
    }

    #[test]
    fn test_load_missing_is_none() {
        let dir = TempDir::new().unwrap();
        assert!(load(&dir.path().join("nope.bin")).unwrap().is_none());
    }

    #[test]
    fn test_flipped_byte_is_corrupt() {
        let path = Path::new("prefs.bin");
        let mut data = encode(&sample()).unwrap();
        let last = data.len() - 1;
        data[last] ^= 0xff;

        let err = decode(path, &data).unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { .. }));
    }

    #[test]
    fn test_bad_magic_is_corrupt() {
        let err = decode(Path::new("prefs.bin"), b"NOPE\0\0\0\0").unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { ref reason, .. } if reason == "bad magic"));
    }
}
