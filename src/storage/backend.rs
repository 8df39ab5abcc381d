use crate::storage::error::StorageError;

/// A durable string-keyed byte store.
///
/// Implementations are synchronous and must be safe to share across threads.
/// Each call is atomic for the single key it touches; nothing wider is promised.
pub trait Backend: Send + Sync + std::fmt::Debug {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError>;

    /// Returns `true` if a value was present and removed.
    fn remove(&self, key: &str) -> Result<bool, StorageError>;

    fn contains(&self, key: &str) -> Result<bool, StorageError>;

    /// All keys currently stored, sorted.
    fn keys(&self) -> Result<Vec<String>, StorageError>;

    fn flush(&self) -> Result<(), StorageError> {
        Ok(())
    }
}
