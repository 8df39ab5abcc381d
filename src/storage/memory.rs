use parking_lot::RwLock;
use std::collections::HashMap;

use crate::storage::backend::Backend;
use crate::storage::error::StorageError;

#[derive(Debug, Default)]
pub struct MemoryBackend {
    map: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_map(map: HashMap<String, Vec<u8>>) -> Self {
        Self {
            map: RwLock::new(map),
        }
    }

    pub fn len(&self) -> usize {
        let map = self.map.read();
        map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Full clone of the map, used when persisting.
    pub fn snapshot(&self) -> HashMap<String, Vec<u8>> {
        let map = self.map.read();
        map.clone()
    }
}

impl Backend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let map = self.map.read();
        Ok(map.get(key).cloned())
    }

    fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
        let mut map = self.map.write();
        map.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool, StorageError> {
        let mut map = self.map.write();
        Ok(map.remove(key).is_some())
    }

    fn contains(&self, key: &str) -> Result<bool, StorageError> {
        let map = self.map.read();
        Ok(map.contains_key(key))
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let map = self.map.read();
        let mut keys: Vec<String> = map.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}
