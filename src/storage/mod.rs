pub mod backend;
pub mod error;
pub mod file;
pub mod memory;
pub mod snapshot;
pub mod types;

pub use backend::Backend;
pub use error::StorageError;
pub use file::FileBackend;
pub use memory::MemoryBackend;
pub use types::{StorageConfig, SyncPolicy};
