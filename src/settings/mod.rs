pub mod error;
pub mod migration;
pub mod store;
pub mod types;

pub use error::SettingsError;
pub use migration::MigrationReport;
pub use store::SettingsStore;
pub use types::{Dict, Scalar, SettingsConfig, Value};
