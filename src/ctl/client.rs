use std::path::Path;

use crate::config::AppConfig;
use crate::ctl::types::CtlError;
use crate::settings::SettingsStore;

/// Opens the store named by the config file at `config_path`, or the
/// default store if that file does not exist.
pub fn open_store(config_path: &Path) -> Result<SettingsStore, CtlError> {
    let config = AppConfig::load_or_default(config_path)?;
    tracing::debug!(path = %config.storage.path, "Opening settings store");
    Ok(SettingsStore::open(&config)?)
}
