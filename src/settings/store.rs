use std::collections::BTreeSet;
use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::config::AppConfig;
use crate::settings::error::SettingsError;
use crate::settings::types::{Dict, Scalar, SettingsConfig, Value};
use crate::storage::{Backend, FileBackend, MemoryBackend};

/// Key/value settings over a [`Backend`], with optional per-key freshness tracking.
///
/// Every key is stored under `config.prefix`. Keys written through
/// [`update_object`](Self::update_object) or
/// [`update_dictionary`](Self::update_dictionary) get a shadow entry holding the
/// Unix time they were last considered fresh. Expiry is only evaluated when an
/// update call looks at it; nothing is swept.
///
/// Reads and writes are not wrapped in a transaction, so two callers updating
/// the same key concurrently can interleave. Each key is expected to have a
/// single owner.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    backend: Arc<dyn Backend>,
    clock: Arc<dyn Clock>,
    config: SettingsConfig,
}

impl SettingsStore {
    pub fn new(backend: Arc<dyn Backend>, clock: Arc<dyn Clock>, config: SettingsConfig) -> Self {
        Self {
            backend,
            clock,
            config,
        }
    }

    /// Opens the file-backed store described by `config`.
    pub fn open(config: &AppConfig) -> Result<Self, SettingsError> {
        let backend = FileBackend::open(&config.storage)?;
        Ok(Self::new(
            Arc::new(backend),
            Arc::new(SystemClock),
            config.settings.clone(),
        ))
    }

    /// A fresh, empty store that lives only in memory. Each call returns an
    /// independent instance, which is what tests want instead of a reset.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(MemoryBackend::new()),
            Arc::new(SystemClock),
            SettingsConfig::default(),
        )
    }

    pub fn config(&self) -> &SettingsConfig {
        &self.config
    }

    pub fn backend(&self) -> &Arc<dyn Backend> {
        &self.backend
    }

    pub(crate) fn value_key(&self, key: &str) -> String {
        format!("{}{}", self.config.prefix, key)
    }

    fn timestamp_key(&self, key: &str) -> String {
        format!("{}{}{}", self.config.prefix, key, self.config.timestamp_suffix)
    }

    pub(crate) fn guard_key(&self, service_name: &str) -> String {
        format!(
            "{}{}{}",
            self.config.prefix, self.config.migration_prefix, service_name
        )
    }

    // Missing, unreadable and undecodable all collapse to `None`.
    pub(crate) fn read(&self, full_key: &str) -> Option<Value> {
        let bytes = match self.backend.get(full_key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(key = %full_key, error = %e, "Backend read failed, treating as absent");
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key = %full_key, error = %e, "Undecodable value, treating as absent");
                None
            }
        }
    }

    pub(crate) fn write(&self, full_key: &str, value: &Value) -> Result<(), SettingsError> {
        if !value.is_finite() {
            return Err(SettingsError::NonFinite(full_key.to_string()));
        }
        let bytes = serde_json::to_vec(value)?;
        self.backend.set(full_key, bytes)?;
        Ok(())
    }

    fn touch(&self, key: &str, now: f64) -> Result<(), SettingsError> {
        self.write(&self.timestamp_key(key), &Value::Scalar(Scalar::Number(now)))
    }

    /// Seconds since `key` was last marked fresh; infinite if it never was.
    fn elapsed(&self, key: &str, now: f64) -> f64 {
        match self.read(&self.timestamp_key(key)) {
            Some(Value::Scalar(Scalar::Number(ts))) => now - ts,
            _ => f64::INFINITY,
        }
    }

    fn is_expired(&self, key: &str, ttl_secs: f64, now: f64) -> bool {
        // `!(ttl > 0)` also catches NaN
        !(ttl_secs > 0.0) || self.elapsed(key, now) >= ttl_secs
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.read(&self.value_key(key))
    }

    pub fn set(&self, key: &str, value: impl Into<Value>) -> Result<(), SettingsError> {
        self.write(&self.value_key(key), &value.into())
    }

    /// Removes `key` and its freshness timestamp. Absent keys are a no-op.
    pub fn remove(&self, key: &str) -> Result<(), SettingsError> {
        self.backend.remove(&self.value_key(key))?;
        self.backend.remove(&self.timestamp_key(key))?;
        Ok(())
    }

    pub fn contains(&self, key: &str) -> bool {
        let full_key = self.value_key(key);
        match self.backend.contains(&full_key) {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(key = %full_key, error = %e, "Backend lookup failed, treating as absent");
                false
            }
        }
    }

    /// Writes `value` unless it equals the stored one and `key` is still fresh.
    ///
    /// Returns `true` when a write happened. An expired key is always rewritten
    /// and reported as changed, even if the value is identical. A `ttl_secs`
    /// of zero or less means every call is expired.
    pub fn update_object(
        &self,
        key: &str,
        value: impl Into<Value>,
        ttl_secs: f64,
    ) -> Result<bool, SettingsError> {
        let value = value.into();
        let now = self.clock.now();

        if !self.is_expired(key, ttl_secs, now) && self.get(key).as_ref() == Some(&value) {
            tracing::debug!(key = %key, "Value unchanged and fresh, skipping write");
            return Ok(false);
        }

        self.set(key, value)?;
        self.touch(key, now)?;
        tracing::debug!(key = %key, ttl_secs, "Value updated");
        Ok(true)
    }

    /// Same as `update_object(key, value, 0.0)`: always writes.
    pub fn update_object_no_expiry(
        &self,
        key: &str,
        value: impl Into<Value>,
    ) -> Result<bool, SettingsError> {
        self.update_object(key, value, 0.0)
    }

    /// Merges `dict` into the dictionary stored at `key` and returns the full result.
    ///
    /// While `key` is fresh, incoming entries overwrite stored ones and the rest
    /// are kept; the freshness window stays anchored to the last full write.
    /// Once expired (or when nothing dictionary-shaped is stored) `dict`
    /// replaces the stored value outright and the window restarts.
    pub fn update_dictionary(
        &self,
        dict: Dict,
        key: &str,
        ttl_secs: f64,
    ) -> Result<Dict, SettingsError> {
        let now = self.clock.now();
        let stored = self.get(key).and_then(Value::into_dict);

        match stored {
            Some(mut merged) if !self.is_expired(key, ttl_secs, now) => {
                merged.extend(dict);
                self.write(&self.value_key(key), &Value::Dict(merged.clone()))?;
                tracing::debug!(key = %key, entries = merged.len(), "Dictionary merged");
                Ok(merged)
            }
            _ => {
                self.write(&self.value_key(key), &Value::Dict(dict.clone()))?;
                self.touch(key, now)?;
                tracing::debug!(key = %key, entries = dict.len(), ttl_secs, "Dictionary replaced");
                Ok(dict)
            }
        }
    }

    /// Same as `update_dictionary(dict, key, 0.0)`: always replaces.
    pub fn update_dictionary_no_expiry(&self, dict: Dict, key: &str) -> Result<Dict, SettingsError> {
        self.update_dictionary(dict, key, 0.0)
    }

    /// Logical keys in this store's namespace, sorted. Migration guards and
    /// shadow timestamps are left out unless `include_internal` is set.
    ///
    /// A key counts as a shadow timestamp when it ends in the timestamp suffix
    /// and the key without the suffix is also stored. So a user key such as
    /// `build.timestamp` is listed unless `build` exists too.
    pub fn keys(&self, include_internal: bool) -> Result<Vec<String>, SettingsError> {
        let all: BTreeSet<String> = self.backend.keys()?.into_iter().collect();
        let guard_prefix = self.guard_key("");
        let suffix = &self.config.timestamp_suffix;

        let is_internal = |k: &str| {
            k.starts_with(&guard_prefix)
                || k.strip_suffix(suffix.as_str())
                    .map_or(false, |owner| all.contains(owner))
        };

        let keys = all
            .iter()
            .filter(|k| include_internal || !is_internal(k.as_str()))
            .filter_map(|k| k.strip_prefix(&self.config.prefix).map(str::to_string))
            .collect();
        Ok(keys)
    }

    pub fn flush(&self) -> Result<(), SettingsError> {
        self.backend.flush()?;
        Ok(())
    }
}
