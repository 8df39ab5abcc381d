use crate::settings::error::SettingsError;
use crate::settings::store::SettingsStore;
use crate::settings::types::Value;

/// What a [`SettingsStore::migrate_keys`] call did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// The guard for this service was already set; nothing was touched.
    pub skipped: bool,
    /// Old keys whose value was copied to the new key.
    pub moved: Vec<String>,
    /// Old keys dropped because their new key already held a value.
    pub kept_existing: Vec<String>,
}

impl SettingsStore {
    /// Renames keys from an older layout, once per `service_name`.
    ///
    /// For every `(old, new)` pair with a value under `old`, the value is copied
    /// to `new` unless `new` already holds one, and `old` is removed either way.
    /// A guard entry then records that `service_name` has migrated, and later
    /// calls return immediately even if an old key reappears.
    pub fn migrate_keys<I, K, V>(
        &self,
        mapping: I,
        service_name: &str,
    ) -> Result<MigrationReport, SettingsError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let guard = self.guard_key(service_name);
        if self.backend().contains(&guard)? {
            tracing::debug!(service = %service_name, "Keys already migrated");
            return Ok(MigrationReport {
                skipped: true,
                ..Default::default()
            });
        }

        let mut report = MigrationReport::default();
        for (old_key, new_key) in mapping {
            let (old_key, new_key) = (old_key.as_ref(), new_key.as_ref());
            if old_key == new_key {
                continue;
            }
            let old_full = self.value_key(old_key);
            let new_full = self.value_key(new_key);

            // Raw bytes are moved so nothing is lost to a decode round trip.
            let Some(bytes) = self.backend().get(&old_full)? else {
                continue;
            };

            if self.backend().contains(&new_full)? {
                tracing::debug!(from = %old_key, to = %new_key, "Target already set, dropping old value");
                report.kept_existing.push(old_key.to_string());
            } else {
                self.backend().set(&new_full, bytes)?;
                report.moved.push(old_key.to_string());
            }
            self.remove(old_key)?;
        }

        self.write(&guard, &Value::from(true))?;

        tracing::info!(
            service = %service_name,
            moved = report.moved.len(),
            kept_existing = report.kept_existing.len(),
            "Migrated keys"
        );
        Ok(report)
    }
}
