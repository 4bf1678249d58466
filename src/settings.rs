use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::PathBuf,
    sync::{PoisonError, RwLock},
};

pub const MIN_SPIN_DURATION_MS: u64 = 500;
pub const MAX_SPIN_DURATION_MS: u64 = 15_000;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SpinSettings {
    /// How long the spin animation plays before the result is recorded.
    pub duration_ms: u64,
}

impl Default for SpinSettings {
    fn default() -> Self {
        Self { duration_ms: 4_000 }
    }
}

impl SpinSettings {
    fn clamped(self) -> Self {
        Self {
            duration_ms: self
                .duration_ms
                .clamp(MIN_SPIN_DURATION_MS, MAX_SPIN_DURATION_MS),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct UserSettings {
    #[serde(default)]
    spin: SpinSettings,
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<UserSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                warn!("Ignoring unreadable settings at {}: {err}", path.display());
                UserSettings::default()
            })
        } else {
            UserSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn spin(&self) -> SpinSettings {
        self.data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .spin
            .clamped()
    }

    /// Stores new spin settings, clamping the duration into the supported
    /// range. Returns what was actually stored.
    pub fn update_spin(&self, settings: SpinSettings) -> Result<SpinSettings> {
        let settings = settings.clamped();
        let mut guard = self.data.write().unwrap_or_else(PoisonError::into_inner);
        guard.spin = settings;
        self.persist(&guard)?;
        Ok(settings)
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json")).unwrap();
        assert_eq!(store.spin(), SpinSettings::default());
    }

    #[test]
    fn corrupt_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();

        let store = SettingsStore::new(path).unwrap();
        assert_eq!(store.spin(), SpinSettings::default());
    }

    #[test]
    fn update_persists_across_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let store = SettingsStore::new(path.clone()).unwrap();
        store.update_spin(SpinSettings { duration_ms: 2_500 }).unwrap();

        let reloaded = SettingsStore::new(path).unwrap();
        assert_eq!(reloaded.spin().duration_ms, 2_500);
    }

    #[test]
    fn duration_is_clamped() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json")).unwrap();

        let stored = store.update_spin(SpinSettings { duration_ms: 10 }).unwrap();
        assert_eq!(stored.duration_ms, MIN_SPIN_DURATION_MS);

        let stored = store.update_spin(SpinSettings { duration_ms: 60_000 }).unwrap();
        assert_eq!(stored.duration_ms, MAX_SPIN_DURATION_MS);
    }

    #[test]
    fn hand_edited_out_of_range_value_is_clamped_on_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"spin": {"durationMs": 1}}"#).unwrap();

        let store = SettingsStore::new(path).unwrap();
        assert_eq!(store.spin().duration_ms, MIN_SPIN_DURATION_MS);
    }
}
