use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::PathBuf,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use crate::alerts::AlertThresholds;
use crate::backend::BackendConfig;
use crate::history::StageDurations;

pub const SETTINGS_PATH_ENV: &str = "AGRISENSE_SETTINGS";
pub const API_KEY_ENV: &str = "AGRISENSE_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub backend: BackendConfig,
    pub thresholds: AlertThresholds,
    pub stage_durations: StageDurations,
    pub refresh_interval_secs: u64,
    pub fetch_timeout_secs: u64,
}

impl Settings {
    /// Replaces zero refresh intervals or fetch timeouts, which would stall
    /// the dashboard, with the defaults.
    fn sanitize(&mut self) {
        let defaults = Settings::default();
        if self.refresh_interval_secs == 0 {
            warn!(
                "refresh_interval_secs must be positive; using {}",
                defaults.refresh_interval_secs
            );
            self.refresh_interval_secs = defaults.refresh_interval_secs;
        }
        if self.fetch_timeout_secs == 0 {
            warn!(
                "fetch_timeout_secs must be positive; using {}",
                defaults.fetch_timeout_secs
            );
            self.fetch_timeout_secs = defaults.fetch_timeout_secs;
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            thresholds: AlertThresholds::default(),
            stage_durations: StageDurations::default(),
            refresh_interval_secs: 60,
            fetch_timeout_secs: 120,
        }
    }
}

/// `$AGRISENSE_SETTINGS`, else `<data dir>/agrisense/settings.json`.
pub fn default_settings_path() -> PathBuf {
    if let Ok(path) = std::env::var(SETTINGS_PATH_ENV) {
        return PathBuf::from(path);
    }
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("agrisense")
        .join("settings.json")
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<Settings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let mut data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                warn!(
                    "Ignoring unreadable settings at {}: {err}",
                    path.display()
                );
                Settings::default()
            })
        } else {
            Settings::default()
        };

        data.sanitize();

        // Secrets are taken from the environment rather than written to disk.
        if let Ok(api_key) = std::env::var(API_KEY_ENV) {
            data.backend.api_key = api_key;
        }

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    fn read(&self) -> RwLockReadGuard<'_, Settings> {
        self.data.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Settings> {
        self.data.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn snapshot(&self) -> Settings {
        self.read().clone()
    }

    pub fn backend(&self) -> BackendConfig {
        self.read().backend.clone()
    }

    pub fn thresholds(&self) -> AlertThresholds {
        self.read().thresholds.clone()
    }

    pub fn stage_durations(&self) -> StageDurations {
        self.read().stage_durations.clone()
    }

    pub fn update_thresholds(&self, thresholds: AlertThresholds) -> Result<()> {
        let mut guard = self.write();
        guard.thresholds = thresholds;
        self.persist(&guard)
    }

    pub fn update_stage_durations(&self, durations: StageDurations) -> Result<()> {
        let mut guard = self.write();
        guard.stage_durations = durations;
        self.persist(&guard)
    }

    fn persist(&self, data: &Settings) -> Result<()> {
        let mut on_disk = data.clone();
        on_disk.backend.api_key.clear();

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create settings directory {}", parent.display())
            })?;
        }
        let serialized = serde_json::to_string_pretty(&on_disk)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::Band;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("agrisense-settings-{}-{name}", std::process::id()))
            .join("settings.json")
    }

    #[test]
    fn missing_file_yields_defaults() {
        let store = SettingsStore::new(temp_path("missing")).unwrap();
        let settings = store.snapshot();
        assert_eq!(settings.stage_durations, StageDurations::default());
        assert_eq!(settings.thresholds, AlertThresholds::default());
        assert_eq!(settings.refresh_interval_secs, 60);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let path = temp_path("partial");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{ "stage_durations": { "seedling_days": 7 } }"#).unwrap();

        let store = SettingsStore::new(path.clone()).unwrap();
        let durations = store.stage_durations();
        assert_eq!(durations.seedling_days, 7);
        assert_eq!(durations.vegetative_days, 10);

        fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn zero_timings_are_replaced_with_defaults() {
        let path = temp_path("zero-timings");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{ "refresh_interval_secs": 0, "fetch_timeout_secs": 0 }"#).unwrap();

        let settings = SettingsStore::new(path.clone()).unwrap().snapshot();
        assert_eq!(settings.refresh_interval_secs, 60);
        assert_eq!(settings.fetch_timeout_secs, 120);

        fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let path = temp_path("corrupt");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();

        let store = SettingsStore::new(path.clone()).unwrap();
        assert_eq!(store.thresholds(), AlertThresholds::default());

        fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn threshold_updates_persist_across_reopen() {
        let path = temp_path("persist");
        let store = SettingsStore::new(path.clone()).unwrap();

        let thresholds = AlertThresholds {
            humidity_percent: Band::new(30.0, 90.0),
            ..AlertThresholds::default()
        };
        store.update_thresholds(thresholds.clone()).unwrap();

        let reopened = SettingsStore::new(path.clone()).unwrap();
        assert_eq!(reopened.thresholds(), thresholds);

        fs::remove_dir_all(path.parent().unwrap()).ok();
    }
}
