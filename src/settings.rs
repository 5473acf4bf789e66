use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::PathBuf,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
    time::Duration,
};

use crate::models::ExerciseMode;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub user_id: Option<i64>,
    /// Raw selector value; resolved with [`ExerciseMode::from_selector`].
    pub exercise: Option<String>,
    pub sample_interval_ms: u64,
    pub attendance_window_days: i64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            user_id: None,
            exercise: None,
            sample_interval_ms: 33,
            attendance_window_days: 7,
        }
    }
}

impl EngineSettings {
    pub fn exercise_mode(&self) -> Result<ExerciseMode> {
        Ok(ExerciseMode::from_selector(self.exercise.as_deref())?)
    }

    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms.max(1))
    }
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<EngineSettings>,
}

impl SettingsStore {
    /// Loads settings from `path`, falling back to defaults when the file is
    /// missing or unreadable as JSON.
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            match serde_json::from_str(&contents) {
                Ok(settings) => settings,
                Err(err) => {
                    log::warn!(
                        "Ignoring malformed settings at {}: {err}",
                        path.display()
                    );
                    EngineSettings::default()
                }
            }
        } else {
            EngineSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn current(&self) -> EngineSettings {
        self.read().clone()
    }

    pub fn update<F>(&self, change: F) -> Result<EngineSettings>
    where
        F: FnOnce(&mut EngineSettings),
    {
        let mut guard = self.write();
        change(&mut guard);
        self.persist(&guard)?;
        Ok(guard.clone())
    }

    fn persist(&self, data: &EngineSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }

    fn read(&self) -> RwLockReadGuard<'_, EngineSettings> {
        self.data.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, EngineSettings> {
        self.data.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use tempfile::tempdir;

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json")).unwrap();

        let settings = store.current();
        assert_eq!(settings, EngineSettings::default());
        assert_eq!(settings.sample_interval(), Duration::from_millis(33));
    }

    #[test]
    fn unset_exercise_fails_fast() {
        let err = EngineSettings::default().exercise_mode().unwrap_err();
        assert_eq!(
            err.downcast_ref::<EngineError>(),
            Some(&EngineError::MissingExerciseMode)
        );
    }

    #[test]
    fn updates_are_persisted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let store = SettingsStore::new(path.clone()).unwrap();
        store
            .update(|settings| {
                settings.user_id = Some(42);
                settings.exercise = Some("hand_raises".into());
            })
            .unwrap();

        let reloaded = SettingsStore::new(path).unwrap().current();
        assert_eq!(reloaded.user_id, Some(42));
        assert_eq!(reloaded.exercise_mode().unwrap(), ExerciseMode::HandRaises);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "exercise": "default" }"#).unwrap();

        let settings = SettingsStore::new(path).unwrap().current();
        assert_eq!(settings.exercise_mode().unwrap(), ExerciseMode::Default);
        assert_eq!(settings.attendance_window_days, 7);
    }
}
