//! Settings persistence with atomic writes
//!
//! Session settings live in `<root>/settings.json`. A save writes
//! `settings.json.tmp` next to it and renames it into place, so a crash never
//! leaves a half-written settings file behind.

use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::SessionConfig;

/// File name of the persisted settings under the storage root.
pub const SETTINGS_FILE: &str = "settings.json";

const SETTINGS_TEMP_FILE: &str = "settings.json.tmp";

/// Settings directory on disk
#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    /// Settings kept under `root`
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Directory holding the settings file
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of `settings.json`
    pub fn config_path(&self) -> PathBuf {
        self.root.join(SETTINGS_FILE)
    }

    /// Replace the settings file with `data`, creating the root if needed.
    pub fn replace_settings(&self, data: &[u8]) -> Result<()> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("Failed to create settings directory: {:?}", self.root))?;

        let temp_path = self.root.join(SETTINGS_TEMP_FILE);
        let mut temp = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .with_context(|| format!("Failed to open {:?}", temp_path))?;
        temp.write_all(data)
            .and_then(|()| temp.sync_all())
            .with_context(|| format!("Failed to write {:?}", temp_path))?;
        drop(temp);

        let target = self.config_path();
        if let Err(err) = fs::rename(&temp_path, &target) {
            let _ = fs::remove_file(&temp_path);
            return Err(err).with_context(|| format!("Failed to replace {:?}", target));
        }

        File::open(&self.root)
            .and_then(|dir| dir.sync_all())
            .with_context(|| format!("Failed to sync settings directory: {:?}", self.root))?;
        Ok(())
    }

    /// Raw settings bytes, or `None` if nothing was saved yet.
    pub fn read_settings(&self) -> Result<Option<Vec<u8>>> {
        let path = self.config_path();
        match fs::read(&path) {
            Ok(data) => Ok(Some(data)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err).with_context(|| format!("Failed to read {:?}", path)),
        }
    }
}

/// Write session settings under `root`, creating the directory if needed
pub fn write_config(root: &Path, config: &SessionConfig) -> Result<()> {
    config.validate()?;
    let storage = Storage::new(root.to_path_buf());
    let json = serde_json::to_vec_pretty(config).context("Failed to serialize settings")?;
    storage.replace_settings(&json)?;
    debug!(path = ?storage.config_path(), "settings written");
    Ok(())
}

/// Load session settings from `root`; a missing file yields the defaults
pub fn load_config(root: &Path) -> Result<SessionConfig> {
    let storage = Storage::new(root.to_path_buf());
    let Some(data) = storage.read_settings()? else {
        debug!(path = ?storage.config_path(), "no settings file, using defaults");
        return Ok(SessionConfig::default());
    };

    let config: SessionConfig =
        serde_json::from_slice(&data).context("Failed to deserialize settings")?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_and_read_config() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("profile");

        let config = SessionConfig {
            action_delay_ms: 150,
            move_speed: 8,
            ..SessionConfig::default()
        };

        write_config(&root, &config).unwrap();
        let loaded = load_config(&root).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let loaded = load_config(temp.path()).unwrap();
        assert_eq!(loaded, SessionConfig::default());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let temp = TempDir::new().unwrap();
        let storage = Storage::new(temp.path().to_path_buf());
        storage.replace_settings(br#"{"move_speed": 0}"#).unwrap();
        assert!(load_config(temp.path()).is_err());
    }

    #[test]
    fn test_replace_settings_leaves_no_temp_file() {
        let temp = TempDir::new().unwrap();
        let storage = Storage::new(temp.path().join("nested"));

        storage.replace_settings(b"{}").unwrap();
        storage.replace_settings(br#"{"max_repeat": 50}"#).unwrap();

        assert_eq!(
            storage.read_settings().unwrap().as_deref(),
            Some(&br#"{"max_repeat": 50}"#[..])
        );
        assert!(!storage.root().join(SETTINGS_TEMP_FILE).exists());
        assert_eq!(load_config(storage.root()).unwrap().max_repeat, 50);
    }
}
