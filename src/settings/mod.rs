//! Persisted settings for the desk clock.
//!
//! A small JSON key-value store holding the state that survives restarts:
//! - the last selected page (restored when the daemon starts)
//! - the `alarmSound` preference (gates chime playback)
//! - the `confirmExit` preference (gates shutdown while a counter runs)
//!
//! Absent or corrupt files fall back to the documented defaults; a corrupt
//! file is reported at `warn` and overwritten on the next save.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::types::Page;

/// Directory under the home directory holding the settings file and socket.
pub const APP_DIR: &str = ".deskclock";

/// Settings file name inside [`APP_DIR`].
pub const SETTINGS_FILE: &str = "settings.json";

// ============================================================================
// SettingsError
// ============================================================================

/// Errors that can occur while persisting settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file or its directory could not be read or written.
    #[error("設定ファイルの入出力に失敗しました: {0}")]
    Io(#[from] std::io::Error),

    /// The settings could not be serialized.
    #[error("設定のシリアライズに失敗しました: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The home directory could not be determined.
    #[error("ホームディレクトリを特定できません")]
    NoHomeDir,
}

// ============================================================================
// Settings
// ============================================================================

/// Persisted preferences and view state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Last selected page, restored on daemon start
    #[serde(default)]
    pub page: Page,
    /// Whether the alarm chime plays on alarm fire / countdown finish
    #[serde(rename = "alarmSound", default = "default_true")]
    pub alarm_sound: bool,
    /// Whether shutdown is refused while a counter is running
    #[serde(rename = "confirmExit", default = "default_true")]
    pub confirm_exit: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            page: Page::default(),
            alarm_sound: true,
            confirm_exit: true,
        }
    }
}

// ============================================================================
// SettingsStore
// ============================================================================

/// Settings bound to their file location.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    /// Path of the settings file
    path: PathBuf,
    /// Current settings values
    pub settings: Settings,
}

impl SettingsStore {
    /// Returns the default settings file path under the home directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, SettingsError> {
        let home = dirs::home_dir().ok_or(SettingsError::NoHomeDir)?;
        Ok(home.join(APP_DIR).join(SETTINGS_FILE))
    }

    /// Loads settings from the given path.
    ///
    /// A missing file yields the defaults silently; an unreadable or corrupt
    /// file yields the defaults with a warning.
    pub fn load(path: &Path) -> Self {
        let settings = match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(settings) => settings,
                Err(e) => {
                    warn!("設定ファイルが壊れています ({}): デフォルト値を使用します", e);
                    Settings::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Settings::default(),
            Err(e) => {
                warn!("設定ファイルを読み込めません ({}): デフォルト値を使用します", e);
                Settings::default()
            }
        };

        Self {
            path: path.to_path_buf(),
            settings,
        }
    }

    /// Writes the current settings to disk, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the file
    /// cannot be written.
    pub fn save(&self) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&self.settings)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    /// Returns the settings file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

// ============================================================================
// Tests
// ============================================================================
