//! Reading and writing `preferences.json` in the user config directory

use super::EditorPreferences;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

const PREFERENCES_FILE: &str = "preferences.json";
const QUALIFIER: &str = "com";
const ORGANIZATION: &str = "tessera";
const APPLICATION: &str = "tessera_editor";

#[derive(Debug)]
pub enum PreferencesError {
    /// The file exists but could not be read or written
    Io { path: PathBuf, message: String },
    /// The file is not valid preferences JSON
    Parse { path: PathBuf, message: String },
    Serialize(String),
    /// The platform reports no per-user config directory
    NoConfigDir,
}

impl std::fmt::Display for PreferencesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PreferencesError::Io { path, message } => {
                write!(f, "cannot access {}: {}", path.display(), message)
            }
            PreferencesError::Parse { path, message } => {
                write!(f, "{} is not valid preferences JSON: {}", path.display(), message)
            }
            PreferencesError::Serialize(message) => {
                write!(f, "cannot encode preferences: {}", message)
            }
            PreferencesError::NoConfigDir => write!(f, "no per-user config directory available"),
        }
    }
}

impl std::error::Error for PreferencesError {}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> PreferencesError + '_ {
    move |e| PreferencesError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}

impl EditorPreferences {
    /// Per-user config directory, if the platform has one
    pub fn config_dir() -> Option<PathBuf> {
        let dirs = ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)?;
        Some(dirs.config_dir().to_path_buf())
    }

    pub fn preferences_path() -> Option<PathBuf> {
        Some(Self::config_dir()?.join(PREFERENCES_FILE))
    }

    /// Preferences from the config directory. Never fails: problems are
    /// logged and defaults are used.
    pub fn load() -> Self {
        let Some(path) = Self::preferences_path() else {
            bevy::log::warn!("{}, using default preferences", PreferencesError::NoConfigDir);
            return Self::default();
        };
        Self::load_from_path(&path).unwrap_or_else(|e| {
            bevy::log::warn!("{}, using default preferences", e);
            Self::default()
        })
    }

    /// Read preferences from `path`. A missing file yields defaults; missing
    /// fields take their default values.
    pub fn load_from_path(path: &Path) -> Result<Self, PreferencesError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(io_error(path)(e)),
        };

        serde_json::from_str(&content).map_err(|e| PreferencesError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn save(&self) -> Result<(), PreferencesError> {
        let path = Self::preferences_path().ok_or(PreferencesError::NoConfigDir)?;
        self.save_to_path(&path)
    }

    /// Write preferences to `path` as pretty JSON, creating parent directories
    pub fn save_to_path(&self, path: &Path) -> Result<(), PreferencesError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| PreferencesError::Serialize(e.to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_error(parent))?;
        }
        std::fs::write(path, json).map_err(io_error(path))?;

        bevy::log::info!("Wrote editor preferences to {}", path.display());
        Ok(())
    }
}
