//! Configuration file persistence for nativedlg
//!
//! This module handles loading and saving the preferences file in the
//! platform-specific config directory, falling back to defaults whenever
//! the file is missing or unreadable.

use crate::config::Settings;
use crate::error::{Error, Result, ResultExt};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Application name used for the config directory
const APP_NAME: &str = "nativedlg";

/// Configuration file name
const CONFIG_FILE_NAME: &str = "config.json";

/// Backup configuration file name (used during atomic writes)
const CONFIG_BACKUP_NAME: &str = "config.json.bak";

// ─────────────────────────────────────────────────────────────────────────────
// Platform-Specific Directory Resolution
// ─────────────────────────────────────────────────────────────────────────────

/// Get the platform-specific configuration directory.
///
/// - **Windows**: `%APPDATA%\nativedlg\`
/// - **macOS**: `~/Library/Application Support/nativedlg/`
/// - **Linux**: `~/.config/nativedlg/`
///
/// # Errors
///
/// Returns `Error::ConfigDirNotFound` if the config directory cannot be determined.
pub fn get_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|base| base.join(APP_NAME))
        .ok_or(Error::ConfigDirNotFound)
}

/// Get the full path to the configuration file.
pub fn get_config_file_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(CONFIG_FILE_NAME))
}

// ─────────────────────────────────────────────────────────────────────────────
// Load Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Load preferences from the default location.
///
/// A missing, empty or corrupted file yields defaults; corruption is logged.
/// The result is exactly what is on disk, so it is safe to save back.
pub fn load_config() -> Settings {
    get_config_file_path()
        .and_then(|path| load_config_from(&path))
        .unwrap_or_warn_default(Settings::default(), "Failed to load configuration")
}

/// Load and sanitize preferences from `config_path`.
pub fn load_config_from(config_path: &Path) -> Result<Settings> {
    if !config_path.exists() {
        debug!(
            "Config file not found at {}, using defaults",
            config_path.display()
        );
        return Ok(Settings::default());
    }

    debug!("Loading config from: {}", config_path.display());

    let contents = fs::read_to_string(config_path).map_err(|e| Error::ConfigLoad {
        path: config_path.to_path_buf(),
        source: Box::new(e),
    })?;

    if contents.trim().is_empty() {
        debug!("Config file is empty, using defaults");
        return Ok(Settings::default());
    }

    let settings = Settings::from_json_sanitized(&contents).map_err(|e| {
        warn!(
            "Config file at {} contains invalid JSON: {}",
            config_path.display(),
            e
        );
        Error::ConfigParse {
            message: format!("Failed to parse config file: {}", e),
            source: Some(Box::new(e)),
        }
    })?;

    info!(
        "Configuration loaded successfully from {}",
        config_path.display()
    );
    Ok(settings)
}

// ─────────────────────────────────────────────────────────────────────────────
// Save Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Save preferences to the default config directory.
///
/// # Errors
///
/// - `Error::ConfigDirNotFound`: Config directory cannot be determined
/// - `Error::ConfigSave`: Failed to write the config file
pub fn save_config(settings: &Settings) -> Result<()> {
    save_config_to(&get_config_dir()?, settings)
}

/// Write `settings` into `config_dir`, creating it if needed.
///
/// The JSON goes to a backup file first and is then renamed over the
/// real one, so a crash never leaves a half-written config.
pub fn save_config_to(config_dir: &Path, settings: &Settings) -> Result<()> {
    if !config_dir.exists() {
        debug!("Creating config directory: {}", config_dir.display());
        fs::create_dir_all(config_dir).map_err(|e| Error::ConfigSave {
            path: config_dir.to_path_buf(),
            source: Box::new(e),
        })?;
    }

    let config_path = config_dir.join(CONFIG_FILE_NAME);
    let backup_path = config_dir.join(CONFIG_BACKUP_NAME);

    debug!("Saving config to: {}", config_path.display());

    let json = serde_json::to_string_pretty(settings).map_err(|e| Error::ConfigSave {
        path: config_path.clone(),
        source: Box::new(e),
    })?;

    fs::write(&backup_path, &json).map_err(|e| Error::ConfigSave {
        path: backup_path.clone(),
        source: Box::new(e),
    })?;

    fs::rename(&backup_path, &config_path).map_err(|e| Error::ConfigSave {
        path: config_path.clone(),
        source: Box::new(e),
    })?;

    info!(
        "Configuration saved successfully to {}",
        config_path.display()
    );
    Ok(())
}

/// Save preferences, logging instead of failing.
///
/// Returns `true` if the save was successful.
pub fn save_config_silent(settings: &Settings) -> bool {
    match save_config(settings) {
        Ok(()) => true,
        Err(e) => {
            warn!("Failed to save configuration: {}", e);
            false
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendKind;
    use tempfile::TempDir;

    /// Helper to create a test environment with a temporary config directory.
    struct TestEnv {
        _temp_dir: TempDir,
        config_dir: PathBuf,
        config_file: PathBuf,
    }

    impl TestEnv {
        fn new() -> Self {
            let temp_dir = TempDir::new().expect("Failed to create temp dir");
            let config_dir = temp_dir.path().join(APP_NAME);
            let config_file = config_dir.join(CONFIG_FILE_NAME);
            Self {
                _temp_dir: temp_dir,
                config_dir,
                config_file,
            }
        }

        fn write_config(&self, content: &str) {
            fs::create_dir_all(&self.config_dir).expect("Failed to create config dir");
            fs::write(&self.config_file, content).expect("Failed to write config");
        }
    }

    #[test]
    fn test_get_config_file_path() {
        if let Ok(path) = get_config_file_path() {
            assert!(path.ends_with(Path::new(APP_NAME).join(CONFIG_FILE_NAME)));
        }
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let env = TestEnv::new();
        let settings = load_config_from(&env.config_file).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let env = TestEnv::new();
        env.write_config("   \n");
        assert_eq!(load_config_from(&env.config_file).unwrap(), Settings::default());
    }

    #[test]
    fn test_corrupted_file_is_parse_error() {
        let env = TestEnv::new();
        env.write_config("{ invalid json }");
        assert!(matches!(
            load_config_from(&env.config_file),
            Err(Error::ConfigParse { .. })
        ));
    }

    #[test]
    fn test_load_sanitizes_values() {
        let env = TestEnv::new();
        env.write_config(r#"{"multi_select_buffer": 1}"#);
        let settings = load_config_from(&env.config_file).unwrap();
        assert_eq!(settings.multi_select_buffer, Settings::MIN_MULTI_SELECT_BUFFER);
    }

    #[test]
    fn test_save_creates_directory_and_reloads() {
        let env = TestEnv::new();
        let original = Settings {
            backend: BackendKind::Zenity,
            last_directory: Some(PathBuf::from("/data/in")),
            confirm_overwrite: false,
            ..Settings::default()
        };

        save_config_to(&env.config_dir, &original).unwrap();

        assert!(env.config_file.exists());
        assert!(!env.config_dir.join(CONFIG_BACKUP_NAME).exists());
        assert_eq!(load_config_from(&env.config_file).unwrap(), original);
    }

    #[test]
    fn test_backend_override_is_not_saved() {
        let env = TestEnv::new();
        env.write_config(r#"{"backend": "auto"}"#);

        let settings = load_config_from(&env.config_file).unwrap();
        let dialogs = crate::Dialogs::with_override(settings, Some(BackendKind::Zenity)).unwrap();
        assert_eq!(dialogs.backend_name(), "zenity");
        assert_eq!(dialogs.settings().backend, BackendKind::Auto);

        save_config_to(&env.config_dir, dialogs.settings()).unwrap();

        let reloaded = load_config_from(&env.config_file).unwrap();
        assert_eq!(reloaded.backend, BackendKind::Auto);
    }

    #[test]
    fn test_saved_file_is_pretty_json() {
        let env = TestEnv::new();
        save_config_to(&env.config_dir, &Settings::default()).unwrap();
        let contents = fs::read_to_string(&env.config_file).unwrap();
        assert!(contents.contains("\n  \"backend\": \"auto\""));
    }
}
