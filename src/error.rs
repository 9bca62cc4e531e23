//! Centralized error handling for nativedlg
//!
//! A dialog that was dismissed is not an error: it comes back as a cancelled
//! [`Selection`](crate::Selection). This type only covers the failures that
//! happen around the dialog: no dialog facility on the host, a helper
//! program that cannot be spawned, text the native encoding cannot carry,
//! and preference file I/O.

use log::warn;
use std::fmt;
use std::io;
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Custom Result Type Alias
// ─────────────────────────────────────────────────────────────────────────────

/// A specialized `Result` type for the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// The centralized error type for the crate.
#[derive(Debug)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────────────────
    // Dialog Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// A helper program (zenity, kdialog, osascript) could not be started
    Spawn { program: String, source: io::Error },

    /// No dialog facility was found on this host
    NoBackend,

    /// The requested backend is not compiled in or not supported here
    BackendUnavailable(String),

    /// Text handed to the native API contains an interior NUL
    InvalidText(&'static str),

    // ─────────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// Failed to load configuration file
    ConfigLoad {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to save configuration file
    ConfigSave {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to parse configuration (invalid JSON/format)
    ConfigParse {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration directory not found or inaccessible
    ConfigDirNotFound,
}

// ─────────────────────────────────────────────────────────────────────────────
// Display trait implementation for user-friendly error messages
// ─────────────────────────────────────────────────────────────────────────────
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Dialog Errors
            Error::Spawn { program, source } => {
                write!(f, "Failed to start '{}': {}", program, source)
            }
            Error::NoBackend => {
                write!(f, "No native dialog facility found (tried zenity and kdialog)")
            }
            Error::BackendUnavailable(name) => {
                write!(f, "Dialog backend '{}' is not available on this build", name)
            }
            Error::InvalidText(what) => {
                write!(f, "The dialog {} contains a NUL character", what)
            }

            // Configuration Errors
            Error::ConfigLoad { path, source } => {
                write!(
                    f,
                    "Failed to load configuration from '{}': {}",
                    path.display(),
                    source
                )
            }
            Error::ConfigSave { path, source } => {
                write!(
                    f,
                    "Failed to save configuration to '{}': {}",
                    path.display(),
                    source
                )
            }
            Error::ConfigParse { message, .. } => {
                write!(f, "Invalid configuration format: {}", message)
            }
            Error::ConfigDirNotFound => {
                write!(f, "Configuration directory not found")
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// std::error::Error trait implementation for error chaining
// ─────────────────────────────────────────────────────────────────────────────
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Spawn { source, .. } => Some(source),
            Error::ConfigLoad { source, .. } => Some(source.as_ref()),
            Error::ConfigSave { source, .. } => Some(source.as_ref()),
            Error::ConfigParse { source, .. } => source
                .as_ref()
                .map(|s| s.as_ref() as &(dyn std::error::Error + 'static)),
            Error::NoBackend
            | Error::BackendUnavailable(_)
            | Error::InvalidText(_)
            | Error::ConfigDirNotFound => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Graceful Degradation Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Extension trait for Result to support graceful degradation.
pub trait ResultExt<T> {
    /// If the result is an error, log it at warning level and return the provided default.
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T;
}

impl<T> ResultExt<T> for Result<T> {
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T {
        match self {
            Ok(value) => value,
            Err(err) => {
                warn!("{}: {}. Using default.", context, err);
                default
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    #[test]
    fn test_spawn_error_display_and_source() {
        let err = Error::Spawn {
            program: "zenity".to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };
        let msg = err.to_string();
        assert!(msg.contains("zenity"));
        assert!(msg.contains("no such file"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_config_parse_keeps_source() {
        let json_err = serde_json::from_str::<String>("invalid json").unwrap_err();
        let err = Error::ConfigParse {
            message: json_err.to_string(),
            source: Some(Box::new(json_err)),
        };
        assert!(err.to_string().starts_with("Invalid configuration format: "));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_config_save_display_names_path() {
        let err = Error::ConfigSave {
            path: PathBuf::from("/cfg/nativedlg"),
            source: Box::new(io::Error::new(io::ErrorKind::PermissionDenied, "denied")),
        };
        assert_eq!(
            err.to_string(),
            "Failed to save configuration to '/cfg/nativedlg': denied"
        );
    }

    #[test]
    fn test_display_backend_unavailable() {
        let err = Error::BackendUnavailable("rfd".to_string());
        assert_eq!(
            err.to_string(),
            "Dialog backend 'rfd' is not available on this build"
        );
    }

    #[test]
    fn test_display_invalid_text() {
        let err = Error::InvalidText("title");
        assert_eq!(err.to_string(), "The dialog title contains a NUL character");
    }

    #[test]
    fn test_display_config_dir_not_found() {
        let err = Error::ConfigDirNotFound;
        assert_eq!(format!("{}", err), "Configuration directory not found");
    }

    #[test]
    fn test_error_source_none_for_simple_variants() {
        assert!(Error::NoBackend.source().is_none());
        assert!(Error::InvalidText("filter").source().is_none());
        assert!(Error::ConfigDirNotFound.source().is_none());
    }

    #[test]
    fn test_unwrap_or_warn_default_ok() {
        let result: Result<i32> = Ok(42);
        assert_eq!(result.unwrap_or_warn_default(0, "test context"), 42);
    }

    #[test]
    fn test_unwrap_or_warn_default_err() {
        let result: Result<i32> = Err(Error::NoBackend);
        assert_eq!(result.unwrap_or_warn_default(7, "test context"), 7);
    }
}
