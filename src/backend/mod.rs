//! Dialog backends
//!
//! A backend shows one modal dialog for a [`DialogRequest`] and reports what
//! the user picked. Windows uses the Win32 common dialogs directly, macOS
//! goes through AppleScript and other Unix desktops through zenity or
//! kdialog.

pub mod command;
mod kdialog;
mod osascript;
#[cfg(feature = "rfd")]
mod rfd;
mod wide;
#[cfg(windows)]
mod win32;
mod zenity;

pub use kdialog::Kdialog;
pub use osascript::Osascript;
#[cfg(feature = "rfd")]
pub use self::rfd::Rfd;
#[cfg(windows)]
pub use win32::Win32;
pub use zenity::Zenity;

use crate::config::Settings;
use crate::dialog::{DialogRequest, Selection};
use crate::error::{Error, Result};
use command::find_in_path;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Shows native dialogs.
pub trait Backend {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Show the dialog and block until it is dismissed.
    ///
    /// Returns a cancelled selection when the user backs out or the dialog
    /// itself fails; `Err` only when it could not be displayed.
    fn run(&self, request: &DialogRequest) -> Result<Selection>;

    /// Ask whether an existing `path` may be replaced.
    ///
    /// Used when a save name only collides with an existing file after the
    /// default extension was appended, so the dialog itself never asked.
    /// Backends without a message box refuse.
    fn confirm_replace(&self, path: &Path) -> Result<bool> {
        debug!("No replace prompt available for {}", path.display());
        Ok(false)
    }
}

/// Question shown before replacing an existing file.
pub(crate) fn replace_prompt(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_else(|| path.to_string_lossy());
    format!("\"{}\" already exists. Do you want to replace it?", name)
}

// ─────────────────────────────────────────────────────────────────────────────
// Backend Selection
// ─────────────────────────────────────────────────────────────────────────────

/// Which dialog facility to use.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Pick the native facility for the current platform
    #[default]
    Auto,
    Win32,
    Zenity,
    Kdialog,
    Osascript,
    Rfd,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Auto => "auto",
            BackendKind::Win32 => "win32",
            BackendKind::Zenity => "zenity",
            BackendKind::Kdialog => "kdialog",
            BackendKind::Osascript => "osascript",
            BackendKind::Rfd => "rfd",
        }
    }

    pub fn all() -> &'static [BackendKind] {
        &[
            BackendKind::Auto,
            BackendKind::Win32,
            BackendKind::Zenity,
            BackendKind::Kdialog,
            BackendKind::Osascript,
            BackendKind::Rfd,
        ]
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        BackendKind::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::BackendUnavailable(wanted.to_string()))
    }
}

/// Resolve the backend for this run.
///
/// `backend_override` (the CLI flag or `NATIVEDLG_BACKEND`) wins over
/// `settings.backend` without being stored in `settings`.
pub fn resolve(
    settings: &Settings,
    backend_override: Option<BackendKind>,
) -> Result<Box<dyn Backend>> {
    let kind = match backend_override.unwrap_or(settings.backend) {
        BackendKind::Auto => detect(cfg!(windows), cfg!(target_os = "macos"), |program| {
            find_in_path(program).is_some()
        })?,
        kind => kind,
    };
    debug!("Using {} dialog backend", kind);
    build(kind, settings)
}

/// Pick the native facility for a platform. Unix desktops prefer zenity,
/// then kdialog, then rfd when it is compiled in.
fn detect(windows: bool, macos: bool, installed: impl Fn(&str) -> bool) -> Result<BackendKind> {
    if windows {
        Ok(BackendKind::Win32)
    } else if macos {
        Ok(BackendKind::Osascript)
    } else if installed("zenity") {
        Ok(BackendKind::Zenity)
    } else if installed("kdialog") {
        Ok(BackendKind::Kdialog)
    } else if cfg!(feature = "rfd") {
        Ok(BackendKind::Rfd)
    } else {
        Err(Error::NoBackend)
    }
}

#[cfg_attr(not(windows), allow(unused_variables))]
fn build(kind: BackendKind, settings: &Settings) -> Result<Box<dyn Backend>> {
    match kind {
        BackendKind::Zenity => Ok(Box::new(Zenity::new())),
        BackendKind::Kdialog => Ok(Box::new(Kdialog::new())),
        BackendKind::Osascript => Ok(Box::new(Osascript::new())),
        #[cfg(windows)]
        BackendKind::Win32 => Ok(Box::new(Win32::new(settings.multi_select_buffer))),
        #[cfg(feature = "rfd")]
        BackendKind::Rfd => Ok(Box::new(Rfd)),
        other => Err(Error::BackendUnavailable(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_backend_kind() {
        assert_eq!("zenity".parse::<BackendKind>().unwrap(), BackendKind::Zenity);
        assert_eq!(" Win32 ".parse::<BackendKind>().unwrap(), BackendKind::Win32);
        assert!("gtk".parse::<BackendKind>().is_err());
    }

    #[test]
    fn test_display_matches_serde_name() {
        for kind in BackendKind::all() {
            let json = serde_json::to_string(kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind));
        }
    }

    #[test]
    fn test_detect_per_platform() {
        let nothing = |_: &str| false;
        assert_eq!(detect(true, false, nothing).unwrap(), BackendKind::Win32);
        assert_eq!(detect(false, true, nothing).unwrap(), BackendKind::Osascript);
    }

    #[test]
    fn test_detect_prefers_zenity_over_kdialog() {
        let both = |_: &str| true;
        let kde_only = |p: &str| p == "kdialog";
        assert_eq!(detect(false, false, both).unwrap(), BackendKind::Zenity);
        assert_eq!(detect(false, false, kde_only).unwrap(), BackendKind::Kdialog);
    }

    #[cfg(not(feature = "rfd"))]
    #[test]
    fn test_detect_without_any_facility() {
        assert!(matches!(
            detect(false, false, |_| false),
            Err(Error::NoBackend)
        ));
    }

    #[test]
    fn test_helper_backends_always_build() {
        let settings = Settings::default();
        for kind in [BackendKind::Zenity, BackendKind::Kdialog, BackendKind::Osascript] {
            let backend = build(kind, &settings).unwrap();
            assert_eq!(backend.name(), kind.as_str());
        }
    }

    #[cfg(not(windows))]
    #[test]
    fn test_win32_unavailable_elsewhere() {
        let settings = Settings {
            backend: BackendKind::Win32,
            ..Settings::default()
        };
        assert!(matches!(
            resolve(&settings, None),
            Err(Error::BackendUnavailable(name)) if name == "win32"
        ));
    }

    #[test]
    fn test_override_wins_over_settings() {
        let settings = Settings {
            backend: BackendKind::Win32,
            ..Settings::default()
        };
        let backend = resolve(&settings, Some(BackendKind::Kdialog)).unwrap();
        assert_eq!(backend.name(), "kdialog");
        assert_eq!(settings.backend, BackendKind::Win32);
    }

    #[test]
    fn test_replace_prompt_names_file() {
        assert_eq!(
            replace_prompt(Path::new("/d/report.png")),
            "\"report.png\" already exists. Do you want to replace it?"
        );
    }
}
