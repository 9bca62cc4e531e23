//! User preferences for nativedlg
//!
//! This module defines the `Settings` struct that holds the options shaping
//! each dialog request, with serde support for JSON persistence.

use crate::backend::BackendKind;
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable that overrides the configured backend.
pub const BACKEND_ENV: &str = "NATIVEDLG_BACKEND";

// ─────────────────────────────────────────────────────────────────────────────
// Main Settings Struct
// ─────────────────────────────────────────────────────────────────────────────

/// Dialog preferences.
///
/// Serialized to JSON in the user's config directory. Every field has a
/// default via `#[serde(default)]`, so partial files load cleanly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Backend
    // ─────────────────────────────────────────────────────────────────────────
    /// Dialog facility to use
    pub backend: BackendKind,

    /// Result buffer size for Win32 multi-select dialogs, in UTF-16 units
    pub multi_select_buffer: usize,

    // ─────────────────────────────────────────────────────────────────────────
    // Start Directory
    // ─────────────────────────────────────────────────────────────────────────
    /// Directory dialogs open in when nothing better is known
    pub default_directory: Option<PathBuf>,

    /// Whether to start the next dialog where the last confirmed one ended
    pub remember_last_directory: bool,

    /// Directory of the last confirmed selection
    pub last_directory: Option<PathBuf>,

    // ─────────────────────────────────────────────────────────────────────────
    // Save Behavior
    // ─────────────────────────────────────────────────────────────────────────
    /// Ask before overwriting an existing file
    pub confirm_overwrite: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            multi_select_buffer: Self::DEFAULT_MULTI_SELECT_BUFFER,
            default_directory: None,
            remember_last_directory: true,
            last_directory: None,
            confirm_overwrite: true,
        }
    }
}

impl Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Validation Constants and Sanitization
    // ─────────────────────────────────────────────────────────────────────────

    /// Default multi-select buffer, the largest explorer dialogs fill reliably.
    pub const DEFAULT_MULTI_SELECT_BUFFER: usize = 32_768;
    /// Minimum allowed multi-select buffer.
    pub const MIN_MULTI_SELECT_BUFFER: usize = 4_096;
    /// Maximum allowed multi-select buffer.
    pub const MAX_MULTI_SELECT_BUFFER: usize = 1_048_576;

    /// Clamp out-of-range values and drop stale directories.
    pub fn sanitize(&mut self) {
        self.multi_select_buffer = self
            .multi_select_buffer
            .clamp(Self::MIN_MULTI_SELECT_BUFFER, Self::MAX_MULTI_SELECT_BUFFER);

        if self
            .last_directory
            .as_ref()
            .is_some_and(|dir| dir.as_os_str().is_empty())
        {
            self.last_directory = None;
        }
        if self
            .default_directory
            .as_ref()
            .is_some_and(|dir| dir.as_os_str().is_empty())
        {
            self.default_directory = None;
        }
    }

    /// Parse JSON and sanitize the result.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }

    /// Where the next dialog should open.
    pub fn start_directory(&self) -> Option<&PathBuf> {
        if self.remember_last_directory {
            self.last_directory
                .as_ref()
                .or(self.default_directory.as_ref())
        } else {
            self.default_directory.as_ref()
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Backend Override
// ─────────────────────────────────────────────────────────────────────────────

/// Parse a one-off backend choice, ignoring blank and unknown names.
///
/// Overrides pick the backend for a single run and never end up in
/// [`Settings`], so they are not written back to the config file.
pub fn parse_backend_override(value: Option<&str>) -> Option<BackendKind> {
    let value = value.map(str::trim).filter(|v| !v.is_empty())?;

    match value.parse::<BackendKind>() {
        Ok(kind) => Some(kind),
        Err(_) => {
            warn!("Ignoring unknown {} value {:?}", BACKEND_ENV, value);
            None
        }
    }
}

/// Read `NATIVEDLG_BACKEND` from the process environment.
pub fn env_backend_override() -> Option<BackendKind> {
    let value = std::env::var(BACKEND_ENV).ok();
    parse_backend_override(value.as_deref())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
