//! Dialog requests and the public entry points
//!
//! Each entry point builds a [`DialogRequest`], hands it to the configured
//! [`Backend`] and post-processes the result. The call blocks until the
//! user dismisses the modal dialog.

mod filter;
mod selection;

pub use filter::Filter;
pub use selection::{ensure_extension, split_multi, Selection};
pub(crate) use selection::{path_from_bytes, split_lines};

use crate::backend::{self, Backend, BackendKind};
use crate::config::{env_backend_override, load_config, save_config_silent, Settings};
use crate::error::{Error, Result};
use log::{debug, info};
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Request Types
// ─────────────────────────────────────────────────────────────────────────────

/// Which native dialog to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogMode {
    /// Pick one existing file
    Open,
    /// Choose a file name to save to
    Save,
    /// Pick one or more existing files
    OpenMultiple,
    /// Pick a directory
    Directory,
}

impl DialogMode {
    /// Title used when the caller passes a blank one.
    pub fn default_title(&self) -> &'static str {
        match self {
            DialogMode::Open => "Open File",
            DialogMode::Save => "Save File",
            DialogMode::OpenMultiple => "Open Files",
            DialogMode::Directory => "Select Folder",
        }
    }

    pub fn is_save(&self) -> bool {
        matches!(self, DialogMode::Save)
    }

    pub fn is_multi(&self) -> bool {
        matches!(self, DialogMode::OpenMultiple)
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, DialogMode::Directory)
    }
}

/// Everything a backend needs to show one dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogRequest {
    pub mode: DialogMode,
    pub title: String,
    /// Ignored for [`DialogMode::Directory`]
    pub filter: Filter,
    /// Directory the dialog starts in
    pub directory: Option<PathBuf>,
    /// Ask before overwriting an existing file (save only)
    pub confirm_overwrite: bool,
}

impl DialogRequest {
    pub fn new(mode: DialogMode, title: &str) -> Self {
        let title = if title.trim().is_empty() {
            mode.default_title().to_string()
        } else {
            title.to_string()
        };

        Self {
            mode,
            title,
            filter: Filter::all(),
            directory: None,
            confirm_overwrite: true,
        }
    }

    pub fn with_filter(mut self, filter: &str) -> Self {
        self.filter = Filter::parse(filter);
        self
    }

    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = Some(directory.into());
        self
    }

    pub fn with_confirm_overwrite(mut self, confirm: bool) -> Self {
        self.confirm_overwrite = confirm;
        self
    }

    /// Reject text the native string encoding cannot carry.
    pub fn validate(&self) -> Result<()> {
        if self.title.contains('\0') {
            return Err(Error::InvalidText("title"));
        }
        if self.filter.patterns().iter().any(|p| p.contains('\0')) {
            return Err(Error::InvalidText("filter"));
        }
        if let Some(dir) = &self.directory {
            if dir.to_string_lossy().contains('\0') {
                return Err(Error::InvalidText("start directory"));
            }
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Dialog Invoker
// ─────────────────────────────────────────────────────────────────────────────

/// A backend paired with the preferences that shape each request.
pub struct Dialogs {
    backend: Box<dyn Backend>,
    settings: Settings,
}

impl Dialogs {
    /// Resolve the backend named in `settings`.
    pub fn new(settings: Settings) -> Result<Self> {
        Self::with_override(settings, None)
    }

    /// Resolve `backend_override` when given, else the backend in `settings`.
    ///
    /// The override only applies to this invoker; `settings.backend` keeps
    /// the configured value so saving the settings never records it.
    pub fn with_override(
        settings: Settings,
        backend_override: Option<BackendKind>,
    ) -> Result<Self> {
        let backend = backend::resolve(&settings, backend_override)?;
        Ok(Self::with_backend(backend, settings))
    }

    /// Use an explicit backend.
    pub fn with_backend(backend: Box<dyn Backend>, settings: Settings) -> Self {
        Self { backend, settings }
    }

    /// Load preferences from the config file and resolve their backend,
    /// honouring `NATIVEDLG_BACKEND`.
    pub fn from_config() -> Result<Self> {
        Self::with_override(load_config(), env_backend_override())
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Show one dialog and post-process its result.
    ///
    /// A failed or dismissed dialog is a cancelled [`Selection`]; `Err` means
    /// no dialog could be shown.
    pub fn show(&mut self, request: DialogRequest) -> Result<Selection> {
        request.validate()?;
        let request = self.prepare(request);

        debug!(
            "Showing {:?} dialog via {}: title={:?}, filter={:?}, directory={:?}",
            request.mode,
            self.backend.name(),
            request.title,
            request.filter.to_string(),
            request.directory
        );

        let mut selection = self.backend.run(&request)?;

        if request.mode.is_save() {
            selection = self.finish_save(&request, selection)?;
        }

        if selection.is_confirmed() {
            info!(
                "{:?} dialog confirmed with {} path(s)",
                request.mode,
                selection.paths().len()
            );
            self.remember(&request, &selection);
        } else {
            info!("{:?} dialog cancelled", request.mode);
        }

        Ok(selection)
    }

    pub fn file(&mut self, title: &str, filter: &str, directory: bool) -> Result<Selection> {
        let mode = if directory {
            DialogMode::Directory
        } else {
            DialogMode::Open
        };
        self.show(DialogRequest::new(mode, title).with_filter(filter))
    }

    pub fn save_file(&mut self, title: &str, filter: &str) -> Result<Selection> {
        self.show(DialogRequest::new(DialogMode::Save, title).with_filter(filter))
    }

    pub fn file_multi(&mut self, title: &str, filter: &str) -> Result<Selection> {
        self.show(DialogRequest::new(DialogMode::OpenMultiple, title).with_filter(filter))
    }

    /// Fill in the start directory and overwrite prompt from preferences.
    fn prepare(&self, mut request: DialogRequest) -> DialogRequest {
        if request.directory.is_none() {
            request.directory = self.settings.start_directory().cloned();
        }
        if !self.settings.confirm_overwrite {
            request.confirm_overwrite = false;
        }
        request
    }

    /// Append the default extension to a confirmed save name.
    ///
    /// The dialog's own overwrite check only saw the name as typed. When the
    /// appended name hits an existing file the backend asks again, and a
    /// refusal cancels the save.
    fn finish_save(&self, request: &DialogRequest, selection: Selection) -> Result<Selection> {
        let Some(chosen) = selection.into_path() else {
            return Ok(Selection::cancelled());
        };

        let path = ensure_extension(chosen.clone(), &request.filter);
        if path != chosen && request.confirm_overwrite && path.exists() {
            debug!("Appended extension collides with {}", path.display());
            if !self.backend.confirm_replace(&path)? {
                info!("Replacing {} declined", path.display());
                return Ok(Selection::cancelled());
            }
        }
        Ok(Selection::single(path))
    }

    fn remember(&mut self, request: &DialogRequest, selection: &Selection) {
        if !self.settings.remember_last_directory {
            return;
        }

        let dir = selection.first().and_then(|path| {
            if request.mode.is_directory() {
                Some(path.to_path_buf())
            } else {
                path.parent().map(|p| p.to_path_buf())
            }
        });

        if let Some(dir) = dir.filter(|d| !d.as_os_str().is_empty()) {
            self.settings.last_directory = Some(dir);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Free Functions
// ─────────────────────────────────────────────────────────────────────────────

/// Run `request` with the configured backend and persist the last directory.
pub fn show(request: DialogRequest) -> Result<Selection> {
    let mut dialogs = Dialogs::from_config()?;
    let before = dialogs.settings.last_directory.clone();

    let selection = dialogs.show(request)?;

    if dialogs.settings.last_directory != before {
        save_config_silent(&dialogs.settings);
    }
    Ok(selection)
}

/// Show a file dialog, or a directory browser when `directory` is set.
///
/// `filter` is a space-separated list such as `"*.png *.jpg"`; blank shows
/// all file types. The filter is ignored for directories.
pub fn file(title: &str, filter: &str, directory: bool) -> Result<Selection> {
    let mode = if directory {
        DialogMode::Directory
    } else {
        DialogMode::Open
    };
    show(DialogRequest::new(mode, title).with_filter(filter))
}

/// Show a save dialog. The first filter extension is appended when the chosen
/// name carries none of the filter's extensions.
pub fn save_file(title: &str, filter: &str) -> Result<Selection> {
    show(DialogRequest::new(DialogMode::Save, title).with_filter(filter))
}

/// Show an open dialog that allows selecting several files.
pub fn file_multi(title: &str, filter: &str) -> Result<Selection> {
    show(DialogRequest::new(DialogMode::OpenMultiple, title).with_filter(filter))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
