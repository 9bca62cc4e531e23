//! Portable dialogs through the rfd crate
//!
//! Only compiled with the `rfd` cargo feature. rfd picks its own native
//! implementation per platform, so this backend is the fallback when no
//! helper program is installed.

use super::{replace_prompt, Backend};
use crate::dialog::{DialogMode, DialogRequest, Selection};
use crate::error::Result;
use ::rfd::{FileDialog, MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};
use std::path::Path;

pub struct Rfd;

impl Backend for Rfd {
    fn name(&self) -> &'static str {
        "rfd"
    }

    fn run(&self, request: &DialogRequest) -> Result<Selection> {
        let mut dialog = FileDialog::new().set_title(request.title.as_str());

        if !request.mode.is_directory() && !request.filter.is_empty() {
            let extensions = request.filter.extensions();
            if !extensions.is_empty() {
                dialog = dialog.add_filter(request.filter.description(), &extensions);
            }
            dialog = dialog.add_filter("All Files", &["*"]);
        }

        if let Some(dir) = &request.directory {
            dialog = dialog.set_directory(dir);
        }

        let selection = match request.mode {
            DialogMode::Open => Selection::from_option(dialog.pick_file()),
            DialogMode::OpenMultiple => Selection::many(dialog.pick_files().unwrap_or_default()),
            DialogMode::Save => Selection::from_option(dialog.save_file()),
            DialogMode::Directory => Selection::from_option(dialog.pick_folder()),
        };

        Ok(selection)
    }

    fn confirm_replace(&self, path: &Path) -> Result<bool> {
        let answer = MessageDialog::new()
            .set_level(MessageLevel::Warning)
            .set_title("Confirm Save")
            .set_description(replace_prompt(path))
            .set_buttons(MessageButtons::YesNo)
            .show();
        Ok(matches!(answer, MessageDialogResult::Yes))
    }
}
