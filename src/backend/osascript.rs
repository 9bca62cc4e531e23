//! macOS dialogs through AppleScript's `choose file` family
//!
//! The generated script prints one POSIX path per line so the result is
//! parsed the same way as the other helper backends.

use super::command::{CommandRunner, SystemRunner};
use super::{replace_prompt, Backend};
use crate::dialog::{split_lines, DialogMode, DialogRequest, Selection};
use crate::error::Result;
use std::path::{Path, PathBuf};

const PROGRAM: &str = "osascript";

/// osascript exits with 1 on any script error, including "User canceled" (-128).
const CANCEL_CODE: i32 = 1;

pub struct Osascript<R: CommandRunner = SystemRunner> {
    runner: R,
}

impl Osascript {
    pub fn new() -> Self {
        Self {
            runner: SystemRunner,
        }
    }
}

impl Default for Osascript {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: CommandRunner> Osascript<R> {
    pub fn with_runner(runner: R) -> Self {
        Self { runner }
    }
}

impl<R: CommandRunner> Backend for Osascript<R> {
    fn name(&self) -> &'static str {
        PROGRAM
    }

    fn run(&self, request: &DialogRequest) -> Result<Selection> {
        let args = vec!["-e".to_string(), build_script(request)];
        let output = self.runner.run(PROGRAM, &args)?;

        Ok(output.into_selection(PROGRAM, CANCEL_CODE, |stdout| {
            Selection::many(
                split_lines(stdout)
                    .into_iter()
                    .map(strip_trailing_slash)
                    .collect(),
            )
        }))
    }

    fn confirm_replace(&self, path: &Path) -> Result<bool> {
        let args = vec!["-e".to_string(), build_replace_script(path)];
        let output = self.runner.run(PROGRAM, &args)?;
        Ok(output.code == Some(0))
    }
}

/// A caution dialog whose Cancel button makes osascript exit with 1.
fn build_replace_script(path: &Path) -> String {
    format!(
        "display dialog {} buttons {{\"Cancel\", \"Replace\"}} \
         default button \"Cancel\" cancel button \"Cancel\" with icon caution",
        quote(&replace_prompt(path))
    )
}

/// Build the AppleScript for `request`.
pub fn build_script(request: &DialogRequest) -> String {
    let mut clause = match request.mode {
        DialogMode::Open | DialogMode::OpenMultiple => "choose file".to_string(),
        DialogMode::Save => "choose file name".to_string(),
        DialogMode::Directory => "choose folder".to_string(),
    };

    clause.push_str(&format!(" with prompt {}", quote(&request.title)));

    if matches!(request.mode, DialogMode::Open | DialogMode::OpenMultiple) {
        let extensions = request.filter.extensions();
        if !extensions.is_empty() && !request.filter.has_wildcard() {
            let types: Vec<String> = extensions.iter().map(|ext| quote(ext)).collect();
            clause.push_str(&format!(" of type {{{}}}", types.join(", ")));
        }
    }

    if let Some(dir) = &request.directory {
        clause.push_str(&format!(
            " default location POSIX file {}",
            quote(&dir.display().to_string())
        ));
    }

    if request.mode.is_multi() {
        clause.push_str(" with multiple selections allowed");
        format!(
            "set picked to {}\n\
             set out to \"\"\n\
             repeat with f in picked\n\
             set out to out & POSIX path of f & linefeed\n\
             end repeat\n\
             return out",
            clause
        )
    } else {
        format!("POSIX path of ({})", clause)
    }
}

/// AppleScript string literal.
fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
}

/// `choose folder` reports directories with a trailing `/`.
fn strip_trailing_slash(path: PathBuf) -> PathBuf {
    let trimmed = match path.to_str() {
        Some(text) if text.len() > 1 && text.ends_with('/') => text.trim_end_matches('/'),
        _ => return path,
    };

    if trimmed.is_empty() {
        PathBuf::from("/")
    } else {
        PathBuf::from(trimmed)
    }
}
