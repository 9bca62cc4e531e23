//! KDE dialogs through the `kdialog` helper

use super::command::{CommandRunner, SystemRunner};
use super::{replace_prompt, Backend};
use crate::dialog::{split_lines, DialogMode, DialogRequest, Selection};
use crate::error::Result;
use std::path::Path;

const PROGRAM: &str = "kdialog";
const CANCEL_CODE: i32 = 1;

pub struct Kdialog<R: CommandRunner = SystemRunner> {
    runner: R,
}

impl Kdialog {
    pub fn new() -> Self {
        Self {
            runner: SystemRunner,
        }
    }
}

impl Default for Kdialog {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: CommandRunner> Kdialog<R> {
    pub fn with_runner(runner: R) -> Self {
        Self { runner }
    }
}

impl<R: CommandRunner> Backend for Kdialog<R> {
    fn name(&self) -> &'static str {
        PROGRAM
    }

    fn run(&self, request: &DialogRequest) -> Result<Selection> {
        let output = self.runner.run(PROGRAM, &build_args(request))?;
        let multi = request.mode.is_multi();

        Ok(output.into_selection(PROGRAM, CANCEL_CODE, |stdout| {
            let mut paths = split_lines(stdout);
            if !multi {
                paths.truncate(1);
            }
            Selection::many(paths)
        }))
    }

    fn confirm_replace(&self, path: &Path) -> Result<bool> {
        let args = vec![
            "--warningyesno".to_string(),
            replace_prompt(path),
            "--title".to_string(),
            "Confirm Save".to_string(),
        ];
        let output = self.runner.run(PROGRAM, &args)?;
        Ok(output.code == Some(0))
    }
}

/// Command-line arguments for kdialog.
///
/// The start directory is positional and must be present whenever a
/// filter follows it, so `.` stands in when the request has none.
pub fn build_args(request: &DialogRequest) -> Vec<String> {
    let start = request
        .directory
        .as_ref()
        .map(|d| d.display().to_string())
        .unwrap_or_else(|| ".".to_string());

    let command = match request.mode {
        DialogMode::Open | DialogMode::OpenMultiple => "--getopenfilename",
        DialogMode::Save => "--getsavefilename",
        DialogMode::Directory => "--getexistingdirectory",
    };

    let mut args = vec![command.to_string(), start];

    if !request.mode.is_directory() && !request.filter.is_empty() {
        args.push(format!(
            "{}|{}",
            request.filter,
            request.filter.description()
        ));
    }

    if request.mode.is_multi() {
        args.push("--multiple".to_string());
        args.push("--separate-output".to_string());
    }

    args.push("--title".to_string());
    args.push(request.title.clone());
    args
}
