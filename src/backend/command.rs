//! Helper-program plumbing shared by the zenity, kdialog and osascript backends

use crate::dialog::Selection;
use crate::error::{Error, Result};
use log::{debug, warn};
use std::env;
use std::ffi::OsStr;
use std::path::PathBuf;
use std::process::Command;

/// What a finished helper program left behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, `None` when killed by a signal
    pub code: Option<i32>,
    /// Raw bytes; Unix file names need not be UTF-8
    pub stdout: Vec<u8>,
    pub stderr: String,
}

impl ProcessOutput {
    /// Map the helper's exit status onto a selection.
    ///
    /// Status 0 hands stdout to `parse`; anything else is a cancellation.
    /// Statuses other than the conventional "cancelled" code are logged.
    pub fn into_selection(
        self,
        program: &str,
        cancel_code: i32,
        parse: impl FnOnce(&[u8]) -> Selection,
    ) -> Selection {
        match self.code {
            Some(0) => parse(&self.stdout),
            Some(code) if code == cancel_code => Selection::cancelled(),
            code => {
                warn!(
                    "{} exited with {:?}, treating as cancelled: {}",
                    program,
                    code,
                    self.stderr.trim()
                );
                Selection::cancelled()
            }
        }
    }
}

/// Runs a helper program to completion.
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<ProcessOutput>;
}

/// Runs helpers with [`std::process::Command`], blocking until they exit.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<ProcessOutput> {
        debug!("Running {} {:?}", program, args);

        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|source| Error::Spawn {
                program: program.to_string(),
                source,
            })?;

        Ok(ProcessOutput {
            code: output.status.code(),
            stdout: output.stdout,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Locate `program` in the directories listed in `PATH`.
pub fn find_in_path(program: &str) -> Option<PathBuf> {
    let paths = env::var_os("PATH")?;
    find_in(&paths, program)
}

fn find_in(paths: &OsStr, program: &str) -> Option<PathBuf> {
    env::split_paths(paths)
        .map(|dir| dir.join(program))
        .find(|candidate| candidate.is_file())
}
