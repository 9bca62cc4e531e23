//! GTK dialogs through the `zenity` helper

use super::command::{CommandRunner, SystemRunner};
use super::{replace_prompt, Backend};
use crate::dialog::{path_from_bytes, split_lines, DialogMode, DialogRequest, Selection};
use crate::error::Result;
use std::path::{Path, PathBuf};

const PROGRAM: &str = "zenity";

/// zenity exits with 1 when the user presses Cancel or closes the window.
const CANCEL_CODE: i32 = 1;

/// Separator between paths in multi-select output.
const SEPARATOR: &str = "\n";

pub struct Zenity<R: CommandRunner = SystemRunner> {
    runner: R,
}

impl Zenity {
    pub fn new() -> Self {
        Self {
            runner: SystemRunner,
        }
    }
}

impl Default for Zenity {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: CommandRunner> Zenity<R> {
    pub fn with_runner(runner: R) -> Self {
        Self { runner }
    }
}

impl<R: CommandRunner> Backend for Zenity<R> {
    fn name(&self) -> &'static str {
        PROGRAM
    }

    fn run(&self, request: &DialogRequest) -> Result<Selection> {
        let output = self.runner.run(PROGRAM, &build_args(request))?;
        let multi = request.mode.is_multi();

        Ok(output.into_selection(PROGRAM, CANCEL_CODE, |stdout| {
            if multi {
                Selection::many(split_lines(stdout))
            } else {
                let path = trim_newlines(stdout);
                if path.is_empty() {
                    Selection::cancelled()
                } else {
                    Selection::single(path_from_bytes(path))
                }
            }
        }))
    }

    fn confirm_replace(&self, path: &Path) -> Result<bool> {
        let args = vec![
            "--question".to_string(),
            "--title=Confirm Save".to_string(),
            format!("--text={}", escape_markup(&replace_prompt(path))),
        ];
        let output = self.runner.run(PROGRAM, &args)?;
        Ok(output.code == Some(0))
    }
}

/// Drop the line terminator zenity prints after a single path.
fn trim_newlines(mut stdout: &[u8]) -> &[u8] {
    while let [rest @ .., b'\n' | b'\r'] = stdout {
        stdout = rest;
    }
    stdout
}

/// zenity renders `--text` as Pango markup.
fn escape_markup(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Command-line arguments for `zenity --file-selection`.
pub fn build_args(request: &DialogRequest) -> Vec<String> {
    let mut args = vec![
        "--file-selection".to_string(),
        format!("--title={}", request.title),
    ];

    match request.mode {
        DialogMode::Open => {}
        DialogMode::Save => {
            args.push("--save".to_string());
            if request.confirm_overwrite {
                args.push("--confirm-overwrite".to_string());
            }
        }
        DialogMode::OpenMultiple => {
            args.push("--multiple".to_string());
            args.push(format!("--separator={}", SEPARATOR));
        }
        DialogMode::Directory => args.push("--directory".to_string()),
    }

    if let Some(dir) = &request.directory {
        // A trailing separator makes zenity open inside the directory
        let mut start: PathBuf = dir.clone();
        start.push("");
        args.push(format!("--filename={}", start.display()));
    }

    if !request.mode.is_directory() && !request.filter.is_empty() {
        args.push(format!(
            "--file-filter={} | {}",
            request.filter.description(),
            request.filter
        ));
        args.push("--file-filter=All files | *".to_string());
    }

    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::command::fake::FakeRunner;
    use std::path::Path;

    #[test]
    fn test_open_args() {
        let request = DialogRequest::new(DialogMode::Open, "Pick an image").with_filter("*.png *.jpg");
        assert_eq!(
            build_args(&request),
            vec![
                "--file-selection",
                "--title=Pick an image",
                "--file-filter=Files (*.png *.jpg) | *.png *.jpg",
                "--file-filter=All files | *",
            ]
        );
    }

    #[test]
    fn test_save_args_with_overwrite_prompt() {
        let args = build_args(&DialogRequest::new(DialogMode::Save, "Save"));
        assert!(args.contains(&"--save".to_string()));
        assert!(args.contains(&"--confirm-overwrite".to_string()));

        let quiet = DialogRequest::new(DialogMode::Save, "Save").with_confirm_overwrite(false);
        assert!(!build_args(&quiet).contains(&"--confirm-overwrite".to_string()));
    }

    #[test]
    fn test_directory_args_ignore_filter() {
        let request = DialogRequest::new(DialogMode::Directory, "Dir").with_filter("*.png");
        let args = build_args(&request);
        assert!(args.contains(&"--directory".to_string()));
        assert!(!args.iter().any(|a| a.starts_with("--file-filter")));
    }

    #[test]
    fn test_start_directory_has_trailing_separator() {
        let request = DialogRequest::new(DialogMode::Open, "Open").with_directory("/srv/data");
        let args = build_args(&request);
        let expected = format!("--filename={}", Path::new("/srv/data").join("").display());
        assert!(args.contains(&expected));
    }

    #[test]
    fn test_multi_select_output_is_split() {
        let runner = FakeRunner::exiting(0, "/a/one.png\n/a/two.png\n");
        let backend = Zenity::with_runner(runner);
        let request = DialogRequest::new(DialogMode::OpenMultiple, "Open");

        let selection = backend.run(&request).unwrap();
        assert_eq!(
            selection.paths(),
            &[PathBuf::from("/a/one.png"), PathBuf::from("/a/two.png")]
        );
        assert!(backend.runner.last_args().contains(&"--multiple".to_string()));
    }

    #[test]
    fn test_single_output_keeps_spaces() {
        let backend = Zenity::with_runner(FakeRunner::exiting(0, "/a/my file.txt\n"));
        let selection = backend
            .run(&DialogRequest::new(DialogMode::Open, "Open"))
            .unwrap();
        assert_eq!(selection.first(), Some(Path::new("/a/my file.txt")));
    }

    #[test]
    fn test_confirm_replace_asks_question() {
        let backend = Zenity::with_runner(FakeRunner::exiting(0, ""));
        assert!(backend.confirm_replace(Path::new("/d/a&b.png")).unwrap());

        let args = backend.runner.last_args();
        assert_eq!(args[0], "--question");
        assert_eq!(
            args[2],
            "--text=\"a&amp;b.png\" already exists. Do you want to replace it?"
        );

        let declined = Zenity::with_runner(FakeRunner::exiting(1, ""));
        assert!(!declined.confirm_replace(Path::new("/d/a.png")).unwrap());
    }

    #[test]
    fn test_cancel_exit_code() {
        let backend = Zenity::with_runner(FakeRunner::exiting(1, ""));
        let selection = backend
            .run(&DialogRequest::new(DialogMode::Save, "Save"))
            .unwrap();
        assert!(!selection.is_confirmed());
    }
}
