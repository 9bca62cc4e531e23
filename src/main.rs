//! nativedlg - command-line front end
//!
//! Shows one native dialog and prints each selected path on its own line.
//! Exit status: 0 confirmed, 1 cancelled, 2 error.

use clap::{Args, Parser, Subcommand};
use log::{error, info};
use nativedlg::config::{env_backend_override, load_config, save_config_silent};
use nativedlg::{BackendKind, DialogMode, DialogRequest, Dialogs};
use std::path::PathBuf;
use std::process::ExitCode;

/// Application name constant.
const APP_NAME: &str = "nativedlg";

#[derive(Parser, Debug)]
#[command(name = "nativedlg")]
#[command(about = "Show a native file dialog and print the selection", version)]
struct Cli {
    /// Dialog backend (overrides the config file and NATIVEDLG_BACKEND)
    #[arg(long, global = true, value_enum)]
    backend: Option<BackendKind>,

    /// Log what is being shown
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pick one existing file
    Open(DialogArgs),
    /// Choose a file name to save to
    Save(DialogArgs),
    /// Pick one or more existing files
    Multi(DialogArgs),
    /// Pick a directory
    Dir(DialogArgs),
}

#[derive(Args, Debug)]
struct DialogArgs {
    /// Dialog title
    #[arg(long, default_value = "")]
    title: String,

    /// Space-separated patterns, e.g. "*.png *.jpg"
    #[arg(long, default_value = "")]
    filter: String,

    /// Directory the dialog opens in
    #[arg(long)]
    directory: Option<PathBuf>,
}

impl Command {
    fn into_request(self) -> DialogRequest {
        let (mode, args) = match self {
            Command::Open(args) => (DialogMode::Open, args),
            Command::Save(args) => (DialogMode::Save, args),
            Command::Multi(args) => (DialogMode::OpenMultiple, args),
            Command::Dir(args) => (DialogMode::Directory, args),
        };

        let request = DialogRequest::new(mode, &args.title).with_filter(&args.filter);
        match args.directory {
            Some(dir) => request.with_directory(dir),
            None => request,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    info!("Starting {}", APP_NAME);

    // One-off choices never reach the saved settings
    let settings = load_config();
    let backend_override = cli.backend.or_else(env_backend_override);
    let last_directory = settings.last_directory.clone();

    let mut dialogs = match Dialogs::with_override(settings, backend_override) {
        Ok(dialogs) => dialogs,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}: {}", APP_NAME, e);
            return ExitCode::from(2);
        }
    };

    let selection = match dialogs.show(cli.command.into_request()) {
        Ok(selection) => selection,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}: {}", APP_NAME, e);
            return ExitCode::from(2);
        }
    };

    if dialogs.settings().last_directory != last_directory {
        save_config_silent(dialogs.settings());
    }

    if !selection.is_confirmed() {
        return ExitCode::from(1);
    }

    for path in selection.paths() {
        println!("{}", path.display());
    }
    ExitCode::SUCCESS
}
