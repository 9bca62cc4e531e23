//! nativedlg - native file dialogs as plain paths
//!
//! Shows the host's open, save, multi-select and folder dialogs and hands
//! back what the user picked. Each call blocks until the dialog is
//! dismissed.
//!
//! ```no_run
//! let selection = nativedlg::file("Open image", "*.png *.jpg", false)?;
//! if let Some(path) = selection.first() {
//!     println!("{}", path.display());
//! }
//! # Ok::<(), nativedlg::Error>(())
//! ```

pub mod backend;
pub mod config;
pub mod dialog;
pub mod error;

pub use backend::{Backend, BackendKind};
pub use config::Settings;
pub use dialog::{
    ensure_extension, file, file_multi, save_file, show, split_multi, DialogMode, DialogRequest,
    Dialogs, Filter, Selection,
};
pub use error::{Error, Result};
