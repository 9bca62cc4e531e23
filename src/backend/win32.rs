//! Win32 common dialogs: `GetOpenFileNameW`, `GetSaveFileNameW` and
//! `SHBrowseForFolderW`
//!
//! Any `FALSE` from the dialog routines (user cancel or failure) comes back
//! as a cancelled selection.

use super::wide::{self, MAX_PATH};
use super::{replace_prompt, Backend};
use crate::dialog::{split_multi, DialogMode, DialogRequest, Selection};
use crate::error::{Error, Result};
use log::debug;
use std::os::windows::ffi::OsStrExt;
use std::path::Path;
use windows::core::{PCWSTR, PWSTR};
use windows::Win32::Foundation::HWND;
use windows::Win32::System::Com::{
    CoInitializeEx, CoTaskMemFree, CoUninitialize, COINIT_APARTMENTTHREADED,
};
use windows::Win32::UI::Controls::Dialogs::{
    CommDlgExtendedError, GetOpenFileNameW, GetSaveFileNameW, OFN_ALLOWMULTISELECT, OFN_EXPLORER,
    OFN_FILEMUSTEXIST, OFN_HIDEREADONLY, OFN_NOCHANGEDIR, OFN_OVERWRITEPROMPT,
    OPENFILENAMEW, OPEN_FILENAME_FLAGS,
};
use windows::Win32::UI::Shell::{
    SHBrowseForFolderW, SHGetPathFromIDListW, BIF_EDITBOX, BIF_NEWDIALOGSTYLE,
    BIF_RETURNONLYFSDIRS, BROWSEINFOW,
};
use windows::Win32::UI::WindowsAndMessaging::{
    MessageBoxW, IDYES, MB_DEFBUTTON2, MB_ICONWARNING, MB_YESNO,
};

pub struct Win32 {
    /// Result buffer length in UTF-16 units for multi-select dialogs
    multi_buffer: usize,
}

impl Win32 {
    pub fn new(multi_buffer: usize) -> Self {
        Self { multi_buffer }
    }
}

impl Backend for Win32 {
    fn name(&self) -> &'static str {
        "win32"
    }

    fn run(&self, request: &DialogRequest) -> Result<Selection> {
        if request.mode.is_directory() {
            directory_dialog(request)
        } else {
            file_dialog(request, self.multi_buffer)
        }
    }

    fn confirm_replace(&self, path: &Path) -> Result<bool> {
        let text = wide::encode(&replace_prompt(path), "replace prompt")?;
        let caption = wide::encode("Confirm Save", "replace prompt")?;
        let answer = unsafe {
            MessageBoxW(
                HWND::default(),
                PCWSTR(text.as_ptr()),
                PCWSTR(caption.as_ptr()),
                MB_YESNO | MB_ICONWARNING | MB_DEFBUTTON2,
            )
        };
        Ok(answer == IDYES)
    }
}

/// Balances a successful `CoInitializeEx` with `CoUninitialize`.
struct ComGuard {
    initialized: bool,
}

impl ComGuard {
    fn init() -> Self {
        let hr = unsafe { CoInitializeEx(None, COINIT_APARTMENTTHREADED) };
        Self {
            initialized: hr.is_ok(),
        }
    }
}

impl Drop for ComGuard {
    fn drop(&mut self) {
        if self.initialized {
            unsafe { CoUninitialize() };
        }
    }
}

/// `OPENFILENAMEW::Flags` for a file dialog mode.
fn file_flags(mode: DialogMode, confirm_overwrite: bool) -> OPEN_FILENAME_FLAGS {
    let mut flags = OFN_EXPLORER | OFN_HIDEREADONLY | OFN_NOCHANGEDIR;
    if mode.is_save() {
        if confirm_overwrite {
            flags |= OFN_OVERWRITEPROMPT;
        }
    } else {
        flags |= OFN_FILEMUSTEXIST;
    }
    if mode.is_multi() {
        flags |= OFN_ALLOWMULTISELECT;
    }
    flags
}

/// NUL-terminated UTF-16 path, kept lossless for names that are not valid Unicode.
fn encode_path(path: &Path) -> Result<Vec<u16>> {
    let wide: Vec<u16> = path.as_os_str().encode_wide().collect();
    if wide.contains(&0) {
        return Err(Error::InvalidText("start directory"));
    }
    Ok(wide.into_iter().chain(std::iter::once(0)).collect())
}

fn file_dialog(request: &DialogRequest, multi_buffer: usize) -> Result<Selection> {
    let multi = request.mode.is_multi();
    let save = request.mode.is_save();

    let title = wide::encode(&request.title, "title")?;
    let filter = wide::encode_raw(&request.filter.to_win32());
    let initial_dir = match &request.directory {
        Some(dir) => Some(encode_path(dir)?),
        None => None,
    };
    // The dialog appends this before its own overwrite check
    let default_ext = match request.filter.default_extension() {
        Some(ext) if save => Some(wide::encode(ext, "filter")?),
        _ => None,
    };
    let mut buf = wide::buffer(if multi { multi_buffer } else { MAX_PATH });
    let flags = file_flags(request.mode, request.confirm_overwrite);

    let mut ofn = OPENFILENAMEW {
        lStructSize: std::mem::size_of::<OPENFILENAMEW>() as u32,
        lpstrFilter: PCWSTR(filter.as_ptr()),
        nFilterIndex: 1,
        lpstrFile: PWSTR(buf.as_mut_ptr()),
        nMaxFile: buf.len() as u32,
        lpstrInitialDir: initial_dir
            .as_ref()
            .map_or(PCWSTR::null(), |dir| PCWSTR(dir.as_ptr())),
        lpstrTitle: PCWSTR(title.as_ptr()),
        lpstrDefExt: default_ext
            .as_ref()
            .map_or(PCWSTR::null(), |ext| PCWSTR(ext.as_ptr())),
        Flags: flags,
        ..Default::default()
    };

    let confirmed = unsafe {
        if save {
            GetSaveFileNameW(&mut ofn)
        } else {
            GetOpenFileNameW(&mut ofn)
        }
    }
    .as_bool();

    if !confirmed {
        // Zero means the user cancelled; anything else is a dialog failure
        let code = unsafe { CommDlgExtendedError() };
        if code.0 != 0 {
            debug!("Common dialog failed with extended error {:#x}", code.0);
        }
        return Ok(Selection::cancelled());
    }

    if multi {
        Ok(Selection::many(split_multi(&wide::decode_multi(&buf))))
    } else {
        Ok(Selection::single(wide::decode_until_nul(&buf)))
    }
}

fn directory_dialog(request: &DialogRequest) -> Result<Selection> {
    let _com = ComGuard::init();

    let title = wide::encode(&request.title, "title")?;
    let mut display_name = [0u16; MAX_PATH];

    let info = BROWSEINFOW {
        pszDisplayName: PWSTR(display_name.as_mut_ptr()),
        lpszTitle: PCWSTR(title.as_ptr()),
        ulFlags: BIF_EDITBOX | BIF_NEWDIALOGSTYLE | BIF_RETURNONLYFSDIRS,
        ..Default::default()
    };

    let item = unsafe { SHBrowseForFolderW(&info) };
    if item.is_null() {
        return Ok(Selection::cancelled());
    }

    let mut path = [0u16; MAX_PATH];
    let resolved = unsafe { SHGetPathFromIDListW(item, &mut path) }.as_bool();
    unsafe { CoTaskMemFree(Some(item as *const _)) };

    if resolved {
        Ok(Selection::single(wide::decode_until_nul(&path)))
    } else {
        debug!("Selected folder has no file system path");
        Ok(Selection::cancelled())
    }
}
