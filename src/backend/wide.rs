//! UTF-16 marshaling for the Win32 dialog structures
//!
//! Kept free of Windows-only APIs so the buffer handling is exercised on
//! every platform.

#![cfg_attr(not(windows), allow(dead_code))]

use crate::error::{Error, Result};

/// `MAX_PATH`, the buffer the original Win32 dialogs were sized for.
pub const MAX_PATH: usize = 260;

/// NUL-terminated UTF-16 copy of `text`, rejecting interior NULs.
pub fn encode(text: &str, what: &'static str) -> Result<Vec<u16>> {
    if text.contains('\0') {
        return Err(Error::InvalidText(what));
    }
    Ok(text.encode_utf16().chain(std::iter::once(0)).collect())
}

/// UTF-16 copy of a string that carries its own NUL separators and terminator.
pub fn encode_raw(text: &str) -> Vec<u16> {
    text.encode_utf16().collect()
}

/// Decode up to the first NUL.
pub fn decode_until_nul(buf: &[u16]) -> String {
    let end = buf.iter().position(|&c| c == 0).unwrap_or(buf.len());
    String::from_utf16_lossy(&buf[..end])
}

/// Decode an explorer multi-select buffer up to its double NUL, keeping
/// the single NULs that separate the directory from the file names.
pub fn decode_multi(buf: &[u16]) -> String {
    let end = buf
        .windows(2)
        .position(|pair| pair == [0, 0])
        .unwrap_or_else(|| buf.iter().rposition(|&c| c != 0).map_or(0, |i| i + 1));
    String::from_utf16_lossy(&buf[..end])
}

/// A zeroed result buffer of `len` UTF-16 units, at least `MAX_PATH`.
pub fn buffer(len: usize) -> Vec<u16> {
    vec![0u16; len.max(MAX_PATH)]
}
