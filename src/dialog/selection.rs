//! Dialog results and their post-processing
//!
//! Backends hand back raw text or bytes; this module turns them into paths,
//! splits NUL-delimited multi-select results and applies the save-time
//! default extension.

use super::filter::Filter;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// Selection
// ─────────────────────────────────────────────────────────────────────────────

/// The outcome of one modal dialog.
///
/// A cancelled selection holds no paths; a confirmed one holds at least one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    paths: Vec<PathBuf>,
}

impl Selection {
    /// The user dismissed the dialog (or the OS call failed).
    pub fn cancelled() -> Self {
        Self::default()
    }

    /// A single confirmed path.
    pub fn single(path: impl Into<PathBuf>) -> Self {
        Self {
            paths: vec![path.into()],
        }
    }

    /// Several confirmed paths. An empty list is a cancellation.
    pub fn many(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    /// `Some` path becomes a confirmed selection, `None` a cancelled one.
    pub fn from_option(path: Option<PathBuf>) -> Self {
        path.map(Self::single).unwrap_or_default()
    }

    /// Whether the user confirmed the dialog.
    pub fn is_confirmed(&self) -> bool {
        !self.paths.is_empty()
    }

    /// The first selected path.
    pub fn first(&self) -> Option<&Path> {
        self.paths.first().map(PathBuf::as_path)
    }

    /// All selected paths in the order the dialog returned them.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn into_paths(self) -> Vec<PathBuf> {
        self.paths
    }

    pub fn into_path(self) -> Option<PathBuf> {
        self.paths.into_iter().next()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Post-processing
// ─────────────────────────────────────────────────────────────────────────────

/// Split a NUL-delimited multi-select result into full paths.
///
/// Explorer-style dialogs return `dir\0name1\0name2\0…` when several files
/// are chosen and just the full path when only one is. Empty segments
/// (including the terminating ones) are ignored.
pub fn split_multi(raw: &str) -> Vec<PathBuf> {
    let mut parts = raw.split('\0').filter(|part| !part.is_empty());

    let Some(first) = parts.next() else {
        return Vec::new();
    };

    let names: Vec<&str> = parts.collect();
    if names.is_empty() {
        return vec![PathBuf::from(first)];
    }

    let dir = Path::new(first);
    names.into_iter().map(|name| dir.join(name)).collect()
}

/// Append the filter's default extension when `path` carries none of its extensions.
pub fn ensure_extension(path: PathBuf, filter: &Filter) -> PathBuf {
    if filter.matches_extension(&path) {
        return path;
    }

    match filter.default_extension() {
        Some(ext) => {
            let mut name: OsString = path.into_os_string();
            name.push(".");
            name.push(ext);
            PathBuf::from(name)
        }
        None => path,
    }
}

/// Split newline-separated helper output into paths, skipping blank lines.
///
/// Works on raw bytes so file names that are not UTF-8 survive intact.
pub(crate) fn split_lines(stdout: &[u8]) -> Vec<PathBuf> {
    stdout
        .split(|&b| b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
        .filter(|line| !line.is_empty())
        .map(path_from_bytes)
        .collect()
}

/// Build a path from helper output bytes.
#[cfg(unix)]
pub(crate) fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    use std::os::unix::ffi::OsStringExt;
    PathBuf::from(OsString::from_vec(bytes.to_vec()))
}

/// Build a path from helper output bytes.
#[cfg(not(unix))]
pub(crate) fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(bytes).into_owned())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancelled_selection_is_empty() {
        let selection = Selection::cancelled();
        assert!(!selection.is_confirmed());
        assert!(selection.first().is_none());
        assert_eq!(Selection::many(Vec::new()), Selection::cancelled());
    }

    #[test]
    fn test_from_option() {
        assert!(Selection::from_option(Some(PathBuf::from("/a"))).is_confirmed());
        assert!(!Selection::from_option(None).is_confirmed());
    }

    #[test]
    fn test_split_multi_joins_directory_and_names() {
        let raw = "C:\\Users\\me\0a.png\0b.png\0\0";
        let dir = Path::new("C:\\Users\\me");
        assert_eq!(split_multi(raw), vec![dir.join("a.png"), dir.join("b.png")]);
    }

    #[test]
    fn test_split_multi_single_full_path() {
        assert_eq!(
            split_multi("/home/me/a.png"),
            vec![PathBuf::from("/home/me/a.png")]
        );
        assert_eq!(
            split_multi("/home/me/a.png\0\0"),
            vec![PathBuf::from("/home/me/a.png")]
        );
    }

    #[test]
    fn test_split_multi_preserves_order() {
        let paths = split_multi("/d\0z\0a\0m");
        let names: Vec<_> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_split_multi_empty() {
        assert!(split_multi("").is_empty());
        assert!(split_multi("\0\0").is_empty());
    }

    #[test]
    fn test_ensure_extension_appends_first_extension() {
        let filter = Filter::parse("*.png *.jpg");
        assert_eq!(
            ensure_extension(PathBuf::from("/tmp/out"), &filter),
            PathBuf::from("/tmp/out.png")
        );
    }

    #[test]
    fn test_ensure_extension_keeps_matching_name() {
        let filter = Filter::parse("*.png *.jpg");
        assert_eq!(
            ensure_extension(PathBuf::from("/tmp/out.JPG"), &filter),
            PathBuf::from("/tmp/out.JPG")
        );
    }

    #[test]
    fn test_ensure_extension_appends_after_foreign_extension() {
        let filter = Filter::parse("*.png");
        assert_eq!(
            ensure_extension(PathBuf::from("/tmp/out.txt"), &filter),
            PathBuf::from("/tmp/out.txt.png")
        );
    }

    #[test]
    fn test_ensure_extension_blank_or_wildcard_filter() {
        let path = PathBuf::from("/tmp/out");
        assert_eq!(ensure_extension(path.clone(), &Filter::all()), path);
        assert_eq!(ensure_extension(path.clone(), &Filter::parse("*.*")), path);
    }

    #[test]
    fn test_split_lines() {
        assert_eq!(
            split_lines(b"/a/b.png\r\n/a/c.png\n\n"),
            vec![PathBuf::from("/a/b.png"), PathBuf::from("/a/c.png")]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_split_lines_keeps_non_utf8_names() {
        use std::os::unix::ffi::OsStrExt;

        let paths = split_lines(b"/tmp/caf\xe9.txt\n/tmp/ok.txt\n");
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0].as_os_str().as_bytes(), b"/tmp/caf\xe9.txt");
        assert_eq!(paths[1], PathBuf::from("/tmp/ok.txt"));
    }
}
