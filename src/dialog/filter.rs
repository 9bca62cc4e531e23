//! File type filters
//!
//! Filters use the space-separated wildcard convention shared by every
//! backend, e.g. `"*.png *.jpg"`. A blank string shows all file types.

use std::fmt;
use std::path::Path;

/// Description used for the "everything" entry appended to native filter lists.
const ALL_FILES_LABEL: &str = "All Files";

// ─────────────────────────────────────────────────────────────────────────────
// Filter
// ─────────────────────────────────────────────────────────────────────────────

/// An ordered list of wildcard patterns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    patterns: Vec<String>,
}

impl Filter {
    /// Parse a space-separated pattern list. Empty tokens are dropped.
    pub fn parse(text: &str) -> Self {
        Self {
            patterns: text.split_whitespace().map(str::to_string).collect(),
        }
    }

    /// A filter that accepts every file.
    pub fn all() -> Self {
        Self::default()
    }

    /// Whether the filter is blank (all files).
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// The patterns exactly as given.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Extensions of the non-wildcard patterns, in order, without the `*.` prefix.
    pub fn extensions(&self) -> Vec<&str> {
        self.patterns
            .iter()
            .filter_map(|p| pattern_extension(p))
            .collect()
    }

    /// The extension appended to a saved file name that matches no pattern.
    ///
    /// This is the first pattern's extension; `None` when the filter is blank
    /// or starts with a wildcard-only pattern.
    pub fn default_extension(&self) -> Option<&str> {
        self.patterns.first().and_then(|p| pattern_extension(p))
    }

    /// Whether any pattern accepts everything (`*`, `*.*`).
    pub fn has_wildcard(&self) -> bool {
        self.patterns.iter().any(|p| pattern_extension(p).is_none())
    }

    /// Test whether `path` already carries one of the filter's extensions.
    ///
    /// The comparison is ASCII case-insensitive and works on the whole file
    /// name, so multi-part extensions such as `tar.gz` are honoured. A blank
    /// filter or a wildcard pattern matches every path.
    pub fn matches_extension(&self, path: &Path) -> bool {
        if self.is_empty() || self.has_wildcard() {
            return true;
        }

        let name = match path.file_name() {
            Some(name) => name.to_string_lossy().to_ascii_lowercase(),
            None => return false,
        };

        self.extensions().iter().any(|ext| {
            let suffix = format!(".{}", ext.to_ascii_lowercase());
            name.len() > suffix.len() && name.ends_with(&suffix)
        })
    }

    /// Human readable label, e.g. `Files (*.png *.jpg)`.
    pub fn description(&self) -> String {
        if self.is_empty() {
            format!("{} (*.*)", ALL_FILES_LABEL)
        } else {
            format!("Files ({})", self.patterns.join(" "))
        }
    }

    /// The filter as `OPENFILENAMEW::lpstrFilter` expects it.
    ///
    /// Pairs of `description\0patterns\0` terminated by an extra NUL, with
    /// patterns joined by `;`. An "All Files" pair always comes last.
    pub fn to_win32(&self) -> String {
        let mut out = String::new();
        if !self.is_empty() {
            out.push_str(&self.description());
            out.push('\0');
            out.push_str(&self.patterns.join(";"));
            out.push('\0');
        }
        out.push_str(ALL_FILES_LABEL);
        out.push_str(" (*.*)\0*.*\0\0");
        out
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.patterns.join(" "))
    }
}

impl From<&str> for Filter {
    fn from(text: &str) -> Self {
        Filter::parse(text)
    }
}

/// Strip leading/trailing `*` and `.` from a pattern. Wildcard-only patterns yield `None`.
fn pattern_extension(pattern: &str) -> Option<&str> {
    let ext = pattern.trim_matches(|c: char| c == '*' || c == '.');
    if ext.is_empty() || ext.contains(['*', '?']) {
        None
    } else {
        Some(ext)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_splits_on_whitespace() {
        let filter = Filter::parse("*.png  *.jpg\t*.gif");
        assert_eq!(filter.patterns(), &["*.png", "*.jpg", "*.gif"]);
    }

    #[test]
    fn test_blank_filter_is_empty() {
        assert!(Filter::parse("").is_empty());
        assert!(Filter::parse("   ").is_empty());
        assert_eq!(Filter::parse(""), Filter::all());
    }

    #[test]
    fn test_extensions_skip_wildcards() {
        let filter = Filter::parse("*.png * *.* *.tar.gz");
        assert_eq!(filter.extensions(), vec!["png", "tar.gz"]);
        assert!(filter.has_wildcard());
    }

    #[test]
    fn test_default_extension_is_first_pattern() {
        assert_eq!(Filter::parse("*.png *.jpg").default_extension(), Some("png"));
        assert_eq!(Filter::parse("*.* *.jpg").default_extension(), None);
        assert_eq!(Filter::all().default_extension(), None);
    }

    #[test]
    fn test_matches_extension_case_insensitive() {
        let filter = Filter::parse("*.png *.jpg");
        assert!(filter.matches_extension(Path::new("/tmp/photo.JPG")));
        assert!(filter.matches_extension(Path::new("/tmp/icon.png")));
        assert!(!filter.matches_extension(Path::new("/tmp/icon")));
        assert!(!filter.matches_extension(Path::new("/tmp/icon.pngx")));
    }

    #[test]
    fn test_matches_extension_requires_a_stem() {
        let filter = Filter::parse("*.png");
        assert!(!filter.matches_extension(Path::new("/tmp/.png")));
    }

    #[test]
    fn test_matches_multi_part_extension() {
        let filter = Filter::parse("*.tar.gz");
        assert!(filter.matches_extension(Path::new("backup.tar.gz")));
        assert!(!filter.matches_extension(Path::new("backup.gz")));
    }

    #[test]
    fn test_wildcard_matches_everything() {
        let filter = Filter::parse("*.png *");
        assert!(filter.matches_extension(Path::new("notes")));
        assert!(Filter::all().matches_extension(Path::new("notes")));
    }

    #[test]
    fn test_description() {
        assert_eq!(
            Filter::parse("*.png *.jpg").description(),
            "Files (*.png *.jpg)"
        );
        assert_eq!(Filter::all().description(), "All Files (*.*)");
    }

    #[test]
    fn test_to_win32_layout() {
        let native = Filter::parse("*.png *.jpg").to_win32();
        assert_eq!(
            native,
            "Files (*.png *.jpg)\0*.png;*.jpg\0All Files (*.*)\0*.*\0\0"
        );
    }

    #[test]
    fn test_to_win32_blank_filter() {
        assert_eq!(Filter::all().to_win32(), "All Files (*.*)\0*.*\0\0");
    }

    #[test]
    fn test_display_normalizes_whitespace() {
        assert_eq!(Filter::parse(" *.md   *.txt ").to_string(), "*.md *.txt");
    }
}
