//! Member selection.
//!
//! A member is eligible for transformation when its name ends with the
//! configured extension. The comparison is exact and case-sensitive, and an
//! empty extension selects every member. Text and filename mode share the
//! same [`ExtensionFilter`].

/// A selector deciding which members a substitution applies to.
pub trait EntrySelector {
    /// Returns true if the member with this name should be transformed.
    fn select(&self, name: &str) -> bool;
}

/// Selects members whose name ends with a fixed extension.
///
/// # Example
///
/// ```
/// use zipfnr::select::{EntrySelector, ExtensionFilter};
///
/// let filter = ExtensionFilter::new(".txt");
/// assert!(filter.select("notes/today.txt"));
/// assert!(!filter.select("notes/today.TXT"));
/// assert!(ExtensionFilter::new("").select("anything"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ExtensionFilter {
    extension: String,
}

impl ExtensionFilter {
    /// Creates a filter for the given extension.
    ///
    /// The extension is matched as a raw suffix: `".txt"`, `"txt"` and
    /// `"_report.txt"` are all valid and behave differently.
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
        }
    }

    /// Returns the configured extension.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Returns true if `name` ends with the configured extension.
    #[inline]
    pub fn matches(&self, name: &str) -> bool {
        name.ends_with(self.extension.as_str())
    }
}

impl EntrySelector for ExtensionFilter {
    fn select(&self, name: &str) -> bool {
        self.matches(name)
    }
}

/// Selector that matches all members.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectAll;

impl EntrySelector for SelectAll {
    fn select(&self, _name: &str) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_suffix_match() {
        let filter = ExtensionFilter::new(".txt");
        assert!(filter.matches("a.txt"));
        assert!(filter.matches("dir/sub/b.txt"));
        assert!(!filter.matches("a.txt.bak"));
        assert!(!filter.matches("a.md"));
    }

    #[test]
    fn test_extension_is_case_sensitive() {
        let filter = ExtensionFilter::new(".txt");
        assert!(!filter.matches("README.TXT"));
        assert!(!filter.matches("notes.Txt"));
    }

    #[test]
    fn test_empty_extension_matches_all() {
        let filter = ExtensionFilter::new("");
        assert!(filter.matches(""));
        assert!(filter.matches("dir/"));
        assert!(filter.matches("binary.bin"));
    }

    #[test]
    fn test_directory_entries_do_not_match_extension() {
        // Directory names carry a trailing slash in ZIP archives.
        let filter = ExtensionFilter::new(".txt");
        assert!(!filter.matches("folder.txt/"));
    }

    #[test]
    fn test_select_all() {
        assert!(SelectAll.select("x"));
        assert!(SelectAll.select(""));
    }

    #[test]
    fn test_boxed_selector() {
        let selector: Box<dyn EntrySelector> = Box::new(ExtensionFilter::new(".md"));
        assert!(selector.select("a.md"));
        assert!(!selector.select("a.txt"));
    }
}
