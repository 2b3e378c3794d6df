//! Platform definition for vendor-specific command output handling.

use std::sync::LazyLock;

use regex::Regex;

/// Position suffix the console appends to a rejected command.
static CONSOLE_POSITION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(line \d+ column \d+\)$").expect("valid position regex"));

/// Vendor-specific knowledge about how a device reports command failures.
///
/// Many devices print errors to stdout and still exit cleanly, so a command
/// is also treated as failed when its output is a console error starting
/// with one of `failed_when_contains`.
#[derive(Debug, Clone)]
pub struct PlatformDefinition {
    /// Platform name (e.g., "routeros").
    pub name: String,

    /// Substrings that indicate command failure.
    pub failed_when_contains: Vec<String>,
}

impl PlatformDefinition {
    /// Create a new platform definition with no failure patterns.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            failed_when_contains: vec![],
        }
    }

    /// Add a failure pattern.
    pub fn with_failure_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.failed_when_contains.push(pattern.into());
        self
    }

    /// Return the console error that `output` consists of, if any.
    ///
    /// Only the first non-blank line is considered, and only when it starts
    /// with a failure pattern. It must also either end in a console position
    /// such as `(line 1 column 15)` or be the only line of output. Text
    /// further down, such as a `;;;` comment in a `print` dump, never counts.
    pub fn detect_failure<'a>(&self, output: &'a str) -> Option<&'a str> {
        let mut lines = output
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty());
        let first = lines.next()?;

        let is_error = self
            .failed_when_contains
            .iter()
            .any(|pattern| first.starts_with(pattern.as_str()));
        if !is_error {
            return None;
        }

        if CONSOLE_POSITION.is_match(first) || lines.next().is_none() {
            Some(first)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_failure_returns_offending_line() {
        let platform = PlatformDefinition::new("test").with_failure_pattern("bad command");
        let output = "\n  bad command name peer (line 1 column 15)\n";
        assert_eq!(
            platform.detect_failure(output),
            Some("bad command name peer (line 1 column 15)")
        );
    }

    #[test]
    fn test_single_line_error_without_position() {
        let platform = PlatformDefinition::new("test").with_failure_pattern("failure:");
        assert_eq!(
            platform.detect_failure("failure: already have such entry\n"),
            Some("failure: already have such entry")
        );
    }

    #[test]
    fn test_pattern_below_first_line_ignored() {
        let platform = PlatformDefinition::new("test").with_failure_pattern("bad command");
        let output = "first line\n  bad command name peer (line 1 column 15)\n";
        assert_eq!(platform.detect_failure(output), None);
    }

    #[test]
    fn test_detect_failure_clean_output() {
        let platform = PlatformDefinition::new("test").with_failure_pattern("bad command");
        assert_eq!(platform.detect_failure("uptime: 1d"), None);
        assert_eq!(platform.detect_failure(""), None);
    }

    #[test]
    fn test_no_patterns_never_fails() {
        let platform = PlatformDefinition::new("test");
        assert!(platform.detect_failure("syntax error").is_none());
    }
}
