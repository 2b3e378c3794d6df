//! Line classification and field extraction shared by all parsers.

use std::sync::LazyLock;

use regex::Regex;

/// `key=value` or `key="quoted value"`, where the key starts a
/// whitespace-separated token. An unterminated quote runs to end of line.
static FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:^|\s)([\w.\-]+)=(?:"([^"]*)"?|(\S*))"#).expect("field pattern is valid")
});

/// What a single line of `print` output contributes to parsing.
#[derive(Debug, PartialEq, Eq)]
pub enum LineClass<'a> {
    /// Blank line, `Flags:` legend or `#` column header. Ends a record.
    Boundary,

    /// Line carrying at least one `key=value` field.
    Fields(Fields<'a>),

    /// Anything else (comments, free text). Ignored.
    Other,
}

/// Classify one line.
pub fn classify(line: &str) -> LineClass<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with("Flags:") || trimmed.starts_with('#') {
        return LineClass::Boundary;
    }

    let fields = Fields::parse(trimmed);
    if fields.is_empty() {
        LineClass::Other
    } else {
        LineClass::Fields(fields)
    }
}

/// The `key=value` fields found on one line, in order of appearance.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Fields<'a> {
    pairs: Vec<(&'a str, &'a str)>,
    line: &'a str,
}

impl<'a> Fields<'a> {
    /// Tokenize a line.
    pub fn parse(line: &'a str) -> Self {
        let pairs = FIELD
            .captures_iter(line)
            .filter_map(|caps| {
                let key = caps.get(1)?.as_str();
                let value = caps.get(2).or_else(|| caps.get(3))?.as_str();
                Some((key, value))
            })
            .collect();
        Self { pairs, line }
    }

    /// Value of the first occurrence of `key`, quotes removed.
    pub fn get(&self, key: &str) -> Option<&'a str> {
        self.pairs.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }

    /// Like [`get`](Self::get), but an empty value counts as absent.
    pub fn non_empty(&self, key: &str) -> Option<&'a str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    /// Boolean flag following the RouterOS convention: `None` when `key` is
    /// absent from the line, otherwise whether `key=true` appears literally.
    pub fn flag(&self, key: &str) -> Option<bool> {
        self.get(key)?;
        let literal = format!("{key}=true");
        Some(self.line.contains(&literal))
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Split a `label: value` line at its first colon. Both halves are trimmed.
pub fn label_value(line: &str) -> Option<(&str, &str)> {
    let (label, value) = line.split_once(':')?;
    Some((label.trim(), value.trim()))
}
