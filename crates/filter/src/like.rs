//! Wildcard patterns with dual translation.
//!
//! A pattern uses `%` for any run of characters and `?` for exactly one
//! character. In-memory evaluation compiles it to an anchored,
//! case-insensitive regex; query translation renders a SQL `LIKE` pattern
//! (with `?` mapped to `_` and literal `%`/`_` escaped). Both translations
//! accept exactly the same strings.

use regex::{Regex, RegexBuilder};

use crate::error::FilterError;

/// The escape character used in generated `LIKE` patterns.
pub const SQL_ESCAPE: char = '\\';

/// True when text contains a wildcard marker and should classify as a
/// pattern match rather than an equality test.
pub fn has_wildcard(text: &str) -> bool {
    text.contains('%') || text.contains('?')
}

/// A compiled wildcard pattern.
#[derive(Debug, Clone)]
pub struct LikePattern {
    raw: String,
    regex: Regex,
}

impl LikePattern {
    /// Compiles a wildcard pattern.
    pub fn new(pattern: impl Into<String>) -> Result<Self, FilterError> {
        let raw = pattern.into();
        let mut source = String::with_capacity(raw.len() + 8);
        source.push('^');
        for ch in raw.chars() {
            match ch {
                '%' => source.push_str(".*"),
                '?' => source.push('.'),
                other => source.push_str(&regex::escape(&other.to_string())),
            }
        }
        source.push('$');

        let regex = RegexBuilder::new(&source)
            .case_insensitive(true)
            .build()
            .map_err(|e| FilterError::InvalidPattern {
                pattern: raw.clone(),
                message: e.to_string(),
            })?;
        Ok(Self { raw, regex })
    }

    /// The raw pattern text.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// In-memory match against a candidate string.
    pub fn matches(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Renders the pattern for a SQL `LIKE ... ESCAPE '\'` clause.
    ///
    /// `%` passes through, `?` becomes `_`, and literal `_` and the escape
    /// character are escaped so they match themselves.
    pub fn to_sql_like(&self) -> String {
        let mut out = String::with_capacity(self.raw.len());
        for ch in self.raw.chars() {
            match ch {
                '%' => out.push('%'),
                '?' => out.push('_'),
                '_' => {
                    out.push(SQL_ESCAPE);
                    out.push('_');
                }
                c if c == SQL_ESCAPE => {
                    out.push(SQL_ESCAPE);
                    out.push(SQL_ESCAPE);
                }
                other => out.push(other),
            }
        }
        out
    }
}

impl PartialEq for LikePattern {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}
