//! Regex-or-literal patterns used by every rule field
//!
//! A pattern is treated as a regular expression that must match the whole
//! value. Patterns that are not valid regular expressions fall back to exact
//! string equality, so plain names and malformed patterns never fail a
//! request.

use regex::Regex;
use std::fmt;

/// Compiled rule pattern
#[derive(Clone)]
pub enum Pattern {
    /// Valid regular expression, anchored at both ends
    Regex {
        source: String,
        regex: Regex,
    },
    /// Not a valid regular expression; matched by equality
    Literal(String),
}

impl Pattern {
    /// Compile a pattern, falling back to a literal when it is not a valid regex
    ///
    /// # Examples
    ///
    /// ```
    /// use trino_acl::pattern::Pattern;
    ///
    /// assert!(Pattern::compile("hive|iceberg").matches("iceberg"));
    /// assert!(!Pattern::compile("hive").matches("hive2"));
    /// assert!(Pattern::compile("[").matches("["));
    /// ```
    pub fn compile(source: &str) -> Self {
        // Validate the bare pattern first: wrapping it in a group can turn an
        // unbalanced pattern such as `a)(b` into a valid one.
        if Regex::new(source).is_err() {
            return Pattern::Literal(source.to_string());
        }

        match Self::anchored(source) {
            Some(regex) => Pattern::Regex {
                source: source.to_string(),
                regex,
            },
            None => Pattern::Literal(source.to_string()),
        }
    }

    fn anchored(source: &str) -> Option<Regex> {
        if let Ok(regex) = Regex::new(&format!(r"\A(?:{})\z", source)) {
            return Some(regex);
        }

        // A trailing `#` comment in verbose mode swallows the closing group;
        // the newline ends the comment and is ignored as verbose whitespace.
        Regex::new(&format!("\\A(?:{}\n)\\z", source)).ok()
    }

    /// Check whether the pattern matches the whole value
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Pattern::Regex { regex, .. } => regex.is_match(value),
            Pattern::Literal(literal) => literal == value,
        }
    }

    /// Whether the pattern fell back to literal matching
    pub fn is_literal(&self) -> bool {
        matches!(self, Pattern::Literal(_))
    }

    /// Original pattern text
    pub fn as_str(&self) -> &str {
        match self {
            Pattern::Regex { source, .. } => source,
            Pattern::Literal(literal) => literal,
        }
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Regex { source, .. } => f.debug_tuple("Regex").field(source).finish(),
            Pattern::Literal(literal) => f.debug_tuple("Literal").field(literal).finish(),
        }
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.is_literal() == other.is_literal() && self.as_str() == other.as_str()
    }
}

impl Eq for Pattern {}
