use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

const MAILTO: &str = "mailto:";

fn scheme_regex() -> &'static Regex {
    static SCHEME: OnceLock<Regex> = OnceLock::new();
    SCHEME.get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:").expect("valid scheme regex"))
}

/// A detected reference from a document to a target.
///
/// Positions are 1-based. Without friendly text the display text equals the path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    path: String,
    text: String,
    line: usize,
    column: usize,
}

impl Link {
    pub fn new(path: impl Into<String>, line: usize, column: usize) -> Self {
        let path = path.into();
        Self {
            text: path.clone(),
            path,
            line,
            column,
        }
    }

    pub fn with_text(
        path: impl Into<String>,
        text: impl Into<String>,
        line: usize,
        column: usize,
    ) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
            line,
            column,
        }
    }

    /// The literal target as written.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn is_mail_link(&self) -> bool {
        self.path.starts_with(MAILTO)
    }

    /// Targets another document of the same wiki: no URI scheme and not `mailto:`.
    pub fn is_wiki_link(&self) -> bool {
        !self.is_mail_link() && !scheme_regex().is_match(&self.path)
    }

    pub fn has_friendly_text(&self) -> bool {
        self.text != self.path
    }

    pub fn friendly_text(&self) -> Option<&str> {
        self.has_friendly_text().then_some(self.text.as_str())
    }

    /// Address of a `mailto:` link.
    pub fn mail_address(&self) -> Option<&str> {
        self.path.strip_prefix(MAILTO)
    }

    fn sort_key(&self) -> (usize, usize, &str, Option<&str>) {
        (self.line, self.column, &self.path, self.friendly_text())
    }
}

impl PartialEq for Link {
    fn eq(&self, other: &Self) -> bool {
        self.sort_key() == other.sort_key()
    }
}

impl Eq for Link {}

impl Hash for Link {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sort_key().hash(state);
    }
}

impl PartialOrd for Link {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Link {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_friendly_text() {
            write!(f, "{}({})", self.text, self.path)?;
        } else {
            write!(f, "{}", self.text)?;
        }
        write!(f, " [Line {} Column {}]", self.line, self.column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("Error"),
            Severity::Warning => f.write_str("Warning"),
        }
    }
}

/// A problem recorded against a document or the whole wiki.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub message: String,
    pub severity: Severity,
    /// Rendered underlying failure, if the issue came from one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

impl Issue {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Error,
            cause: None,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Warning,
            cause: None,
        }
    }

    pub fn caused_by(mut self, cause: impl fmt::Display) -> Self {
        self.cause = Some(cause.to_string());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// Shared severity tallies for anything that owns a list of issues.
pub(crate) fn count_severity<'a>(
    issues: impl IntoIterator<Item = &'a Issue>,
    severity: Severity,
) -> usize {
    issues
        .into_iter()
        .filter(|issue| issue.severity == severity)
        .count()
}
