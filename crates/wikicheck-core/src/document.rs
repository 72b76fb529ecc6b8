use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Result, WikiError};
use crate::format::Format;
use crate::model::{count_severity, Issue, Link, Severity};

/// One discovered file, addressed by its wiki-relative path.
#[derive(Debug, Clone)]
pub struct Document {
    path: String,
    file: PathBuf,
    format: Format,
    outbound: BTreeSet<Link>,
    issues: Vec<Issue>,
    checked: bool,
}

impl Document {
    /// `wiki_path` uses `/` separators and still carries its extension; the extension is
    /// stripped for wiki formats.
    pub fn new(wiki_path: &str, file: PathBuf, format: Format) -> Self {
        let path = if format.is_wiki_format() {
            strip_extension(wiki_path).to_string()
        } else {
            wiki_path.to_string()
        };

        Self {
            path,
            file,
            format,
            outbound: BTreeSet::new(),
            issues: Vec::new(),
            checked: false,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn is_top_level(&self) -> bool {
        !self.path.contains('/')
    }

    /// Reads the document text. Non-text formats have none.
    pub fn read_text(&self) -> Result<Option<String>> {
        if !self.format.is_text() {
            return Ok(None);
        }
        match std::fs::read(&self.file) {
            Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(WikiError::DocumentNotFound {
                path: self.path.clone(),
            }),
            Err(source) => Err(WikiError::Io {
                path: self.file.clone(),
                source,
            }),
        }
    }

    /// Size of the on-disk file in bytes, `None` when it no longer exists.
    pub fn file_len(&self) -> Option<u64> {
        std::fs::metadata(&self.file).ok().map(|meta| meta.len())
    }

    // --- Outbound links ---

    /// Returns `false` when an equal link was already recorded.
    pub fn add_outbound_link(&mut self, link: Link) -> bool {
        self.outbound.insert(link)
    }

    pub fn outbound_links(&self) -> impl Iterator<Item = &Link> {
        self.outbound.iter()
    }

    pub fn outbound_link_count(&self) -> usize {
        self.outbound.len()
    }

    pub fn outbound_wiki_link_count(&self) -> usize {
        self.outbound.iter().filter(|l| l.is_wiki_link()).count()
    }

    pub fn outbound_external_link_count(&self) -> usize {
        self.outbound.iter().filter(|l| !l.is_wiki_link()).count()
    }

    // --- Issues ---

    pub fn add_issue(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    pub(crate) fn extend_issues(&mut self, issues: impl IntoIterator<Item = Issue>) {
        self.issues.extend(issues);
    }

    /// Issues in detection order.
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(Issue::is_error)
    }

    pub fn issue_count(&self) -> usize {
        self.issues.len()
    }

    pub fn error_count(&self) -> usize {
        count_severity(&self.issues, Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        count_severity(&self.issues, Severity::Warning)
    }

    // --- Check state ---

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    pub(crate) fn set_checked(&mut self, checked: bool) {
        self.checked = checked;
    }

    /// Drops everything a previous run produced so links can be detected again.
    pub(crate) fn reset(&mut self) {
        self.outbound.clear();
        self.issues.clear();
        self.checked = false;
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.checked {
            write!(
                f,
                "{} (Format: {} with {} Outbound Link(s) and {} Issue(s))",
                self.path,
                self.format,
                self.outbound.len(),
                self.issues.len()
            )
        } else {
            write!(f, "{} (Format: {} Unchecked)", self.path, self.format)
        }
    }
}

fn strip_extension(wiki_path: &str) -> &str {
    let name_start = wiki_path.rfind('/').map(|i| i + 1).unwrap_or(0);
    match wiki_path[name_start..].rfind('.') {
        Some(dot) if dot > 0 => &wiki_path[..name_start + dot],
        _ => wiki_path,
    }
}
