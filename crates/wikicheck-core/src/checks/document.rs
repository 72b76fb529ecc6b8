use log::debug;

use super::DocumentCheck;
use crate::document::Document;
use crate::error::{Result, WikiError};
use crate::format::Format;
use crate::model::Issue;
use crate::wiki::Wiki;

pub const DEFAULT_SHORT_DOCUMENT_THRESHOLD: usize = 256;
pub const DEFAULT_POOR_LINK_THRESHOLD: usize = 1;

fn positive(name: &str, threshold: usize) -> Result<usize> {
    if threshold == 0 {
        return Err(WikiError::Config(format!("{name} must be at least 1")));
    }
    Ok(threshold)
}

/// Flags stub documents: fewer characters than the threshold for text formats, otherwise
/// fewer bytes on disk.
pub struct ShortDocumentCheck {
    threshold: usize,
}

impl ShortDocumentCheck {
    pub fn new() -> Self {
        Self {
            threshold: DEFAULT_SHORT_DOCUMENT_THRESHOLD,
        }
    }

    pub fn with_threshold(threshold: usize) -> Result<Self> {
        Ok(Self {
            threshold: positive("short document threshold", threshold)?,
        })
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }
}

impl Default for ShortDocumentCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentCheck for ShortDocumentCheck {
    fn name(&self) -> &'static str {
        "short-document"
    }

    fn check(
        &self,
        document: &Document,
        text: Option<&str>,
        _wiki: &Wiki,
        issues: &mut Vec<Issue>,
    ) {
        if let Some(text) = text {
            let characters = text.chars().count();
            if characters < self.threshold {
                issues.push(Issue::warning(format!(
                    "Document has only {characters} characters, \
                     this document may be an incomplete or stub document"
                )));
                return;
            }
        }

        // Vanished files are reported when the text is read, not here
        let Some(bytes) = document.file_len() else {
            return;
        };
        if bytes < self.threshold as u64 {
            issues.push(Issue::warning(format!(
                "Document is only {bytes} bytes in length, \
                 this document may be an incomplete or stub document"
            )));
        }
    }
}

/// Flags documents no other document links to.
pub struct IsolatedDocumentCheck;

impl DocumentCheck for IsolatedDocumentCheck {
    fn name(&self) -> &'static str {
        "isolated-document"
    }

    fn check(
        &self,
        document: &Document,
        _text: Option<&str>,
        wiki: &Wiki,
        issues: &mut Vec<Issue>,
    ) {
        if wiki.inbound_link_count(document.path()) == 0 {
            debug!("{} has no inbound links", document.path());
            issues.push(Issue::error(
                "Document is isolated, no inbound links to this document were found",
            ));
        }
    }
}

/// Flags documents reachable through only a handful of links.
///
/// Isolated documents are left to [`IsolatedDocumentCheck`].
pub struct PoorlyLinkedDocumentCheck {
    threshold: usize,
}

impl PoorlyLinkedDocumentCheck {
    pub fn new() -> Self {
        Self {
            threshold: DEFAULT_POOR_LINK_THRESHOLD,
        }
    }

    pub fn with_threshold(threshold: usize) -> Result<Self> {
        Ok(Self {
            threshold: positive("poor link threshold", threshold)?,
        })
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }
}

impl Default for PoorlyLinkedDocumentCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentCheck for PoorlyLinkedDocumentCheck {
    fn name(&self) -> &'static str {
        "poorly-linked-document"
    }

    fn check(
        &self,
        document: &Document,
        _text: Option<&str>,
        wiki: &Wiki,
        issues: &mut Vec<Issue>,
    ) {
        let inbound = wiki.inbound_link_count(document.path());
        if inbound > 0 && inbound <= self.threshold {
            issues.push(Issue::warning(format!(
                "Document is poorly linked with only {inbound} inbound link(s)"
            )));
        }
    }
}

/// Flags text documents that link nowhere.
pub struct DeadEndDocumentCheck;

impl DocumentCheck for DeadEndDocumentCheck {
    fn name(&self) -> &'static str {
        "dead-end-document"
    }

    fn check(
        &self,
        document: &Document,
        _text: Option<&str>,
        _wiki: &Wiki,
        issues: &mut Vec<Issue>,
    ) {
        if document.format().is_text() && document.outbound_link_count() == 0 {
            issues.push(Issue::warning("Document is a dead end with zero outbound links"));
        }
    }
}

/// The Creole `<<toc>>` macro lists the top-level directory wherever it is placed.
pub struct CreoleTocMacroCheck;

impl DocumentCheck for CreoleTocMacroCheck {
    fn name(&self) -> &'static str {
        "creole-toc-macro"
    }

    fn check(
        &self,
        document: &Document,
        text: Option<&str>,
        _wiki: &Wiki,
        issues: &mut Vec<Issue>,
    ) {
        if document.format() != Format::Creole || document.is_top_level() {
            return;
        }
        if text.is_some_and(|text| text.contains("<<toc")) {
            issues.push(Issue::warning(
                "Document uses the table of contents macro below the top level, \
                 it will list the top level documents",
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Link;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn document(path: &str, format: Format) -> Document {
        Document::new(path, PathBuf::from(path), format)
    }

    fn run(
        check: &dyn DocumentCheck,
        document: &Document,
        text: Option<&str>,
        wiki: &Wiki,
    ) -> Vec<Issue> {
        let mut issues = Vec::new();
        check.check(document, text, wiki, &mut issues);
        issues
    }

    #[test]
    fn test_thresholds_must_be_positive() {
        assert!(ShortDocumentCheck::with_threshold(0).is_err());
        assert!(PoorlyLinkedDocumentCheck::with_threshold(0).is_err());
        let lenient = ShortDocumentCheck::with_threshold(1).unwrap();
        assert_eq!(lenient.threshold(), 1);
        assert_eq!(ShortDocumentCheck::new().threshold(), 256);
        assert_eq!(PoorlyLinkedDocumentCheck::new().threshold(), 1);
    }

    #[test]
    fn test_short_text_document() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("Stub.wiki");
        let text = "x".repeat(100);
        fs::write(&file, &text).unwrap();
        let document = Document::new("Stub.wiki", file, Format::Creole);

        let wiki = Wiki::new();
        let issues = run(&ShortDocumentCheck::new(), &document, Some(&text), &wiki);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].is_warning());
        assert!(issues[0].message.starts_with("Document has only 100 characters"));
    }

    #[test]
    fn test_short_binary_document() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("logo.png");
        fs::write(&file, vec![0u8; 100]).unwrap();
        let document = Document::new("logo.png", file, Format::Image);

        let issues = run(&ShortDocumentCheck::new(), &document, None, &Wiki::new());
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.starts_with("Document is only 100 bytes in length"));
    }

    #[test]
    fn test_long_document_passes() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("Long.wiki");
        let text = "word ".repeat(100);
        fs::write(&file, &text).unwrap();
        let document = Document::new("Long.wiki", file, Format::Creole);

        let wiki = Wiki::new();
        assert!(run(&ShortDocumentCheck::new(), &document, Some(&text), &wiki).is_empty());
    }

    #[test]
    fn test_multibyte_text_counts_characters() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("Umlaut.wiki");
        // 200 characters, 400 bytes
        let text = "ä".repeat(200);
        fs::write(&file, &text).unwrap();
        let document = Document::new("Umlaut.wiki", file, Format::Creole);

        let wiki = Wiki::new();
        let issues = run(&ShortDocumentCheck::new(), &document, Some(&text), &wiki);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("200 characters"));
    }

    #[test]
    fn test_isolated_and_poorly_linked() {
        let mut wiki = Wiki::new();
        wiki.add_document(document("A.wiki", Format::Creole));
        wiki.add_document(document("B.wiki", Format::Creole));
        wiki.add_document(document("C.wiki", Format::Creole));
        wiki.record_inbound_link("B", "A", &Link::new("B", 1, 1));
        wiki.record_inbound_link("C", "A", &Link::new("C", 1, 1));
        wiki.record_inbound_link("C", "B", &Link::new("C", 1, 1));

        let a = wiki.document("A").unwrap();
        let b = wiki.document("B").unwrap();
        let c = wiki.document("C").unwrap();

        let isolated = run(&IsolatedDocumentCheck, a, None, &wiki);
        assert_eq!(isolated.len(), 1);
        assert!(isolated[0].is_error());
        assert!(run(&IsolatedDocumentCheck, b, None, &wiki).is_empty());

        let poor = PoorlyLinkedDocumentCheck::new();
        // Isolated is not poorly linked
        assert!(run(&poor, a, None, &wiki).is_empty());
        let issues = run(&poor, b, None, &wiki);
        assert_eq!(issues.len(), 1);
        assert_eq!(
            issues[0].message,
            "Document is poorly linked with only 1 inbound link(s)"
        );
        assert!(run(&poor, c, None, &wiki).is_empty());

        let lenient = PoorlyLinkedDocumentCheck::with_threshold(2).unwrap();
        assert_eq!(run(&lenient, c, None, &wiki).len(), 1);
    }

    #[test]
    fn test_dead_end_document() {
        let wiki = Wiki::new();
        let mut page = document("Page.md", Format::Markdown);
        assert_eq!(run(&DeadEndDocumentCheck, &page, Some(""), &wiki).len(), 1);

        page.add_outbound_link(Link::new("Other", 1, 1));
        assert!(run(&DeadEndDocumentCheck, &page, Some(""), &wiki).is_empty());

        let image = document("logo.png", Format::Image);
        assert!(run(&DeadEndDocumentCheck, &image, None, &wiki).is_empty());
    }

    #[test]
    fn test_creole_toc_macro() {
        let wiki = Wiki::new();
        let nested = document("docs/Index.wiki", Format::Creole);
        let top = document("Index.wiki", Format::Creole);

        let issues = run(&CreoleTocMacroCheck, &nested, Some("<<toc>>"), &wiki);
        assert_eq!(issues.len(), 1);
        assert!(run(&CreoleTocMacroCheck, &top, Some("<<toc>>"), &wiki).is_empty());
        assert!(run(&CreoleTocMacroCheck, &nested, Some("no macro"), &wiki).is_empty());
    }
}
