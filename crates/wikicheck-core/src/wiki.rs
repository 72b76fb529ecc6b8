use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::model::{count_severity, Issue, Link, Severity};

/// A link recorded against its target, together with the document it came from.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InboundLink {
    pub source: String,
    pub link: Link,
}

/// Back-reference index: target path -> links pointing at it.
///
/// Entries are copies of the source documents' outbound links; the index owns no
/// documents. Written concurrently by wiki-link checks, hence the lock.
#[derive(Debug, Default)]
struct InboundIndex {
    targets: RwLock<HashMap<String, BTreeSet<InboundLink>>>,
}

impl InboundIndex {
    fn record(&self, target: &str, inbound: InboundLink) -> bool {
        let mut targets = self.targets.write().unwrap_or_else(PoisonError::into_inner);
        targets.entry(target.to_string()).or_default().insert(inbound)
    }

    fn links_to(&self, target: &str) -> Vec<InboundLink> {
        let targets = self.targets.read().unwrap_or_else(PoisonError::into_inner);
        targets
            .get(target)
            .map(|links| links.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn count(&self, target: &str) -> usize {
        let targets = self.targets.read().unwrap_or_else(PoisonError::into_inner);
        targets.get(target).map(BTreeSet::len).unwrap_or(0)
    }

    fn remove_source(&self, source: &str) {
        let mut targets = self.targets.write().unwrap_or_else(PoisonError::into_inner);
        for links in targets.values_mut() {
            links.retain(|inbound| inbound.source != source);
        }
        targets.retain(|_, links| !links.is_empty());
    }
}

/// The full graph of documents under one scanned root.
#[derive(Debug, Default)]
pub struct Wiki {
    documents: BTreeMap<String, Document>,
    inbound: InboundIndex,
    global_issues: Vec<Issue>,
    checked: bool,
}

impl Wiki {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Documents ---

    /// Adds a document unless one with the same path exists; the first one wins.
    pub fn add_document(&mut self, document: Document) -> bool {
        if self.documents.contains_key(document.path()) {
            return false;
        }
        self.documents.insert(document.path().to_string(), document);
        true
    }

    pub fn has_document(&self, path: &str) -> bool {
        self.documents.contains_key(path)
    }

    pub fn document(&self, path: &str) -> Option<&Document> {
        self.documents.get(path)
    }

    pub fn document_mut(&mut self, path: &str) -> Option<&mut Document> {
        self.documents.get_mut(path)
    }

    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.documents.values()
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    // --- Inbound links ---

    /// Records `link` from `source` as pointing at `target`.
    ///
    /// Self references are refused so a document never credits itself.
    pub fn record_inbound_link(&self, target: &str, source: &str, link: &Link) -> bool {
        if target == source {
            return false;
        }
        self.inbound.record(
            target,
            InboundLink {
                source: source.to_string(),
                link: link.clone(),
            },
        )
    }

    pub fn inbound_links(&self, path: &str) -> Vec<InboundLink> {
        self.inbound.links_to(path)
    }

    pub fn inbound_link_count(&self, path: &str) -> usize {
        self.inbound.count(path)
    }

    /// Forgets every inbound record contributed by `source`.
    pub(crate) fn clear_inbound_from(&self, source: &str) {
        self.inbound.remove_source(source);
    }

    // --- Link totals ---

    pub fn total_links(&self) -> usize {
        self.documents().map(Document::outbound_link_count).sum()
    }

    pub fn total_wiki_links(&self) -> usize {
        self.documents().map(Document::outbound_wiki_link_count).sum()
    }

    pub fn total_external_links(&self) -> usize {
        self.documents().map(Document::outbound_external_link_count).sum()
    }

    // --- Global issues ---

    pub fn add_global_issue(&mut self, issue: Issue) {
        self.global_issues.push(issue);
    }

    pub(crate) fn clear_global_issues(&mut self) {
        self.global_issues.clear();
    }

    pub fn global_issues(&self) -> &[Issue] {
        &self.global_issues
    }

    pub fn has_global_issues(&self) -> bool {
        !self.global_issues.is_empty()
    }

    pub fn has_global_errors(&self) -> bool {
        self.global_issues.iter().any(Issue::is_error)
    }

    pub fn global_issue_count(&self) -> usize {
        self.global_issues.len()
    }

    pub fn global_error_count(&self) -> usize {
        count_severity(&self.global_issues, Severity::Error)
    }

    pub fn global_warning_count(&self) -> usize {
        count_severity(&self.global_issues, Severity::Warning)
    }

    // --- Issue totals (documents + global) ---

    pub fn total_issue_count(&self) -> usize {
        self.documents().map(Document::issue_count).sum::<usize>() + self.global_issue_count()
    }

    pub fn total_error_count(&self) -> usize {
        self.documents().map(Document::error_count).sum::<usize>() + self.global_error_count()
    }

    pub fn total_warning_count(&self) -> usize {
        self.documents().map(Document::warning_count).sum::<usize>() + self.global_warning_count()
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    pub(crate) fn set_checked(&mut self, checked: bool) {
        self.checked = checked;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Format;
    use std::path::PathBuf;

    fn doc(name: &str) -> Document {
        Document::new(name, PathBuf::from(name), Format::Creole)
    }

    #[test]
    fn test_first_document_wins() {
        let mut wiki = Wiki::new();
        assert!(wiki.add_document(doc("Home.wiki")));
        assert!(!wiki.add_document(Document::new(
            "Home.md",
            PathBuf::from("Home.md"),
            Format::Markdown
        )));

        assert_eq!(wiki.document_count(), 1);
        assert_eq!(wiki.document("Home").unwrap().format(), Format::Creole);
    }

    #[test]
    fn test_document_reachable_by_own_path() {
        let mut wiki = Wiki::new();
        wiki.add_document(doc("guides/Setup.wiki"));
        for document in wiki.documents() {
            assert!(std::ptr::eq(wiki.document(document.path()).unwrap(), document));
        }
        assert!(wiki.has_document("guides/Setup"));
        assert!(!wiki.has_document("guides/Setup.wiki"));
    }

    #[test]
    fn test_self_links_are_not_recorded() {
        let mut wiki = Wiki::new();
        wiki.add_document(doc("A.wiki"));
        let link = Link::new("A", 1, 1);

        assert!(!wiki.record_inbound_link("A", "A", &link));
        assert_eq!(wiki.inbound_link_count("A"), 0);
    }

    #[test]
    fn test_inbound_links_keep_source() {
        let wiki = Wiki::new();
        let link = Link::new("B", 1, 1);

        assert!(wiki.record_inbound_link("B", "A", &link));
        // Same link text and position from another document still counts
        assert!(wiki.record_inbound_link("B", "C", &link));
        assert!(!wiki.record_inbound_link("B", "A", &link));
        assert_eq!(wiki.inbound_link_count("B"), 2);

        wiki.clear_inbound_from("A");
        let remaining = wiki.inbound_links("B");
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].source, "C");
    }

    #[test]
    fn test_totals_reconcile() {
        let mut wiki = Wiki::new();
        let mut a = doc("A.wiki");
        a.add_issue(Issue::error("e1"));
        a.add_issue(Issue::warning("w1"));
        let mut b = doc("B.wiki");
        b.add_issue(Issue::warning("w2"));
        wiki.add_document(a);
        wiki.add_document(b);
        wiki.add_global_issue(Issue::error("global"));

        assert_eq!(wiki.total_error_count(), 2);
        assert_eq!(wiki.total_warning_count(), 2);
        assert_eq!(
            wiki.total_issue_count(),
            wiki.total_error_count() + wiki.total_warning_count()
        );
        assert!(wiki.has_global_errors());
        assert_eq!(wiki.global_warning_count(), 0);
    }
}
