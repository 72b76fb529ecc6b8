//! Pluggable rules evaluated by the [`crate::checker::WikiChecker`].
//!
//! Checks never fail: every finding is pushed onto the `issues` list handed to them and the
//! orchestrator attaches it to the document (or the wiki) afterwards.

use crate::document::Document;
use crate::model::{Issue, Link};
use crate::wiki::Wiki;

mod document;
mod external;
mod link;
mod probe;
mod wiki;

pub use document::{
    CreoleTocMacroCheck, DeadEndDocumentCheck, IsolatedDocumentCheck, PoorlyLinkedDocumentCheck,
    ShortDocumentCheck, DEFAULT_POOR_LINK_THRESHOLD, DEFAULT_SHORT_DOCUMENT_THRESHOLD,
};
pub use external::{ExternalLinkCheck, Validation};
pub use link::{MailLinkCheck, MissingFriendlyTextCheck, WikiLinkCheck};
pub use probe::{HttpProbe, ProbeError, ProbeMethod, ReqwestProbe};
pub use wiki::EmptyWikiCheck;

/// Runs once per outbound link of a document, during phase one.
pub trait LinkCheck: Send + Sync {
    fn name(&self) -> &'static str;

    fn check(&self, document: &Document, link: &Link, wiki: &Wiki, issues: &mut Vec<Issue>);
}

/// Runs once per document, during phase two, after every document finished phase one.
///
/// `text` is `None` for non-text formats.
pub trait DocumentCheck: Send + Sync {
    fn name(&self) -> &'static str;

    fn check(&self, document: &Document, text: Option<&str>, wiki: &Wiki, issues: &mut Vec<Issue>);
}

/// Runs once per wiki, after phase two.
pub trait WikiCheck: Send + Sync {
    fn name(&self) -> &'static str;

    fn check(&self, wiki: &Wiki, issues: &mut Vec<Issue>);
}
