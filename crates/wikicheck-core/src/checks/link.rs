use log::{error, warn};

use super::LinkCheck;
use crate::document::Document;
use crate::model::{Issue, Link};
use crate::wiki::Wiki;

/// Warns about links that show their raw target instead of a description.
///
/// Wiki links to a page in the same directory (no `/`) are exempt.
pub struct MissingFriendlyTextCheck;

impl LinkCheck for MissingFriendlyTextCheck {
    fn name(&self) -> &'static str {
        "missing-friendly-text"
    }

    fn check(&self, document: &Document, link: &Link, _wiki: &Wiki, issues: &mut Vec<Issue>) {
        if link.has_friendly_text() || link.is_mail_link() {
            return;
        }
        if link.is_wiki_link() && !link.path().contains('/') {
            return;
        }

        warn!("{}: link missing friendly text - {}", document.path(), link);
        issues.push(Issue::warning(format!("Link does not have friendly text - {link}")));
    }
}

/// Resolves wiki links and credits the target with an inbound link.
pub struct WikiLinkCheck;

impl LinkCheck for WikiLinkCheck {
    fn name(&self) -> &'static str {
        "wiki-link"
    }

    fn check(&self, document: &Document, link: &Link, wiki: &Wiki, issues: &mut Vec<Issue>) {
        if !link.is_wiki_link() {
            return;
        }

        let target = link.path().split('#').next().unwrap_or_default();
        // `#section` points into the current document
        if target.is_empty() {
            return;
        }

        if wiki.has_document(target) {
            wiki.record_inbound_link(target, document.path(), link);
        } else {
            error!("{}: broken wiki link {}", document.path(), link);
            issues.push(Issue::error(format!("Broken wiki link - {link}")));
        }
    }
}

/// Warns that a `mailto:` link publishes an email address.
pub struct MailLinkCheck;

impl LinkCheck for MailLinkCheck {
    fn name(&self) -> &'static str {
        "mail-link"
    }

    fn check(&self, document: &Document, link: &Link, _wiki: &Wiki, issues: &mut Vec<Issue>) {
        let Some(address) = link.mail_address() else {
            return;
        };

        warn!(
            "{}: email link exposes email address publicly - {}",
            document.path(),
            address
        );
        issues.push(Issue::warning(format!(
            "Email link exposes email address {address} publicly"
        )));
    }
}
