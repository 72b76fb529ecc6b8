//! Format-specific link detection.
//!
//! Each detector turns raw document text into positioned [`Link`]s. Detectors are pure
//! functions of the text; the only state they touch is the target document's outbound set.

use crate::document::Document;
use crate::model::Link;

mod creole;
mod markdown;
mod simple;

pub use creole::CreoleLinkDetector;
pub use markdown::MarkdownLinkDetector;
pub use simple::SimpleLinkDetector;

pub trait LinkDetector: Send + Sync {
    /// Finds every link in `text`, in source order.
    fn detect(&self, text: &str) -> Vec<Link>;

    /// Records the links found in `text` as outbound links of `document`.
    fn find_links(&self, document: &mut Document, text: &str) {
        for link in self.detect(text) {
            document.add_outbound_link(link);
        }
    }
}

/// Detector for binary formats: never emits links.
pub struct NoLinkDetector;

impl LinkDetector for NoLinkDetector {
    fn detect(&self, _text: &str) -> Vec<Link> {
        Vec::new()
    }
}
