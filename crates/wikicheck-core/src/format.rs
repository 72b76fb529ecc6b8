use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::detect::{
    CreoleLinkDetector, LinkDetector, MarkdownLinkDetector, NoLinkDetector, SimpleLinkDetector,
};

/// Document formats the checker knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Format {
    Creole,
    Markdown,
    RestructuredText,
    Textile,
    PlainText,
    Image,
    Unknown,
}

impl Format {
    /// Content can be decoded as characters.
    pub fn is_text(self) -> bool {
        !matches!(self, Format::Image | Format::Unknown)
    }

    /// Extension is stripped to form the wiki path and the document takes part in
    /// internal link resolution.
    pub fn is_wiki_format(self) -> bool {
        matches!(
            self,
            Format::Creole | Format::Markdown | Format::RestructuredText | Format::Textile
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            Format::Creole => "Creole",
            Format::Markdown => "Markdown",
            Format::RestructuredText => "reStructuredText",
            Format::Textile => "Textile",
            Format::PlainText => "Plain Text",
            Format::Image => "Image",
            Format::Unknown => "Unknown Format",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Immutable extension → format → detector table.
///
/// Built once at startup and handed to the scanner and the checker.
#[derive(Clone)]
pub struct FormatRegistry {
    extensions: HashMap<String, Format>,
    detectors: HashMap<Format, Arc<dyn LinkDetector>>,
}

impl FormatRegistry {
    /// A registry with no extensions and no detectors.
    pub fn empty() -> Self {
        Self {
            extensions: HashMap::new(),
            detectors: HashMap::new(),
        }
    }

    pub fn standard() -> Self {
        let mut registry = Self::empty();

        registry.register_extensions(Format::Creole, &["wiki"]);
        registry.register_extensions(
            Format::Markdown,
            &["md", "mkd", "mkdn", "mdown", "markdown", "text"],
        );
        registry.register_extensions(Format::RestructuredText, &["rst"]);
        registry.register_extensions(Format::Textile, &["textile"]);
        registry.register_extensions(Format::PlainText, &["txt"]);
        registry.register_extensions(
            Format::Image,
            &["jpg", "jpeg", "png", "gif", "bmp", "tiff", "raw"],
        );

        registry.register_detector(Format::Creole, Arc::new(CreoleLinkDetector::new()));
        registry.register_detector(Format::Markdown, Arc::new(MarkdownLinkDetector::new()));
        registry.register_detector(Format::PlainText, Arc::new(SimpleLinkDetector::new()));
        registry.register_detector(Format::Image, Arc::new(NoLinkDetector));

        registry
    }

    /// Extensions are matched case-insensitively and without the leading dot.
    pub fn register_extensions(&mut self, format: Format, extensions: &[&str]) {
        for ext in extensions {
            self.extensions
                .insert(ext.trim_start_matches('.').to_ascii_lowercase(), format);
        }
    }

    pub fn register_detector(&mut self, format: Format, detector: Arc<dyn LinkDetector>) {
        self.detectors.insert(format, detector);
    }

    pub fn format_for(&self, file_name: &Path) -> Format {
        file_name
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| self.extensions.get(&ext.to_ascii_lowercase()))
            .copied()
            .unwrap_or(Format::Unknown)
    }

    pub fn detector_for(&self, format: Format) -> Option<&dyn LinkDetector> {
        self.detectors.get(&format).map(|detector| detector.as_ref())
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_extensions() {
        let registry = FormatRegistry::standard();
        let cases = [
            ("Home.wiki", Format::Creole),
            ("README.md", Format::Markdown),
            ("notes.markdown", Format::Markdown),
            ("notes.text", Format::Markdown),
            ("guide.rst", Format::RestructuredText),
            ("guide.textile", Format::Textile),
            ("LICENSE.txt", Format::PlainText),
            ("logo.PNG", Format::Image),
            ("archive.zip", Format::Unknown),
            ("Makefile", Format::Unknown),
        ];
        for (name, expected) in cases {
            assert_eq!(
                registry.format_for(Path::new(name)),
                expected,
                "format of {name}"
            );
        }
    }

    #[test]
    fn test_format_flags() {
        assert!(Format::Creole.is_text() && Format::Creole.is_wiki_format());
        assert!(Format::PlainText.is_text() && !Format::PlainText.is_wiki_format());
        assert!(!Format::Image.is_text() && !Format::Image.is_wiki_format());
        assert!(!Format::Unknown.is_text() && !Format::Unknown.is_wiki_format());
    }

    #[test]
    fn test_detectors_registered() {
        let registry = FormatRegistry::standard();
        assert!(registry.detector_for(Format::Creole).is_some());
        assert!(registry.detector_for(Format::Markdown).is_some());
        assert!(registry.detector_for(Format::PlainText).is_some());
        assert!(registry.detector_for(Format::Image).is_some());
        assert!(registry.detector_for(Format::RestructuredText).is_none());
        assert!(registry.detector_for(Format::Textile).is_none());
        assert!(registry.detector_for(Format::Unknown).is_none());
    }
}
