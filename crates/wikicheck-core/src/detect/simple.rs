use regex::Regex;

use super::LinkDetector;
use crate::line_map::LineMap;
use crate::model::Link;

/// Plain-text detector: bare `http://`, `https://` and `mailto:` tokens.
pub struct SimpleLinkDetector {
    link_regex: Regex,
}

impl SimpleLinkDetector {
    pub fn new() -> Self {
        Self {
            link_regex: Regex::new(r"(?:https?://|mailto:)\S+").expect("valid link regex"),
        }
    }
}

impl Default for SimpleLinkDetector {
    fn default() -> Self {
        Self::new()
    }
}

fn closes_unbalanced(text: &str, open: char, close: char) -> bool {
    text.ends_with(close) && text.matches(close).count() > text.matches(open).count()
}

/// Drops what follows a URL in prose: sentence punctuation, `>` and closing brackets
/// with no opening partner inside the URL.
fn trim_trailing(candidate: &str) -> &str {
    let mut target = candidate;
    loop {
        let mut trimmed = target.trim_end_matches(['.', ',', ';', ':', '!', '?', '>']);
        if closes_unbalanced(trimmed, '(', ')') || closes_unbalanced(trimmed, '[', ']') {
            trimmed = &trimmed[..trimmed.len() - 1];
        }
        if trimmed.len() == target.len() {
            return trimmed;
        }
        target = trimmed;
    }
}

impl LinkDetector for SimpleLinkDetector {
    fn detect(&self, text: &str) -> Vec<Link> {
        let line_map = LineMap::new(text);

        self.link_regex
            .find_iter(text)
            .filter_map(|m| {
                let target = trim_trailing(m.as_str());
                if target.ends_with("://") || target == "mailto" {
                    return None;
                }
                let (line, column) = line_map.position(m.start());
                Some(Link::new(target, line, column))
            })
            .collect()
    }
}
