use regex::Regex;

use super::LinkDetector;
use crate::line_map::LineMap;
use crate::model::Link;

/// Creole wiki markup: `[[target]]` and `[[target|friendly text]]`.
pub struct CreoleLinkDetector {
    link_regex: Regex,
}

impl CreoleLinkDetector {
    pub fn new() -> Self {
        Self {
            link_regex: Regex::new(r"\[\[([^\]]+)\]\]").expect("valid creole link regex"),
        }
    }
}

impl Default for CreoleLinkDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkDetector for CreoleLinkDetector {
    fn detect(&self, text: &str) -> Vec<Link> {
        let line_map = LineMap::new(text);
        let mut links = Vec::new();

        for caps in self.link_regex.captures_iter(text) {
            let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let (line, column) = line_map.position(whole.start());

            // The last '|' separates the target from its friendly text
            let link = match inner.as_str().rsplit_once('|') {
                Some((target, friendly)) => {
                    Link::with_text(target.trim(), friendly.trim(), line, column)
                }
                None => Link::new(inner.as_str().trim(), line, column),
            };
            if link.path().is_empty() {
                continue;
            }
            links.push(link);
        }

        links
    }
}
