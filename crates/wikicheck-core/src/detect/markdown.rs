use std::collections::{HashMap, HashSet};
use std::ops::Range;

use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag};
use regex::Regex;

use super::LinkDetector;
use crate::line_map::LineMap;
use crate::model::Link;

/// Stands in for both bytes of an escape sequence so offsets stay aligned with the source.
const SENTINEL: char = '\u{1A}';

/// Markdown detector covering reference-style, inline and autolinks.
///
/// Escaped brackets and parentheses are masked before matching, lines indented by four
/// or more whitespace characters are code, and anything inside fenced code blocks or
/// code spans is ignored.
pub struct MarkdownLinkDetector {
    reference_regex: Regex,
    reference_link_regex: Regex,
    inline_link_regex: Regex,
    auto_link_regex: Regex,
}

/// `[label]: target` with an optional quoted or parenthesised title.
const REFERENCE_DEFINITION: &str = concat!(
    r"(?m)^[ \t]*\[([^\]\n]+)\]:[ \t]+(\S+)",
    r#"(?:[ \t]+(?:"[^"\n]*"|'[^'\n]*'|\([^)\n]*\)))?"#
);

impl MarkdownLinkDetector {
    pub fn new() -> Self {
        Self {
            reference_regex: Regex::new(REFERENCE_DEFINITION).expect("valid reference regex"),
            reference_link_regex: Regex::new(r"\[([^\]]+)\] ?\[([^\]]*)\]")
                .expect("valid reference link regex"),
            inline_link_regex: Regex::new(
                r#"\[([^\]]+)\]\(([^)\s]+)(?:\s+(?:"[^"]*"|'[^']*'|\([^)]*\)))?\)"#,
            )
            .expect("valid inline link regex"),
            auto_link_regex: Regex::new(r"<([A-Za-z][A-Za-z0-9+.\-]*:[^<>\s]+)>")
                .expect("valid autolink regex"),
        }
    }
}

impl Default for MarkdownLinkDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkDetector for MarkdownLinkDetector {
    fn detect(&self, text: &str) -> Vec<Link> {
        let line_map = LineMap::new(text);
        let masked = mask_escapes(text, &line_map);
        let code = code_ranges(text);
        let skip = |offset: usize| {
            line_map.is_preformatted(line_map.line_of(offset))
                || code.iter().any(|range| range.contains(&offset))
        };

        let mut links = Vec::new();

        // Reference definitions first, the reference links below resolve against them
        let mut references: HashMap<String, String> = HashMap::new();
        let mut reference_lines: HashSet<usize> = HashSet::new();
        for caps in self.reference_regex.captures_iter(&masked) {
            let (Some(whole), Some(label), Some(target)) = (caps.get(0), caps.get(1), caps.get(2))
            else {
                continue;
            };
            if skip(whole.start()) {
                continue;
            }
            reference_lines.insert(line_map.line_of(whole.start()));

            let target = strip_angle_brackets(&text[target.range()]);
            references
                .entry(normalize_label(&unescape(&text[label.range()])))
                .or_insert_with(|| target.to_string());
        }

        for caps in self.reference_link_regex.captures_iter(&masked) {
            let (Some(whole), Some(label_text), Some(reference)) =
                (caps.get(0), caps.get(1), caps.get(2))
            else {
                continue;
            };
            if skip(whole.start()) {
                continue;
            }

            let label_text = unescape(&text[label_text.range()]);
            // An empty reference uses the link text as the reference
            let reference = match &text[reference.range()] {
                "" => label_text.clone(),
                explicit => unescape(explicit),
            };

            // Undefined references are plain text, not links
            if let Some(target) = references.get(&normalize_label(&reference)) {
                let (line, column) = line_map.position(whole.start());
                links.push(Link::with_text(target.as_str(), label_text, line, column));
            }
        }

        for caps in self.inline_link_regex.captures_iter(&masked) {
            let (Some(whole), Some(label_text), Some(target)) =
                (caps.get(0), caps.get(1), caps.get(2))
            else {
                continue;
            };
            if skip(whole.start()) {
                continue;
            }
            let (line, column) = line_map.position(whole.start());
            links.push(Link::with_text(
                strip_angle_brackets(&text[target.range()]),
                unescape(&text[label_text.range()]),
                line,
                column,
            ));
        }

        for caps in self.auto_link_regex.captures_iter(&masked) {
            let (Some(whole), Some(target)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            if skip(whole.start()) {
                continue;
            }
            let (line, column) = line_map.position(whole.start());
            // Already accounted for as the target of a reference definition
            if reference_lines.contains(&line) {
                continue;
            }
            links.push(Link::new(&text[target.range()], line, column));
        }

        links
    }
}

/// Replaces `\\`, `\[`, `\]`, `\(` and `\)` with two sentinels, leaving code lines alone.
fn mask_escapes(text: &str, line_map: &LineMap) -> String {
    let mut masked = String::with_capacity(text.len());
    let mut line = 1;
    let mut preformatted = line_map.is_preformatted(line);
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\n' => {
                line += 1;
                preformatted = line_map.is_preformatted(line);
                masked.push(c);
            }
            '\\' if !preformatted => match chars.peek() {
                Some('\\' | '[' | ']' | '(' | ')') => {
                    chars.next();
                    masked.push(SENTINEL);
                    masked.push(SENTINEL);
                }
                _ => masked.push(c),
            },
            _ => masked.push(c),
        }
    }

    masked
}

/// Byte ranges of fenced code blocks and inline code spans.
fn code_ranges(text: &str) -> Vec<Range<usize>> {
    Parser::new(text)
        .into_offset_iter()
        .filter_map(|(event, range)| match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(_))) | Event::Code(_) => Some(range),
            _ => None,
        })
        .collect()
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&(next @ ('\\' | '[' | ']' | '(' | ')'))) = chars.peek() {
                chars.next();
                out.push(next);
                continue;
            }
        }
        out.push(c);
    }
    out
}

fn strip_angle_brackets(target: &str) -> &str {
    target
        .strip_prefix('<')
        .and_then(|t| t.strip_suffix('>'))
        .unwrap_or(target)
}

/// Reference labels match case-insensitively with collapsed whitespace.
fn normalize_label(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests;
