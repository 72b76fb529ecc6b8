use std::io::{self, Write};

use serde::Serialize;
use wikicheck_core::{Document, Format, Issue, Wiki};

/// Machine-readable summary of a checked wiki.
#[derive(Debug, Serialize)]
pub struct WikiReport {
    pub documents: usize,
    pub links: LinkTotals,
    pub errors: usize,
    pub warnings: usize,
    pub global_issues: Vec<Issue>,
    pub issues: Vec<DocumentReport>,
}

#[derive(Debug, Serialize)]
pub struct LinkTotals {
    pub total: usize,
    pub wiki: usize,
    pub external: usize,
}

#[derive(Debug, Serialize)]
pub struct DocumentReport {
    pub path: String,
    pub format: Format,
    pub inbound_links: usize,
    pub outbound_links: usize,
    pub issues: Vec<Issue>,
}

impl WikiReport {
    /// Collects documents with errors, and with warnings too when `show_warnings` is set.
    pub fn new(wiki: &Wiki, show_warnings: bool) -> Self {
        let issues = wiki
            .documents()
            .filter(|document| is_reported(document, show_warnings))
            .map(|document| DocumentReport {
                path: document.path().to_string(),
                format: document.format(),
                inbound_links: wiki.inbound_link_count(document.path()),
                outbound_links: document.outbound_link_count(),
                issues: document
                    .issues()
                    .iter()
                    .filter(|issue| show_warnings || issue.is_error())
                    .cloned()
                    .collect(),
            })
            .collect();

        Self {
            documents: wiki.document_count(),
            links: LinkTotals {
                total: wiki.total_links(),
                wiki: wiki.total_wiki_links(),
                external: wiki.total_external_links(),
            },
            errors: wiki.total_error_count(),
            warnings: wiki.total_warning_count(),
            global_issues: wiki.global_issues().to_vec(),
            issues,
        }
    }

    pub fn write_text(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "Documents: {}", self.documents)?;
        writeln!(
            out,
            "Links: {} ({} wiki, {} external)",
            self.links.total, self.links.wiki, self.links.external
        )?;
        writeln!(out, "Errors: {}", self.errors)?;
        writeln!(out, "Warnings: {}", self.warnings)?;

        if !self.global_issues.is_empty() {
            writeln!(out)?;
            writeln!(out, "Wiki")?;
            for issue in &self.global_issues {
                writeln!(out, "  {issue}")?;
            }
        }

        for document in &self.issues {
            writeln!(out)?;
            writeln!(
                out,
                "{} ({}, {} inbound, {} outbound)",
                document.path, document.format, document.inbound_links, document.outbound_links
            )?;
            for issue in &document.issues {
                writeln!(out, "  {issue}")?;
            }
        }
        Ok(())
    }

    pub fn write_json(&self, out: &mut impl Write) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut *out, self)?;
        writeln!(out)
    }
}

fn is_reported(document: &Document, show_warnings: bool) -> bool {
    if show_warnings {
        document.has_issues()
    } else {
        document.has_errors()
    }
}
