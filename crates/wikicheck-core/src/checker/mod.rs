use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, info, warn};

use crate::checks::{
    CreoleTocMacroCheck, DeadEndDocumentCheck, DocumentCheck, EmptyWikiCheck, ExternalLinkCheck,
    HttpProbe, IsolatedDocumentCheck, LinkCheck, MailLinkCheck, MissingFriendlyTextCheck,
    PoorlyLinkedDocumentCheck, ReqwestProbe, ShortDocumentCheck, WikiCheck, WikiLinkCheck,
};
use crate::config::CheckerConfig;
use crate::error::Result;
use crate::format::FormatRegistry;
use crate::model::Issue;
use crate::wiki::Wiki;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CheckStats {
    pub documents_checked: usize,
    pub links_checked: usize,
    pub issues_raised: usize,
}

/// Runs the registered checks over a wiki.
///
/// A run has two phases separated by a barrier. Phase one detects the links of every
/// pending document and runs the link checks, which also fill the inbound index. Phase two
/// runs the document checks, which may therefore rely on complete inbound counts. Wiki
/// checks run last.
pub struct WikiChecker {
    registry: FormatRegistry,
    link_checks: Vec<Box<dyn LinkCheck>>,
    document_checks: Vec<Box<dyn DocumentCheck>>,
    wiki_checks: Vec<Box<dyn WikiCheck>>,
    concurrency: usize,
    show_stats: bool,
}

impl WikiChecker {
    /// A checker with no checks registered.
    pub fn new(registry: FormatRegistry) -> Self {
        Self {
            registry,
            link_checks: Vec::new(),
            document_checks: Vec::new(),
            wiki_checks: Vec::new(),
            concurrency: 1,
            show_stats: false,
        }
    }

    /// The standard checks configured by `config`, validating external links over HTTP.
    pub fn standard(registry: FormatRegistry, config: &CheckerConfig) -> Result<Self> {
        let probe: Option<Arc<dyn HttpProbe>> = if config.checks.external_links {
            let timeout = config.http.timeout();
            let probe = ReqwestProbe::new(timeout, &config.http.user_agent)?;
            Some(Arc::new(probe))
        } else {
            None
        };
        Self::with_standard_checks(registry, config, probe)
    }

    /// The standard checks configured by `config`. External links are only validated
    /// when a probe is given.
    pub fn with_standard_checks(
        registry: FormatRegistry,
        config: &CheckerConfig,
        probe: Option<Arc<dyn HttpProbe>>,
    ) -> Result<Self> {
        config.validate()?;
        let checks = &config.checks;
        let mut checker = Self::new(registry);
        checker.concurrency = config.http.concurrency;
        checker.show_stats = config.logging.show_check_stats;

        if checks.missing_friendly_text {
            checker.add_link_check(MissingFriendlyTextCheck);
        }
        checker.add_link_check(WikiLinkCheck);
        if checks.mail_links {
            checker.add_link_check(MailLinkCheck);
        }
        if let Some(probe) = probe.filter(|_| checks.external_links) {
            checker.add_link_check(ExternalLinkCheck::new(probe));
        }

        let short = ShortDocumentCheck::with_threshold(checks.short_document_threshold)?;
        let poorly_linked = PoorlyLinkedDocumentCheck::with_threshold(checks.poor_link_threshold)?;
        checker.add_document_check(short);
        checker.add_document_check(IsolatedDocumentCheck);
        checker.add_document_check(poorly_linked);
        if checks.dead_end_documents {
            checker.add_document_check(DeadEndDocumentCheck);
        }
        if checks.creole_toc_macro {
            checker.add_document_check(CreoleTocMacroCheck);
        }

        checker.add_wiki_check(EmptyWikiCheck);
        Ok(checker)
    }

    pub fn add_link_check(&mut self, check: impl LinkCheck + 'static) {
        self.link_checks.push(Box::new(check));
    }

    pub fn add_document_check(&mut self, check: impl DocumentCheck + 'static) {
        self.document_checks.push(Box::new(check));
    }

    pub fn add_wiki_check(&mut self, check: impl WikiCheck + 'static) {
        self.wiki_checks.push(Box::new(check));
    }

    /// Number of worker threads for link checks (at least one).
    pub fn set_concurrency(&mut self, concurrency: usize) {
        self.concurrency = concurrency.max(1);
    }

    pub fn link_check_names(&self) -> Vec<&'static str> {
        self.link_checks.iter().map(|c| c.name()).collect()
    }

    pub fn document_check_names(&self) -> Vec<&'static str> {
        self.document_checks.iter().map(|c| c.name()).collect()
    }

    pub fn wiki_check_names(&self) -> Vec<&'static str> {
        self.wiki_checks.iter().map(|c| c.name()).collect()
    }

    /// Checks every document not checked yet, or all of them when `recheck` is set.
    ///
    /// Wiki checks rerun whenever any document was checked. A run with nothing pending
    /// changes nothing.
    ///
    /// Fails only when a document can no longer be read; documents processed before the
    /// failure keep their partial results.
    pub fn run(&self, wiki: &mut Wiki, recheck: bool) -> Result<CheckStats> {
        let pending: Vec<String> = wiki
            .documents()
            .filter(|document| recheck || !document.is_checked())
            .map(|document| document.path().to_string())
            .collect();
        info!(
            "checking {} of {} document(s)",
            pending.len(),
            wiki.document_count()
        );

        let mut stats = CheckStats {
            documents_checked: pending.len(),
            ..CheckStats::default()
        };

        // Phase one: detection needs each document exclusively
        let mut texts: HashMap<String, Option<String>> = HashMap::with_capacity(pending.len());
        for path in &pending {
            wiki.clear_inbound_from(path);
            let Some(document) = wiki.document_mut(path) else {
                continue;
            };
            document.reset();
            let text = document.read_text()?;

            match self.registry.detector_for(document.format()) {
                Some(detector) => {
                    if let Some(text) = &text {
                        detector.find_links(document, text);
                    }
                }
                None => {
                    let format = document.format();
                    warn!("no link detector for {path} ({format})");
                    document.add_issue(Issue::warning(format!(
                        "Document has format {format} which does not have a link detector, \
                         no links can be detected for this document"
                    )));
                }
            }
            debug!(
                "{}: {} outbound link(s)",
                path,
                document.outbound_link_count()
            );
            texts.insert(path.clone(), text);
        }

        let link_results = self.check_links(wiki, &pending)?;
        for (path, (issues, links)) in pending.iter().zip(link_results) {
            stats.links_checked += links;
            if let Some(document) = wiki.document_mut(path) {
                document.extend_issues(issues);
            }
        }

        // Phase two: inbound counts are final now
        for path in &pending {
            let Some(document) = wiki.document(path) else {
                continue;
            };
            let text = texts.get(path).and_then(|text| text.as_deref());
            let mut issues = Vec::new();
            for check in &self.document_checks {
                check.check(document, text, wiki, &mut issues);
            }

            if let Some(document) = wiki.document_mut(path) {
                document.extend_issues(issues);
                document.set_checked(true);
                stats.issues_raised += document.issue_count();
            }
        }

        // Global results describe the whole wiki, so they follow any change to it
        if recheck || !pending.is_empty() || !wiki.is_checked() {
            wiki.clear_global_issues();
            let mut issues = Vec::new();
            for check in &self.wiki_checks {
                check.check(wiki, &mut issues);
            }
            stats.issues_raised += issues.len();
            for issue in issues {
                wiki.add_global_issue(issue);
            }
            wiki.set_checked(true);
        }

        if self.show_stats {
            info!(
                "checked {} document(s) and {} link(s), {} issue(s) raised",
                stats.documents_checked, stats.links_checked, stats.issues_raised
            );
        }
        Ok(stats)
    }

    /// Issues and link count per pending document, in `pending` order.
    fn link_issues(&self, wiki: &Wiki, path: &str) -> (Vec<Issue>, usize) {
        let Some(document) = wiki.document(path) else {
            return (Vec::new(), 0);
        };
        let mut issues = Vec::new();
        for link in document.outbound_links() {
            for check in &self.link_checks {
                check.check(document, link, wiki, &mut issues);
            }
        }
        (issues, document.outbound_link_count())
    }

    #[cfg(feature = "parallel")]
    fn check_links(&self, wiki: &Wiki, pending: &[String]) -> Result<Vec<(Vec<Issue>, usize)>> {
        use rayon::prelude::*;

        if self.concurrency <= 1 || pending.len() <= 1 {
            return Ok(pending.iter().map(|p| self.link_issues(wiki, p)).collect());
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.concurrency)
            .build()
            .map_err(|err| crate::error::WikiError::WorkerPool(err.to_string()))?;
        Ok(pool.install(|| {
            pending
                .par_iter()
                .map(|path| self.link_issues(wiki, path))
                .collect()
        }))
    }

    #[cfg(not(feature = "parallel"))]
    fn check_links(&self, wiki: &Wiki, pending: &[String]) -> Result<Vec<(Vec<Issue>, usize)>> {
        Ok(pending.iter().map(|p| self.link_issues(wiki, p)).collect())
    }
}
