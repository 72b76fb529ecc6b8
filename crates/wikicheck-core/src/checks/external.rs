use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use log::{debug, error, warn};
use url::Url;

use super::probe::{HttpProbe, ProbeError, ProbeMethod};
use super::LinkCheck;
use crate::document::Document;
use crate::model::{Issue, Link};
use crate::wiki::Wiki;

/// Outcome of validating one external URL, shared by every link pointing at it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Valid,
    Broken(u16),
    InvalidUri(String),
    Unexpected(String),
}

impl Validation {
    fn issue_for(&self, link: &Link) -> Option<Issue> {
        match self {
            Validation::Valid => None,
            Validation::Broken(status) => Some(Issue::error(format!(
                "Broken external link (HTTP status {status}) - {link}"
            ))),
            Validation::InvalidUri(cause) => Some(
                Issue::error(format!("Invalid external link URI - {link}")).caused_by(cause),
            ),
            Validation::Unexpected(cause) => Some(
                Issue::error(format!("Unexpected error with external link URI - {link}"))
                    .caused_by(cause),
            ),
        }
    }
}

impl From<ProbeError> for Validation {
    fn from(err: ProbeError) -> Self {
        match err {
            ProbeError::InvalidUri(_) | ProbeError::UnknownHost(_) => {
                Validation::InvalidUri(err.to_string())
            }
            ProbeError::Other(reason) => Validation::Unexpected(reason),
        }
    }
}

/// HEAD first, GET when HEAD is refused.
enum Attempt {
    Head,
    Get,
    Done(Validation),
}

fn is_success(status: u16) -> bool {
    (200..400).contains(&status)
}

/// Validates `http`/`https` links once per distinct URL for the lifetime of the check.
///
/// Concurrent lookups of a URL that is still being validated wait for the first one
/// instead of issuing their own requests.
pub struct ExternalLinkCheck {
    probe: Arc<dyn HttpProbe>,
    cache: Mutex<HashMap<String, Arc<OnceLock<Validation>>>>,
}

impl ExternalLinkCheck {
    pub fn new(probe: Arc<dyn HttpProbe>) -> Self {
        Self {
            probe,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Outcome recorded for `url`, if validation finished.
    pub fn cached_status(&self, url: &str) -> Option<Validation> {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(url)
            .and_then(|cell| cell.get().cloned())
    }

    pub fn is_cached(&self, url: &str) -> bool {
        self.cached_status(url).is_some()
    }

    pub fn validated_count(&self) -> usize {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|cell| cell.get().is_some())
            .count()
    }

    fn cell_for(&self, url: &str) -> Arc<OnceLock<Validation>> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        cache.entry(url.to_string()).or_default().clone()
    }

    fn validate(&self, url: &Url) -> Validation {
        if !matches!(url.scheme(), "http" | "https") {
            return Validation::InvalidUri(format!("unsupported scheme {}", url.scheme()));
        }

        let mut attempt = Attempt::Head;
        loop {
            attempt = match attempt {
                Attempt::Head => match self.probe.status(ProbeMethod::Head, url) {
                    Ok(status) if is_success(status) => Attempt::Done(Validation::Valid),
                    Ok(status) => {
                        debug!("HEAD {url} returned {status}, retrying with GET");
                        Attempt::Get
                    }
                    Err(err) => Attempt::Done(err.into()),
                },
                Attempt::Get => match self.probe.status(ProbeMethod::Get, url) {
                    Ok(status) if is_success(status) => Attempt::Done(Validation::Valid),
                    Ok(status) => Attempt::Done(Validation::Broken(status)),
                    Err(err) => Attempt::Done(err.into()),
                },
                Attempt::Done(validation) => {
                    debug!("validated {url}: {validation:?}");
                    return validation;
                }
            };
        }
    }
}

impl LinkCheck for ExternalLinkCheck {
    fn name(&self) -> &'static str {
        "external-link"
    }

    fn check(&self, document: &Document, link: &Link, _wiki: &Wiki, issues: &mut Vec<Issue>) {
        if link.is_mail_link() || link.is_wiki_link() {
            return;
        }

        let key = link.path();
        if let Some(validation) = self.cached_status(key) {
            issues.extend(validation.issue_for(link));
            return;
        }

        let violations = RefCell::new(Vec::new());
        let parsed = Url::options()
            .syntax_violation_callback(Some(&|violation| violations.borrow_mut().push(violation)))
            .parse(key);

        let url = match parsed {
            Ok(url) => url,
            Err(err) => {
                error!("{}: {} is not a valid IRI: {}", document.path(), key, err);
                issues.push(Issue::error(format!(
                    "External link {key} violates the IRI specification - {err}"
                )));
                return;
            }
        };

        // Only the occurrence that validates the URL reports its syntax warnings
        let cell = self.cell_for(key);
        let mut validated_here = false;
        let validation = cell.get_or_init(|| {
            validated_here = true;
            self.validate(&url)
        });
        if validated_here {
            for violation in violations.into_inner() {
                warn!("{}: {} {}", document.path(), key, violation);
                issues.push(Issue::warning(format!(
                    "External link {key} has a warning against the IRI specification - \
                     {violation}"
                )));
            }
        }

        if let Some(issue) = validation.issue_for(link) {
            error!("{}: {}", document.path(), issue.message);
            issues.push(issue);
        }
    }
}
