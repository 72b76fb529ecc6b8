use log::error;

use super::WikiCheck;
use crate::model::Issue;
use crate::wiki::Wiki;

pub struct EmptyWikiCheck;

impl WikiCheck for EmptyWikiCheck {
    fn name(&self) -> &'static str {
        "empty-wiki"
    }

    fn check(&self, wiki: &Wiki, issues: &mut Vec<Issue>) {
        if wiki.document_count() == 0 {
            error!("wiki has no documents");
            issues.push(Issue::error("Wiki has no documents"));
        }
    }
}
