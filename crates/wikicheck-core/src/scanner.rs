use std::path::Path;

use log::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::config::CONFIG_FILE_NAME;
use crate::document::Document;
use crate::error::{Result, WikiError};
use crate::format::FormatRegistry;
use crate::wiki::Wiki;

/// Discovers the documents under a wiki root.
///
/// Scanning only builds the document table: files are never opened and no checks run.
pub struct WikiScanner<'a> {
    registry: &'a FormatRegistry,
}

impl<'a> WikiScanner<'a> {
    pub fn new(registry: &'a FormatRegistry) -> Self {
        Self { registry }
    }

    /// Adds every file below `root` to `wiki` and returns how many were added.
    ///
    /// Hidden files and directories are skipped. Entries are visited in file-name order,
    /// so when two files map to the same wiki path the first one is kept.
    pub fn scan(&self, wiki: &mut Wiki, root: &Path) -> Result<usize> {
        if !root.is_dir() {
            return Err(WikiError::NotFound(root.to_path_buf()));
        }

        let mut added = 0;
        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!("skipping unreadable entry: {err}");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            if entry.depth() == 1 && entry.file_name() == CONFIG_FILE_NAME {
                continue;
            }

            let Ok(relative) = entry.path().strip_prefix(root) else {
                continue;
            };
            let wiki_path = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");

            let format = self.registry.format_for(entry.path());
            let document = Document::new(&wiki_path, entry.path().to_path_buf(), format);
            let path = document.path().to_string();
            if wiki.add_document(document) {
                debug!("found {path} ({format})");
                added += 1;
            } else {
                warn!(
                    "{} maps to existing document {path}, ignored",
                    entry.path().display()
                );
            }
        }

        info!("scanned {}: {added} document(s)", root.display());
        Ok(added)
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}
