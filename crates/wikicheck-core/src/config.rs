use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::checks::{DEFAULT_POOR_LINK_THRESHOLD, DEFAULT_SHORT_DOCUMENT_THRESHOLD};
use crate::error::{Result, WikiError};

/// File looked up in the wiki root when no configuration is given explicitly.
pub const CONFIG_FILE_NAME: &str = "wikicheck.yaml";

/// Top-level configuration for a check run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerConfig {
    pub checks: ChecksConfig,
    pub http: HttpConfig,
    pub logging: LoggingConfig,
}

/// Which checks run and their thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChecksConfig {
    /// Documents with fewer characters (or bytes) than this are stubs
    pub short_document_threshold: usize,
    /// Documents with at most this many inbound links are poorly linked
    pub poor_link_threshold: usize,
    pub missing_friendly_text: bool,
    pub mail_links: bool,
    /// Validate `http`/`https` links over the network
    pub external_links: bool,
    pub dead_end_documents: bool,
    pub creole_toc_macro: bool,
}

/// External link validation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Worker threads running link checks
    pub concurrency: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Whether to log run statistics when a check run finishes
    pub show_check_stats: bool,
}

impl Default for ChecksConfig {
    fn default() -> Self {
        Self {
            short_document_threshold: DEFAULT_SHORT_DOCUMENT_THRESHOLD,
            poor_link_threshold: DEFAULT_POOR_LINK_THRESHOLD,
            missing_friendly_text: true,
            mail_links: true,
            external_links: true,
            dead_end_documents: false,
            creole_toc_macro: false,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: concat!("wikicheck/", env!("CARGO_PKG_VERSION")).to_string(),
            concurrency: 8,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            show_check_stats: true,
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl CheckerConfig {
    /// Parse and validate config from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Load config from a specific path
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| WikiError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Loads `wikicheck.yaml` from the wiki root, falling back to defaults when absent.
    pub fn load_from_root(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE_NAME);
        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.checks.short_document_threshold == 0 {
            return Err(WikiError::Config(
                "checks.short_document_threshold must be at least 1".into(),
            ));
        }
        if self.checks.poor_link_threshold == 0 {
            return Err(WikiError::Config(
                "checks.poor_link_threshold must be at least 1".into(),
            ));
        }
        if self.http.timeout_secs == 0 {
            return Err(WikiError::Config("http.timeout_secs must be at least 1".into()));
        }
        if self.http.concurrency == 0 {
            return Err(WikiError::Config("http.concurrency must be at least 1".into()));
        }
        Ok(())
    }
}
