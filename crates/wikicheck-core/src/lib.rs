//! Wikicheck Core Library
//!
//! Scans a directory tree of wiki documents, detects the links inside them and reports
//! structural problems: broken internal links, isolated or poorly linked pages, stub pages
//! and unreachable external URLs.
//!

pub mod checker;
pub mod checks;
mod config;
pub mod detect;
pub mod document;
pub mod error;
pub mod format;
pub mod line_map;
pub mod model;
pub mod scanner;
pub mod wiki;

pub use checker::{CheckStats, WikiChecker};
pub use config::{CheckerConfig, ChecksConfig, HttpConfig, LoggingConfig, CONFIG_FILE_NAME};
pub use document::Document;
pub use error::{Result, WikiError};
pub use format::{Format, FormatRegistry};
pub use model::{Issue, Link, Severity};
pub use scanner::WikiScanner;
pub use wiki::{InboundLink, Wiki};
