use std::error::Error as _;
use std::fmt;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use url::Url;

use crate::error::{Result, WikiError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeMethod {
    Head,
    Get,
}

impl fmt::Display for ProbeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeMethod::Head => f.write_str("HEAD"),
            ProbeMethod::Get => f.write_str("GET"),
        }
    }
}

/// Why a request produced no status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// The client refused the URL.
    InvalidUri(String),
    /// DNS resolution failed.
    UnknownHost(String),
    Other(String),
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeError::InvalidUri(reason) => write!(f, "invalid URI: {reason}"),
            ProbeError::UnknownHost(reason) => write!(f, "unknown host: {reason}"),
            ProbeError::Other(reason) => f.write_str(reason),
        }
    }
}

/// Issues a single request and reports the response status.
///
/// Implementations must release the response before returning.
pub trait HttpProbe: Send + Sync {
    fn status(&self, method: ProbeMethod, url: &Url) -> std::result::Result<u16, ProbeError>;
}

/// [`HttpProbe`] backed by a pooled blocking `reqwest` client.
pub struct ReqwestProbe {
    client: Client,
}

impl ReqwestProbe {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(WikiError::HttpClient)?;
        Ok(Self { client })
    }
}

impl HttpProbe for ReqwestProbe {
    fn status(&self, method: ProbeMethod, url: &Url) -> std::result::Result<u16, ProbeError> {
        let request = match method {
            ProbeMethod::Head => self.client.head(url.as_str()),
            ProbeMethod::Get => self.client.get(url.as_str()),
        };

        let response = request.header(ACCEPT, "*/*").send().map_err(classify)?;
        let status = response.status().as_u16();
        drop(response);
        Ok(status)
    }
}

fn classify(err: reqwest::Error) -> ProbeError {
    let reason = err.to_string();
    if err.is_builder() {
        return ProbeError::InvalidUri(reason);
    }
    if err.is_connect() && is_dns_failure(&err) {
        return ProbeError::UnknownHost(reason);
    }
    ProbeError::Other(reason)
}

/// hyper only exposes resolver failures through the message of a nested source.
fn is_dns_failure(err: &reqwest::Error) -> bool {
    let mut source = err.source();
    while let Some(cause) = source {
        let message = cause.to_string().to_lowercase();
        if message.contains("dns")
            || message.contains("failed to lookup address")
            || message.contains("name or service not known")
        {
            return true;
        }
        source = cause.source();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builds() {
        assert!(ReqwestProbe::new(Duration::from_secs(5), "wikicheck-test").is_ok());
    }

    #[test]
    fn test_probe_display() {
        assert_eq!(ProbeMethod::Head.to_string(), "HEAD");
        assert_eq!(
            ProbeError::UnknownHost("nowhere".into()).to_string(),
            "unknown host: nowhere"
        );
    }
}
