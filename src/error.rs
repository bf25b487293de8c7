// src/error.rs
// =============================================================================
// Error types shared by the crawl, extract and download modules.
//
// Only InvalidJob and Config stop the program. Everything else is logged by
// the crawler and the crawl moves on to the next page or file.
// =============================================================================

use std::error::Error as _;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CrawlError {
    /// The job parameters were rejected before any request was made
    #[error("invalid crawl job: {0}")]
    InvalidJob(String),

    /// Profile file could not be read/parsed, or a profile is unknown
    #[error("configuration error: {0}")]
    Config(String),

    /// Request never produced a response (DNS, connect, timeout, TLS...)
    #[error("{kind} while fetching {url}: {message}")]
    Network {
        url: String,
        kind: NetworkErrorKind,
        message: String,
    },

    /// Server answered with something other than 2xx
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    /// Page body could not be treated as HTML text
    #[error("could not parse {url}: {message}")]
    Parse { url: String, message: String },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Body length did not match Content-Length
    #[error("size mismatch for {url}: expected {expected} bytes, got {actual}")]
    SizeMismatch {
        url: String,
        expected: u64,
        actual: u64,
    },
}

// Coarse classification of transport failures, used in logs and the report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkErrorKind {
    Timeout,
    Dns,
    Connect,
    Tls,
    TooManyRedirects,
    Other,
}

impl std::fmt::Display for NetworkErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            NetworkErrorKind::Timeout => "timeout",
            NetworkErrorKind::Dns => "DNS error",
            NetworkErrorKind::Connect => "connection error",
            NetworkErrorKind::Tls => "TLS error",
            NetworkErrorKind::TooManyRedirects => "too many redirects",
            NetworkErrorKind::Other => "network error",
        };
        f.write_str(label)
    }
}

impl CrawlError {
    // Helper for wrapping std::io::Error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CrawlError::Io {
            path: path.into(),
            source,
        }
    }

    /// Categorizes a reqwest error into a Network or Status error.
    ///
    /// reqwest errors can happen for many reasons (timeouts, DNS failures,
    /// certificate problems, redirect loops), and the message text is the
    /// only place some of them show up.
    pub fn from_reqwest(url: &str, error: reqwest::Error) -> Self {
        if let Some(status) = error.status() {
            return CrawlError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            };
        }

        // Walk the whole source chain; the top-level message is often generic
        let mut message = error.to_string();
        let mut source = error.source();
        while let Some(inner) = source {
            message.push_str(": ");
            message.push_str(&inner.to_string());
            source = inner.source();
        }
        let lowered = message.to_lowercase();

        let kind = if error.is_timeout() {
            NetworkErrorKind::Timeout
        } else if error.is_redirect() {
            NetworkErrorKind::TooManyRedirects
        } else if lowered.contains("certificate") || lowered.contains("tls") {
            NetworkErrorKind::Tls
        } else if error.is_connect() {
            if lowered.contains("dns") || lowered.contains("resolve") {
                NetworkErrorKind::Dns
            } else {
                NetworkErrorKind::Connect
            }
        } else {
            NetworkErrorKind::Other
        };

        CrawlError::Network {
            url: url.to_string(),
            kind,
            message,
        }
    }
}
