// src/config/job.rs
// =============================================================================
// CrawlJob: everything one invocation of the crawler needs to know.
//
// A job is validated once, up front, and never changes afterwards. The crawl
// loop only ever reads from it.
// =============================================================================

use super::profile::SiteProfile;
use crate::error::CrawlError;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// What to do with a candidate whose duration could not be estimated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum UnknownDurationPolicy {
    /// Download it anyway (only the extension check applies)
    #[default]
    Include,
    /// Skip it
    Exclude,
}

/// Tunables with sensible defaults; the start URL and profile are separate
#[derive(Debug, Clone)]
pub struct JobOptions {
    pub max_pages: usize,
    pub download_dir: PathBuf,
    /// Minimum duration in seconds (compared with >=)
    pub min_duration: u64,
    pub unknown_duration: UnknownDurationPolicy,
    pub page_timeout: Duration,
    pub download_timeout: Duration,
    /// Pause after every page; manual pacing, 0 disables it
    pub delay: Duration,
}

impl Default for JobOptions {
    fn default() -> Self {
        Self {
            max_pages: 10,
            download_dir: PathBuf::from("./videos"),
            min_duration: 0,
            unknown_duration: UnknownDurationPolicy::Include,
            page_timeout: Duration::from_secs(10),
            download_timeout: Duration::from_secs(300),
            delay: Duration::from_millis(100),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CrawlJob {
    start_url: Url,
    profile: SiteProfile,
    options: JobOptions,
}

impl CrawlJob {
    /// Validates the inputs and builds a job.
    ///
    /// Rejects URLs that don't parse, aren't http(s), or have no host, and a
    /// page budget of zero.
    pub fn new(start_url: &str, profile: SiteProfile, options: JobOptions) -> Result<Self, CrawlError> {
        let start_url = Url::parse(start_url)
            .map_err(|e| CrawlError::InvalidJob(format!("invalid URL '{}': {}", start_url, e)))?;

        if start_url.scheme() != "http" && start_url.scheme() != "https" {
            return Err(CrawlError::InvalidJob(format!(
                "unsupported scheme '{}' (only http and https)",
                start_url.scheme()
            )));
        }

        if start_url.host_str().is_none() {
            return Err(CrawlError::InvalidJob(format!("URL has no host: {}", start_url)));
        }

        if options.max_pages == 0 {
            return Err(CrawlError::InvalidJob(
                "max pages must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            start_url,
            profile,
            options,
        })
    }

    pub fn start_url(&self) -> &Url {
        &self.start_url
    }

    pub fn profile(&self) -> &SiteProfile {
        &self.profile
    }

    pub fn max_pages(&self) -> usize {
        self.options.max_pages
    }

    pub fn download_dir(&self) -> &Path {
        &self.options.download_dir
    }

    pub fn min_duration(&self) -> u64 {
        self.options.min_duration
    }

    pub fn unknown_duration(&self) -> UnknownDurationPolicy {
        self.options.unknown_duration
    }

    pub fn page_timeout(&self) -> Duration {
        self.options.page_timeout
    }

    pub fn download_timeout(&self) -> Duration {
        self.options.download_timeout
    }

    pub fn delay(&self) -> Duration {
        self.options.delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(url: &str, options: JobOptions) -> Result<CrawlJob, CrawlError> {
        CrawlJob::new(url, SiteProfile::builtin(), options)
    }

    #[test]
    fn test_defaults() {
        let job = job("https://example.com/videos", JobOptions::default()).unwrap();
        assert_eq!(job.max_pages(), 10);
        assert_eq!(job.download_dir(), Path::new("./videos"));
        assert_eq!(job.min_duration(), 0);
        assert_eq!(job.unknown_duration(), UnknownDurationPolicy::Include);
        assert_eq!(job.start_url().as_str(), "https://example.com/videos");
    }

    #[test]
    fn test_rejects_garbage_url() {
        let result = job("not a url", JobOptions::default());
        assert!(matches!(result, Err(CrawlError::InvalidJob(_))));
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let result = job("ftp://example.com/file.mp4", JobOptions::default());
        assert!(matches!(result, Err(CrawlError::InvalidJob(_))));
    }

    #[test]
    fn test_rejects_zero_pages() {
        let options = JobOptions {
            max_pages: 0,
            ..JobOptions::default()
        };
        assert!(matches!(
            job("https://example.com", options),
            Err(CrawlError::InvalidJob(_))
        ));
    }
}
