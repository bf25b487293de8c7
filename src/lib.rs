// src/lib.rs
// =============================================================================
// vidcrawl: crawl a single site, find links to video files, estimate their
// duration, and download the ones that pass the filter.
//
// The binary (src/main.rs) is a thin layer over these modules.
// =============================================================================

pub mod cli;
pub mod config;
pub mod crawl;
pub mod download;
pub mod error;
pub mod extract;
pub mod report;
pub mod telemetry;

pub use config::{CrawlJob, JobOptions, ProfileSet, SiteProfile, UnknownDurationPolicy};
pub use crawl::crawl;
pub use error::CrawlError;
pub use report::CrawlReport;
