// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
// =============================================================================

use crate::config::{JobOptions, UnknownDurationPolicy, DEFAULT_PROFILE};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "vidcrawl",
    version = "0.1.0",
    about = "Crawl a website and download the video files it links to",
    long_about = "vidcrawl visits pages of a single site, finds links to video files, \
                  estimates their duration and downloads the ones that pass the filter. \
                  Respecting robots.txt and pacing requests is up to you (see --delay-ms)."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl a site and download qualifying videos
    ///
    /// Example: vidcrawl crawl https://example.com/videos --max-pages 5 --min-duration 600
    Crawl(CrawlArgs),

    /// List the available site profiles
    ///
    /// Example: vidcrawl profiles --profiles sites.yaml
    Profiles {
        /// YAML file with extra site profiles
        #[arg(long)]
        profiles: Option<PathBuf>,
    },
}

#[derive(clap::Args, Debug)]
pub struct CrawlArgs {
    /// Page to start from (e.g., https://example.com/videos)
    pub start_url: String,

    /// Maximum number of pages to visit (the start page counts)
    #[arg(long, default_value_t = 10)]
    pub max_pages: usize,

    /// Directory the videos are saved into (created if missing)
    #[arg(long, short = 'o', default_value = "./videos")]
    pub output: PathBuf,

    /// Minimum video duration in seconds
    #[arg(long, default_value_t = 0)]
    pub min_duration: u64,

    /// What to do with videos whose duration can't be estimated
    #[arg(long, value_enum, default_value_t = UnknownDurationPolicy::Include)]
    pub unknown_duration: UnknownDurationPolicy,

    /// Site profile to use
    #[arg(long, default_value = DEFAULT_PROFILE)]
    pub profile: String,

    /// YAML file with extra site profiles
    #[arg(long)]
    pub profiles: Option<PathBuf>,

    /// Pause between pages in milliseconds (0 disables)
    #[arg(long, default_value_t = 100)]
    pub delay_ms: u64,

    /// Timeout for fetching a page, in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,

    /// Timeout for downloading one video, in seconds
    #[arg(long, default_value_t = 300)]
    pub download_timeout_secs: u64,

    /// Output the report in JSON format instead of a table
    #[arg(long)]
    pub json: bool,
}

impl CrawlArgs {
    pub fn job_options(&self) -> JobOptions {
        JobOptions {
            max_pages: self.max_pages,
            download_dir: self.output.clone(),
            min_duration: self.min_duration,
            unknown_duration: self.unknown_duration,
            page_timeout: Duration::from_secs(self.timeout_secs),
            download_timeout: Duration::from_secs(self.download_timeout_secs),
            delay: Duration::from_millis(self.delay_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crawl_defaults() {
        let cli = Cli::try_parse_from(["vidcrawl", "crawl", "https://example.com"]).unwrap();
        let Commands::Crawl(args) = cli.command else {
            panic!("expected crawl");
        };
        assert_eq!(args.start_url, "https://example.com");
        assert_eq!(args.max_pages, 10);
        assert_eq!(args.output, PathBuf::from("./videos"));
        assert_eq!(args.unknown_duration, UnknownDurationPolicy::Include);
        assert_eq!(args.profile, "default");
        assert!(!args.json);

        let options = args.job_options();
        assert_eq!(options.delay, Duration::from_millis(100));
        assert_eq!(options.page_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_crawl_flags() {
        let cli = Cli::try_parse_from([
            "vidcrawl",
            "crawl",
            "https://example.com",
            "--max-pages",
            "1",
            "-o",
            "out",
            "--min-duration",
            "600",
            "--unknown-duration",
            "exclude",
            "--json",
        ])
        .unwrap();
        let Commands::Crawl(args) = cli.command else {
            panic!("expected crawl");
        };
        assert_eq!(args.max_pages, 1);
        assert_eq!(args.output, PathBuf::from("out"));
        assert_eq!(args.min_duration, 600);
        assert_eq!(args.unknown_duration, UnknownDurationPolicy::Exclude);
        assert!(args.json);
    }

    #[test]
    fn test_bad_policy_rejected() {
        let result = Cli::try_parse_from([
            "vidcrawl",
            "crawl",
            "https://example.com",
            "--unknown-duration",
            "maybe",
        ]);
        assert!(result.is_err());
    }
}
