// src/report.rs
// =============================================================================
// The crawl summary: what was visited, what was saved, what was skipped.
//
// Printed either as a human-readable table or as JSON (--json), the same two
// output modes the rest of the CLI has always offered.
// =============================================================================

use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PageOutcome {
    Fetched { candidates: usize, links: usize },
    /// Body was fetched but couldn't be used as HTML; zero candidates
    Unparsable { error: String },
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRecord {
    pub url: String,
    #[serde(flatten)]
    pub outcome: PageOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DownloadStatus {
    Downloaded { path: PathBuf, bytes: u64 },
    AlreadyPresent { path: PathBuf },
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadRecord {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub duration: Option<u64>,
    #[serde(flatten)]
    pub status: DownloadStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SkipCounts {
    pub not_video: usize,
    pub too_short: usize,
    pub unknown_duration: usize,
    /// Seen on an earlier page of the same crawl
    pub duplicate: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrawlReport {
    pub start_url: String,
    pub pages: Vec<PageRecord>,
    pub downloads: Vec<DownloadRecord>,
    pub skipped: SkipCounts,
}

impl CrawlReport {
    pub fn new(start_url: &str) -> Self {
        Self {
            start_url: start_url.to_string(),
            pages: Vec::new(),
            downloads: Vec::new(),
            skipped: SkipCounts::default(),
        }
    }

    pub fn pages_failed(&self) -> usize {
        self.pages
            .iter()
            .filter(|p| !matches!(p.outcome, PageOutcome::Fetched { .. }))
            .count()
    }

    /// Candidates found across all fetched pages, duplicates included
    pub fn candidates_found(&self) -> usize {
        self.pages
            .iter()
            .map(|p| match p.outcome {
                PageOutcome::Fetched { candidates, .. } => candidates,
                _ => 0,
            })
            .sum()
    }

    pub fn downloaded(&self) -> usize {
        self.downloads
            .iter()
            .filter(|d| matches!(d.status, DownloadStatus::Downloaded { .. }))
            .count()
    }

    pub fn already_present(&self) -> usize {
        self.downloads
            .iter()
            .filter(|d| matches!(d.status, DownloadStatus::AlreadyPresent { .. }))
            .count()
    }

    pub fn download_failures(&self) -> usize {
        self.downloads
            .iter()
            .filter(|d| matches!(d.status, DownloadStatus::Failed { .. }))
            .count()
    }
}

// Prints the report either as a table or JSON
pub fn print_report(report: &CrawlReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print_table(report);
    }
    Ok(())
}

fn print_table(report: &CrawlReport) {
    println!("{:<60} {:<18} {:<30}", "URL", "STATUS", "DETAIL");
    println!("{}", "=".repeat(108));

    for page in &report.pages {
        let (status, detail) = match &page.outcome {
            PageOutcome::Fetched { candidates, links } => (
                "📄 PAGE",
                format!("{} candidates, {} links", candidates, links),
            ),
            PageOutcome::Unparsable { error } => ("⚠️  UNPARSABLE", error.clone()),
            PageOutcome::Failed { error } => ("❌ PAGE FAILED", error.clone()),
        };
        println!("{:<60} {:<18} {:<30}", truncate(&page.url), status, detail);
    }

    for download in &report.downloads {
        let (status, detail) = match &download.status {
            DownloadStatus::Downloaded { path, bytes } => {
                ("✅ SAVED", format!("{} ({} bytes)", path.display(), bytes))
            }
            DownloadStatus::AlreadyPresent { path } => {
                ("♻️  EXISTS", path.display().to_string())
            }
            DownloadStatus::Failed { error } => ("❌ FAILED", error.clone()),
        };
        println!("{:<60} {:<18} {:<30}", truncate(&download.url), status, detail);
    }

    println!();
    println!("📊 Summary:");
    println!("   📄 Pages visited: {} ({} failed)", report.pages.len(), report.pages_failed());
    println!("   🔎 Candidates found: {}", report.candidates_found());
    println!("   ✅ Downloaded: {}", report.downloaded());
    println!("   ♻️  Already present: {}", report.already_present());
    println!("   ❌ Download failures: {}", report.download_failures());
    println!(
        "   ⏭️  Skipped: {} not video, {} too short, {} unknown duration, {} duplicate",
        report.skipped.not_video,
        report.skipped.too_short,
        report.skipped.unknown_duration,
        report.skipped.duplicate
    );
}

// Keeps the table readable for long URLs
fn truncate(url: &str) -> String {
    if url.chars().count() > 57 {
        format!("{}...", url.chars().take(57).collect::<String>())
    } else {
        url.to_string()
    }
}
