// src/extract/mod.rs
// =============================================================================
// This module turns downloaded HTML into things the crawler can act on.
//
// Submodules:
// - html: candidate and same-site link extraction (scraper + url)
// - video: extension-based video file and page link detection
// - duration: duration estimation heuristics
// =============================================================================

mod duration;
mod html;
mod video;

use serde::Serialize;

pub use duration::{duration_from_url, estimate_duration, page_duration, parse_duration_text};
pub use html::{extract_candidates, extract_site_links, is_same_site, scan_page, PageScan};
pub use video::{is_page_url, is_video_file, video_extension};

/// A URL that may point at a video, waiting to be filtered.
///
/// Candidates only live while one page is processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Estimated duration in seconds, None when the guess failed
    pub duration: Option<u64>,
    /// Matched video extension, None when the URL isn't a known video file
    pub extension: Option<String>,
    pub source_page: String,
}
