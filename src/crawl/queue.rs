// src/crawl/queue.rs
// =============================================================================
// This module implements the crawl itself, breadth-first from the start URL.
//
// How it works:
// 1. Start with the start URL in a queue
// 2. Fetch the page HTML
// 3. Extract video candidates and same-site links from the page
// 4. Filter the candidates and download the ones that pass, one at a time
// 5. Queue same-site page links (if not seen yet and the page budget allows);
//    links matching the profile's priority patterns go in a queue that is
//    always drained first
// 6. Repeat until both queues are empty or the page budget is spent
//
// Every failure (unreachable page, bad status, broken download) is logged,
// recorded in the report, and the crawl carries on. crawl() never fails.
//
// Politeness:
// - Optional fixed delay between pages (--delay-ms), nothing adaptive
// - Only crawls the start URL's site
// =============================================================================

use super::fetch::{build_client, fetch_page};
use super::filter::{evaluate, SkipReason, Verdict};
use crate::config::CrawlJob;
use crate::download::{download_candidate, Saved};
use crate::error::CrawlError;
use crate::extract::{is_page_url, scan_page, Candidate};
use crate::report::{CrawlReport, DownloadRecord, DownloadStatus, PageOutcome, PageRecord};
use reqwest::Client;
use std::collections::{HashSet, VecDeque};
use tracing::{debug, info, warn};

/// Crawls a site and downloads the qualifying videos it links to.
///
/// Visits at most `job.max_pages()` pages. Every fetch attempt counts
/// against the budget, including ones that fail.
pub async fn crawl(job: &CrawlJob) -> CrawlReport {
    let mut report = CrawlReport::new(job.start_url().as_str());

    let client = match build_client() {
        Ok(client) => client,
        Err(e) => {
            warn!(error = %e, "cannot start crawl");
            return report;
        }
    };

    let mut state = CrawlState::new(job);

    while let Some(url) = state.next_page() {
        state.pages_fetched += 1;
        info!(
            page = state.pages_fetched,
            max_pages = job.max_pages(),
            url = %url,
            "crawling"
        );

        let outcome = process_page(&client, job, &url, &mut state, &mut report).await;
        report.pages.push(PageRecord { url, outcome });

        // Manual pacing between pages; nothing to wait for after the last one
        if state.pending() > 0 && !job.delay().is_zero() {
            tokio::time::sleep(job.delay()).await;
        }
    }

    info!(
        pages = report.pages.len(),
        downloaded = report.downloaded(),
        already_present = report.already_present(),
        failed = report.download_failures(),
        "crawl finished"
    );

    report
}

// Everything the crawl loop mutates, owned by one crawl
struct CrawlState {
    // Pages matching the profile's priority patterns, visited first
    priority: VecDeque<String>,
    queue: VecDeque<String>,
    // URLs already queued or visited (exact string, fragment stripped)
    scheduled: HashSet<String>,
    // Candidate URLs already handled on an earlier page
    seen_candidates: HashSet<String>,
    pages_fetched: usize,
    max_pages: usize,
}

impl CrawlState {
    fn new(job: &CrawlJob) -> Self {
        let mut start = job.start_url().clone();
        start.set_fragment(None);
        let start = start.to_string();

        let mut scheduled = HashSet::new();
        scheduled.insert(start.clone());

        Self {
            priority: VecDeque::new(),
            queue: VecDeque::from([start]),
            scheduled,
            seen_candidates: HashSet::new(),
            pages_fetched: 0,
            max_pages: job.max_pages(),
        }
    }

    fn next_page(&mut self) -> Option<String> {
        self.priority.pop_front().or_else(|| self.queue.pop_front())
    }

    fn pending(&self) -> usize {
        self.priority.len() + self.queue.len()
    }

    // Pages fetched plus pages waiting; never let this exceed the budget
    fn has_budget(&self) -> bool {
        self.pages_fetched + self.pending() < self.max_pages
    }

    fn enqueue(&mut self, url: String, priority: bool) -> bool {
        if !self.has_budget() || self.scheduled.contains(&url) {
            return false;
        }
        self.scheduled.insert(url.clone());
        if priority {
            self.priority.push_back(url);
        } else {
            self.queue.push_back(url);
        }
        true
    }
}

// Fetch → extract → filter → save for a single page
async fn process_page(
    client: &Client,
    job: &CrawlJob,
    url: &str,
    state: &mut CrawlState,
    report: &mut CrawlReport,
) -> PageOutcome {
    let html = match fetch_page(client, url, job.page_timeout()).await {
        Ok(html) => html,
        Err(e @ CrawlError::Parse { .. }) => {
            warn!(url, error = %e, "page is not usable HTML, no candidates");
            return PageOutcome::Unparsable { error: e.to_string() };
        }
        Err(e) => {
            warn!(url, error = %e, "failed to fetch page, skipping");
            return PageOutcome::Failed { error: e.to_string() };
        }
    };

    let profile = job.profile();
    let scan = scan_page(&html, url, job.start_url(), profile);
    debug!(
        url,
        candidates = scan.candidates.len(),
        links = scan.links.len(),
        "page scanned"
    );

    let candidates = scan.candidates.len();
    let links = scan.links.len();

    for candidate in scan.candidates {
        handle_candidate(client, job, candidate, state, report).await;
    }

    // Priority links first, so they win the remaining budget
    let (preferred, others): (Vec<String>, Vec<String>) = scan
        .links
        .into_iter()
        .filter(|link| is_page_url(link) && profile.should_follow(link))
        .partition(|link| profile.is_priority(link));

    let mut queued = 0;
    for link in preferred {
        if state.enqueue(link, true) {
            queued += 1;
        }
    }
    for link in others {
        if state.enqueue(link, false) {
            queued += 1;
        }
    }
    if queued > 0 {
        debug!(url, queued, "queued same-site links");
    }

    PageOutcome::Fetched { candidates, links }
}

async fn handle_candidate(
    client: &Client,
    job: &CrawlJob,
    candidate: Candidate,
    state: &mut CrawlState,
    report: &mut CrawlReport,
) {
    // Repeated navigation links aren't worth counting, repeated videos are
    if !state.seen_candidates.insert(candidate.url.clone()) {
        if candidate.extension.is_some() {
            report.skipped.duplicate += 1;
        }
        return;
    }

    match evaluate(&candidate, job) {
        Verdict::Skip(reason) => {
            match reason {
                SkipReason::NotVideo => report.skipped.not_video += 1,
                SkipReason::TooShort { duration, min } => {
                    debug!(url = %candidate.url, duration, min, "too short, skipping");
                    report.skipped.too_short += 1;
                }
                SkipReason::UnknownDuration => {
                    debug!(url = %candidate.url, "unknown duration, skipping");
                    report.skipped.unknown_duration += 1;
                }
            }
        }
        Verdict::Download => {
            info!(
                url = %candidate.url,
                duration = ?candidate.duration,
                "downloading"
            );
            let status = match download_candidate(
                client,
                &candidate,
                job.download_dir(),
                job.download_timeout(),
            )
            .await
            {
                Ok(Saved::Downloaded { path, bytes }) => DownloadStatus::Downloaded { path, bytes },
                Ok(Saved::AlreadyPresent { path }) => DownloadStatus::AlreadyPresent { path },
                Err(e) => {
                    warn!(url = %candidate.url, error = %e, "download failed, skipping");
                    DownloadStatus::Failed { error: e.to_string() }
                }
            };

            report.downloads.push(DownloadRecord {
                url: candidate.url,
                title: candidate.title,
                duration: candidate.duration,
                status,
            });
        }
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why is the budget checked when queueing, not when popping?
//    - pages_fetched + queue.len() never exceeds max_pages, so every URL that
//      makes it into the queue will actually be fetched
//    - With max_pages = 1 the seed's links are still extracted (and counted
//      in the report) but none of them is ever queued
//
// 2. Why two queues?
//    - Listing sections (/videos/, /watch/...) hold most of a site's videos;
//      with a small budget they should not lose out to /about or /contact
//    - Within each queue the order is still breadth-first
//
// 3. Why sequential?
//    - One page, then each of its downloads, then the next page
//    - Keeps the load on the target site predictable; pacing is --delay-ms
// -----------------------------------------------------------------------------
