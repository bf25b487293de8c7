// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - Breadth-first crawling starting from a URL
// - Same-site restriction (doesn't crawl external sites)
// - Page budget (--max-pages)
// - Extension/duration filter deciding which videos get downloaded
// =============================================================================

mod fetch;
mod filter;
mod queue;

pub use fetch::{build_client, fetch_page};
pub use filter::{evaluate, SkipReason, Verdict};
pub use queue::crawl;
