// src/config/mod.rs
// =============================================================================
// Configuration: the crawl job built from CLI flags, and the site profiles
// loaded from YAML.
// =============================================================================

mod job;
mod profile;

pub use job::{CrawlJob, JobOptions, UnknownDurationPolicy};
pub use profile::{CandidateSelector, DurationHeuristic, ProfileSet, SiteProfile, DEFAULT_PROFILE};
