// src/crawl/filter.rs
// =============================================================================
// The download decision for a single candidate.
//
// A candidate is downloaded only if:
//   - its URL is a video file (extension in the profile's set), AND
//   - its duration is known and >= the minimum, OR unknown and the job's
//     policy is Include
// =============================================================================

use crate::config::{CrawlJob, UnknownDurationPolicy};
use crate::extract::{is_video_file, Candidate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NotVideo,
    TooShort { duration: u64, min: u64 },
    UnknownDuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Download,
    Skip(SkipReason),
}

pub fn evaluate(candidate: &Candidate, job: &CrawlJob) -> Verdict {
    if !is_video_file(&candidate.url, &job.profile().extensions) {
        return Verdict::Skip(SkipReason::NotVideo);
    }

    match candidate.duration {
        Some(duration) if duration >= job.min_duration() => Verdict::Download,
        Some(duration) => Verdict::Skip(SkipReason::TooShort {
            duration,
            min: job.min_duration(),
        }),
        None => match job.unknown_duration() {
            UnknownDurationPolicy::Include => Verdict::Download,
            UnknownDurationPolicy::Exclude => Verdict::Skip(SkipReason::UnknownDuration),
        },
    }
}
