// src/download/naming.rs
// =============================================================================
// Deterministic file names for downloaded videos.
//
// Name = <slug>-<hash>.<ext>
//   slug: readable part taken from the last URL path segment
//   hash: first 16 hex chars of SHA-256 over the full URL
//
// The same URL always maps to the same name (a re-run finds the file and
// skips it) and two different URLs never share one, even when both end in
// "video.mp4".
// =============================================================================

use sha2::{Digest, Sha256};
use url::Url;

const MAX_SLUG_CHARS: usize = 48;
const HASH_HEX_CHARS: usize = 16;

pub fn file_name_for(url: &str, extension: &str) -> String {
    let digest = Sha256::digest(url.as_bytes());
    let hash = hex::encode(digest);
    format!("{}-{}.{}", slug_for(url), &hash[..HASH_HEX_CHARS], extension)
}

fn slug_for(url: &str) -> String {
    let last_segment = Url::parse(url)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|mut segments| segments.next_back().map(str::to_string))
        })
        .unwrap_or_default();

    // Drop the extension, if any
    let stem = match last_segment.rsplit_once('.') {
        Some((stem, _)) => stem,
        None => last_segment.as_str(),
    };

    let mut slug = String::new();
    for c in stem.chars() {
        let c = if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '-' };
        // Collapse runs of separators
        if c == '-' && slug.ends_with('-') {
            continue;
        }
        slug.push(c);
        if slug.len() >= MAX_SLUG_CHARS {
            break;
        }
    }

    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        "video".to_string()
    } else {
        slug.to_string()
    }
}
