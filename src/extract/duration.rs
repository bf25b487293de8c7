// src/extract/duration.rs
// =============================================================================
// Guessing how long a video is without downloading it.
//
// Sites show durations in all sorts of places: a data-duration attribute on
// the link, a "12:34" badge next to the thumbnail, "duration=754" in the URL,
// or a <meta itemprop="duration" content="PT12M34S"> tag for the whole page.
// estimate_duration() tries these in order and stops at the first hit.
//
// A guess can fail, and that's fine: the caller gets None and the crawl
// job's unknown-duration policy decides what happens next.
// =============================================================================

use crate::config::DurationHeuristic;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;
use url::Url;

struct TextPatterns {
    iso8601: Regex,
    hms: Regex,
    ms: Regex,
    hours_minutes: Regex,
    hours: Regex,
    minutes: Regex,
    seconds: Regex,
}

fn text_patterns() -> &'static TextPatterns {
    static PATTERNS: OnceLock<TextPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| TextPatterns {
        iso8601: Regex::new(r"(?i)^\s*PT?(?:(\d{1,7})H)?(?:(\d{1,7})M)?(?:(\d{1,7})(?:\.\d+)?S)?\s*$")
            .expect("valid regex"),
        hms: Regex::new(r"\b(\d{1,7}):([0-5]\d):([0-5]\d)\b").expect("valid regex"),
        ms: Regex::new(r"\b(\d{1,7}):([0-5]\d)\b").expect("valid regex"),
        hours_minutes: Regex::new(
            r"(?i)(\d{1,7})\s*(?:hours?|hrs?|h|小时)\s*(\d{1,7})\s*(?:minutes?|mins?|m|分钟|分)",
        )
        .expect("valid regex"),
        hours: Regex::new(r"(?i)(\d{1,7})\s*(?:hours?|hrs?|h|小时)\b").expect("valid regex"),
        minutes: Regex::new(r"(?i)(\d{1,7})\s*(?:minutes?|mins?|m|分钟|分)\b").expect("valid regex"),
        seconds: Regex::new(r"(?i)(\d{1,7})\s*(?:seconds?|secs?|s|秒)\b").expect("valid regex"),
    })
}

struct UrlPatterns {
    explicit: Regex,
    minutes: Regex,
}

fn url_patterns() -> &'static UrlPatterns {
    static PATTERNS: OnceLock<UrlPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| UrlPatterns {
        explicit: Regex::new(r"(?i)(?:duration|dur|length)[=_-](\d{1,7})").expect("valid regex"),
        minutes: Regex::new(r"(?i)(\d{1,7})[-_]?min(?:s|utes?)?\b").expect("valid regex"),
    })
}

fn number(caps: &regex::Captures, index: usize) -> Option<u64> {
    caps.get(index).and_then(|m| m.as_str().parse::<u64>().ok())
}

// Zero is as good as unknown
fn non_zero(seconds: u64) -> Option<u64> {
    (seconds > 0).then_some(seconds)
}

/// Parses free-form duration text into seconds.
///
/// Understands "1:02:03", "12:34", "1h 20m", "2 hours", "45 min", "30s",
/// ISO-8601 "PT1H2M3S", and the 小时/分钟/秒 units.
pub fn parse_duration_text(text: &str) -> Option<u64> {
    let p = text_patterns();

    if let Some(caps) = p.iso8601.captures(text) {
        if caps.get(1).is_some() || caps.get(2).is_some() || caps.get(3).is_some() {
            let total = number(&caps, 1).unwrap_or(0) * 3600
                + number(&caps, 2).unwrap_or(0) * 60
                + number(&caps, 3).unwrap_or(0);
            return non_zero(total);
        }
    }

    if let Some(caps) = p.hms.captures(text) {
        return non_zero(number(&caps, 1)? * 3600 + number(&caps, 2)? * 60 + number(&caps, 3)?);
    }

    if let Some(caps) = p.ms.captures(text) {
        return non_zero(number(&caps, 1)? * 60 + number(&caps, 2)?);
    }

    if let Some(caps) = p.hours_minutes.captures(text) {
        return non_zero(number(&caps, 1)? * 3600 + number(&caps, 2)? * 60);
    }

    if let Some(caps) = p.hours.captures(text) {
        return non_zero(number(&caps, 1)? * 3600);
    }

    if let Some(caps) = p.minutes.captures(text) {
        return non_zero(number(&caps, 1)? * 60);
    }

    if let Some(caps) = p.seconds.captures(text) {
        return non_zero(number(&caps, 1)?);
    }

    None
}

// Attribute values: a bare integer means seconds
fn parse_attribute_value(value: &str) -> Option<u64> {
    let value = value.trim();
    if !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()) {
        return value.parse::<u64>().ok().and_then(non_zero);
    }
    parse_duration_text(value)
}

/// Looks for a duration hint in the URL's path and query.
///
/// "duration=754", "dur_754", "length-754" are seconds; "12min", "12-mins"
/// are minutes.
pub fn duration_from_url(url: &str) -> Option<u64> {
    // The host and port are never duration hints
    let haystack = match Url::parse(url) {
        Ok(parsed) => match parsed.query() {
            Some(query) => format!("{}?{}", parsed.path(), query),
            None => parsed.path().to_string(),
        },
        Err(_) => url.to_string(),
    };

    let p = url_patterns();
    if let Some(caps) = p.explicit.captures(&haystack) {
        return number(&caps, 1).and_then(non_zero);
    }
    if let Some(caps) = p.minutes.captures(&haystack) {
        return number(&caps, 1).map(|m| m * 60).and_then(non_zero);
    }
    None
}

/// Page-wide duration from schema.org / Open Graph metadata
pub fn page_duration(document: &Html) -> Option<u64> {
    let itemprop = Selector::parse(r#"meta[itemprop="duration"][content]"#).ok()?;
    for meta in document.select(&itemprop) {
        if let Some(seconds) = meta.value().attr("content").and_then(parse_attribute_value) {
            return Some(seconds);
        }
    }

    let og = Selector::parse(
        r#"meta[property="video:duration"][content], meta[property="og:video:duration"][content]"#,
    )
    .ok()?;
    document
        .select(&og)
        .filter_map(|meta| meta.value().attr("content"))
        .find_map(parse_attribute_value)
}

fn element_text(element: &ElementRef) -> String {
    element.text().collect::<Vec<_>>().join(" ")
}

// True when `container` also holds a video element other than `element`.
// Text that high up may describe a neighbour instead of this video.
fn holds_other_video(container: &ElementRef, element: &ElementRef, videos: &[ElementRef]) -> bool {
    let id = container.id();
    videos
        .iter()
        .filter(|other| *other != element)
        .any(|other| other.id() == id || other.ancestors().any(|node| node.id() == id))
}

/// Estimates a candidate's duration in seconds.
///
/// Order: the element's duration attributes, the element's own text, the
/// text of up to `ancestor_depth` ancestors, the URL (if `scan_url`), and
/// finally `page_fallback`, which the caller only passes when the page has
/// a single candidate and `page_metadata` is on.
///
/// `videos` are the page's video elements. The ancestor walk stops at the
/// first ancestor that contains one of them besides `element`, so a listing
/// never lends one clip's badge to its neighbours.
pub fn estimate_duration(
    element: &ElementRef,
    url: &str,
    heuristic: &DurationHeuristic,
    videos: &[ElementRef],
    page_fallback: Option<u64>,
) -> Option<u64> {
    for attr in &heuristic.attributes {
        if let Some(seconds) = element.value().attr(attr).and_then(parse_attribute_value) {
            return Some(seconds);
        }
    }

    if let Some(seconds) = parse_duration_text(&element_text(element)) {
        return Some(seconds);
    }

    for ancestor in element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .take(heuristic.ancestor_depth)
    {
        if holds_other_video(&ancestor, element, videos) {
            break;
        }
        if let Some(seconds) = parse_duration_text(&element_text(&ancestor)) {
            return Some(seconds);
        }
    }

    if heuristic.scan_url {
        if let Some(seconds) = duration_from_url(url) {
            return Some(seconds);
        }
    }

    page_fallback
}
