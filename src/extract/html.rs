// src/extract/html.rs
// =============================================================================
// This module pulls two things out of an HTML page:
//
// 1. Candidates: URLs that might be videos, found with the site profile's
//    (selector, attribute) pairs, with a title and a duration guess attached
// 2. Site links: same-site <a href> targets the crawler may visit next
//
// Both resolve relative URLs against the page URL and only keep http(s).
// The document is parsed once per page; scan_page() does both passes.
// =============================================================================

use super::duration::{estimate_duration, page_duration};
use super::video::video_extension;
use super::Candidate;
use crate::config::SiteProfile;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use url::Url;

const MAX_TITLE_CHARS: usize = 100;

// Attributes that usually carry a human-readable name for the video
const TITLE_ATTRIBUTES: &[&str] = &["title", "alt", "data-title"];

/// Everything the crawler needs from one page
#[derive(Debug, Default)]
pub struct PageScan {
    pub candidates: Vec<Candidate>,
    pub links: Vec<String>,
}

/// Parses a page once and extracts both candidates and same-site links
pub fn scan_page(html: &str, page_url: &str, seed: &Url, profile: &SiteProfile) -> PageScan {
    let base = match Url::parse(page_url) {
        Ok(url) => url,
        Err(_) => return PageScan::default(),
    };
    let document = Html::parse_document(html);

    PageScan {
        candidates: candidates_in(&document, &base, profile),
        links: site_links_in(&document, &base, seed),
    }
}

/// Extracts video candidates from HTML content
///
/// Example:
///   html = "<a href='/c.mkv' data-duration='700'>C</a>"
///   page_url = "https://example.com/list"
///   result = [Candidate { url: "https://example.com/c.mkv", duration: Some(700), .. }]
pub fn extract_candidates(html: &str, page_url: &str, profile: &SiteProfile) -> Vec<Candidate> {
    let base = match Url::parse(page_url) {
        Ok(url) => url,
        Err(_) => return Vec::new(),
    };
    let document = Html::parse_document(html);
    candidates_in(&document, &base, profile)
}

/// Extracts same-site links (absolute, fragment stripped, deduplicated)
pub fn extract_site_links(html: &str, page_url: &str, seed: &Url) -> Vec<String> {
    let base = match Url::parse(page_url) {
        Ok(url) => url,
        Err(_) => return Vec::new(),
    };
    let document = Html::parse_document(html);
    site_links_in(&document, &base, seed)
}

fn candidates_in(document: &Html, base: &Url, profile: &SiteProfile) -> Vec<Candidate> {
    // First pass: collect (url, element) in document order, one per URL
    let mut seen = HashSet::new();
    let mut found: Vec<(String, ElementRef)> = Vec::new();

    for rule in &profile.selectors {
        for element in document.select(&rule.selector) {
            let Some(value) = element.value().attr(&rule.attribute) else {
                continue;
            };
            let Some(url) = resolve_link(base, value) else {
                continue;
            };
            if seen.insert(url.clone()) {
                found.push((url, element));
            }
        }
    }

    // Page-level metadata only says something about a page with one video
    let fallback = if profile.duration.page_metadata && found.len() == 1 {
        page_duration(document)
    } else {
        None
    };

    let videos: Vec<ElementRef> = found
        .iter()
        .filter(|(url, _)| video_extension(url, &profile.extensions).is_some())
        .map(|(_, element)| *element)
        .collect();

    let source_page = base.to_string();
    found
        .iter()
        .map(|(url, element)| Candidate {
            title: extract_title(element),
            duration: estimate_duration(element, url, &profile.duration, &videos, fallback),
            extension: video_extension(url, &profile.extensions),
            source_page: source_page.clone(),
            url: url.clone(),
        })
        .collect()
}

fn site_links_in(document: &Html, base: &Url, seed: &Url) -> Vec<String> {
    // Constant selector, known to be valid
    let selector = Selector::parse("a[href]").unwrap();

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let Some(absolute) = resolve_link(base, href) else {
            continue;
        };
        let Ok(parsed) = Url::parse(&absolute) else {
            continue;
        };
        if is_same_site(&parsed, seed) && seen.insert(absolute.clone()) {
            links.push(absolute);
        }
    }

    links
}

/// Same host, and same explicit port (if any). The scheme may differ so an
/// http seed still follows its https pages.
pub fn is_same_site(url: &Url, seed: &Url) -> bool {
    url.host_str() == seed.host_str() && url.port() == seed.port()
}

// Resolves a link (possibly relative) to an absolute http(s) URL with the
// fragment removed. Returns None for anchors, special protocols and junk.
fn resolve_link(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty()
        || href.starts_with('#')
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("javascript:")
        || href.starts_with("data:")
    {
        return None;
    }

    let mut url = base.join(href).ok()?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }
    url.set_fragment(None);
    Some(url.to_string())
}

// Picks the first non-empty title source, whitespace collapsed
fn extract_title(element: &ElementRef) -> Option<String> {
    let from_attrs = TITLE_ATTRIBUTES
        .iter()
        .filter_map(|attr| element.value().attr(attr))
        .map(collapse_whitespace)
        .find(|t| !t.is_empty());

    let title = match from_attrs {
        Some(t) => t,
        None => collapse_whitespace(&element.text().collect::<Vec<_>>().join(" ")),
    };

    if title.is_empty() {
        None
    } else {
        Some(title.chars().take(MAX_TITLE_CHARS).collect())
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed() -> Url {
        Url::parse("https://example.com/").unwrap()
    }

    #[test]
    fn test_candidates_resolved_and_classified() {
        let html = r#"
            <a href="a.mp4">A</a>
            <a href="b.txt">B</a>
            <a href="/media/c.mkv" data-duration="700">C</a>
        "#;
        let profile = SiteProfile::builtin();
        let candidates = extract_candidates(html, "https://example.com/list/", &profile);

        assert_eq!(candidates.len(), 3);
        assert_eq!(candidates[0].url, "https://example.com/list/a.mp4");
        assert_eq!(candidates[0].extension.as_deref(), Some("mp4"));
        assert_eq!(candidates[0].duration, None);
        assert_eq!(candidates[1].extension, None);
        assert_eq!(candidates[2].url, "https://example.com/media/c.mkv");
        assert_eq!(candidates[2].duration, Some(700));
        assert_eq!(candidates[2].source_page, "https://example.com/list/");
    }

    #[test]
    fn test_video_tags_are_candidates() {
        let html = r#"
            <video src="/v/one.webm"></video>
            <video><source src="/v/two.mp4"></video>
        "#;
        let candidates = extract_candidates(html, "https://example.com/", &SiteProfile::builtin());
        let urls: Vec<_> = candidates.iter().map(|c| c.url.as_str()).collect();
        assert!(urls.contains(&"https://example.com/v/one.webm"));
        assert!(urls.contains(&"https://example.com/v/two.mp4"));
    }

    #[test]
    fn test_duplicate_candidates_collapsed() {
        let html = r#"<a href="/x.mp4">one</a><a href="/x.mp4#t=5">two</a>"#;
        let candidates = extract_candidates(html, "https://example.com/", &SiteProfile::builtin());
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].title.as_deref(), Some("one"));
    }

    #[test]
    fn test_listing_badges_stay_with_their_clip() {
        let html = r#"<ul>
            <li><a href="/a.mp4">First clip</a></li>
            <li><a href="/b.txt">Notes</a></li>
            <li><a href="/c.mkv">Long clip</a> <span>11:40</span></li>
        </ul>"#;
        let candidates = extract_candidates(html, "https://example.com/", &SiteProfile::builtin());
        assert_eq!(candidates[0].duration, None);
        assert_eq!(candidates[2].duration, Some(700));
    }

    #[test]
    fn test_title_prefers_attribute() {
        let html = r#"<a href="/x.mp4" title="  My   Clip ">click</a>"#;
        let candidates = extract_candidates(html, "https://example.com/", &SiteProfile::builtin());
        assert_eq!(candidates[0].title.as_deref(), Some("My Clip"));
    }

    #[test]
    fn test_single_candidate_uses_page_metadata() {
        let html = r#"<html><head><meta itemprop="duration" content="PT10M"></head>
            <body><video src="/only.mp4"></video></body></html>"#;
        let candidates = extract_candidates(html, "https://example.com/watch", &SiteProfile::builtin());
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].duration, Some(600));
    }

    #[test]
    fn test_site_links_same_host_only() {
        let html = r##"
            <a href="/page2">Next</a>
            <a href="https://other.com/x">Other</a>
            <a href="#top">Top</a>
            <a href="mailto:me@example.com">Mail</a>
            <a href="/page2#comments">Again</a>
        "##;
        let links = extract_site_links(html, "https://example.com/page1", &seed());
        assert_eq!(links, vec!["https://example.com/page2"]);
    }

    #[test]
    fn test_same_site_port_and_scheme() {
        let seed = Url::parse("http://127.0.0.1:8080/").unwrap();
        assert!(is_same_site(&Url::parse("http://127.0.0.1:8080/a").unwrap(), &seed));
        assert!(!is_same_site(&Url::parse("http://127.0.0.1:9090/a").unwrap(), &seed));

        let seed = Url::parse("http://example.com/").unwrap();
        assert!(is_same_site(&Url::parse("https://example.com/a").unwrap(), &seed));
    }

    #[test]
    fn test_resolve_link_skips_special() {
        let base = Url::parse("https://example.com/page").unwrap();
        assert_eq!(resolve_link(&base, "javascript:void(0)"), None);
        assert_eq!(resolve_link(&base, "tel:123"), None);
        assert_eq!(resolve_link(&base, "ftp://example.com/a.mp4"), None);
        assert_eq!(
            resolve_link(&base, "../docs"),
            Some("https://example.com/docs".to_string())
        );
    }

    #[test]
    fn test_scan_page_does_both() {
        let html = r#"<a href="/next">n</a><a href="/v.mp4">v</a>"#;
        let scan = scan_page(html, "https://example.com/", &seed(), &SiteProfile::builtin());
        assert_eq!(scan.candidates.len(), 2);
        assert_eq!(scan.links.len(), 2);
    }
}
