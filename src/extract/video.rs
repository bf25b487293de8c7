// src/extract/video.rs
// =============================================================================
// Deciding whether a URL points at a video file.
//
// Only the URL path counts: "clip.mp4?token=abc" is a video, while
// "player.php?file=clip.mp4" is not (the server decides what that returns).
//
// is_page_url() answers the opposite question for the crawler: could this
// link be another HTML page worth a slot in the page budget?
// =============================================================================

use url::Url;

// File extensions servers use for generated or static HTML
const PAGE_EXTENSIONS: &[&str] = &[
    "html", "htm", "xhtml", "shtml", "php", "asp", "aspx", "jsp", "cfm",
];

// Returns the matching extension (lowercase, no dot) if the URL path ends
// with one of `extensions`
pub fn video_extension(url: &str, extensions: &[String]) -> Option<String> {
    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_lowercase(),
        // Not absolute; strip query and fragment by hand
        Err(_) => url
            .split(|c| c == '?' || c == '#')
            .next()
            .unwrap_or_default()
            .to_lowercase(),
    };

    extensions
        .iter()
        .find(|ext| {
            let suffix = format!(".{}", ext.to_lowercase());
            match path.strip_suffix(&suffix) {
                // Needs a file name in front of the dot
                Some(stem) => !stem.is_empty() && !stem.ends_with('/'),
                None => false,
            }
        })
        .map(|ext| ext.to_lowercase())
}

pub fn is_video_file(url: &str, extensions: &[String]) -> bool {
    video_extension(url, extensions).is_some()
}

/// True when the URL's last path segment has no extension or a page one.
///
/// "/videos/", "/watch?v=1" and "/list.php" are pages; "/b.txt",
/// "/cover.jpg" and "/a.mp4" are files and never cost a page fetch.
pub fn is_page_url(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    let last = parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default()
        .to_lowercase();

    match last.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => PAGE_EXTENSIONS.contains(&ext),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exts() -> Vec<String> {
        ["mp4", "mkv", "webm"].iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_plain_video_url() {
        assert_eq!(
            video_extension("https://cdn.example.com/v/a.mp4", &exts()),
            Some("mp4".to_string())
        );
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        assert!(is_video_file("https://example.com/MOVIE.MKV", &exts()));
    }

    #[test]
    fn test_query_string_ignored() {
        assert!(is_video_file("https://example.com/a.webm?token=123", &exts()));
        assert!(!is_video_file("https://example.com/play?file=a.mp4", &exts()));
    }

    #[test]
    fn test_non_video_extension() {
        assert!(!is_video_file("https://example.com/b.txt", &exts()));
        assert!(!is_video_file("https://example.com/mp4", &exts()));
    }

    #[test]
    fn test_relative_path() {
        assert!(is_video_file("/media/c.mkv#t=10", &exts()));
    }

    #[test]
    fn test_bare_dot_extension_is_not_a_file_name() {
        assert!(!is_video_file("https://example.com/.mp4", &exts()));
    }

    #[test]
    fn test_page_urls() {
        assert!(is_page_url("https://example.com/"));
        assert!(is_page_url("https://example.com/videos/latest"));
        assert!(is_page_url("https://example.com/list.php?page=2"));
        assert!(is_page_url("https://example.com/about.HTML"));
        assert!(is_page_url("https://example.com/.well-known"));
        assert!(!is_page_url("https://example.com/b.txt"));
        assert!(!is_page_url("https://example.com/cover.jpg"));
        assert!(!is_page_url("https://example.com/a.mp4?dl=1"));
    }
}
