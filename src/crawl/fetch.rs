// src/crawl/fetch.rs
// =============================================================================
// HTTP plumbing for the crawler: one shared client and page fetching.
//
// Failures come back as CrawlError so the crawl loop can log them and move
// on. Nothing here retries; a failed page is simply skipped.
// =============================================================================

use crate::error::CrawlError;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;

const MAX_REDIRECTS: usize = 5;

// Builds the client used for pages and downloads alike.
//
// Timeouts are set per request (pages and video files need very different
// ones), so the client itself only limits redirects.
pub fn build_client() -> Result<Client, CrawlError> {
    Client::builder()
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .build()
        .map_err(|e| CrawlError::Config(format!("cannot create HTTP client: {}", e)))
}

/// Fetches a web page and returns its HTML content.
///
/// Errors:
///   - Network: the request never got a response (DNS, refused, timeout...)
///   - Status: the server answered with a non-2xx code
///   - Parse: the body isn't a text/HTML document
pub async fn fetch_page(client: &Client, url: &str, timeout: Duration) -> Result<String, CrawlError> {
    let response = client
        .get(url)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| CrawlError::from_reqwest(url, e))?;

    if !response.status().is_success() {
        return Err(CrawlError::Status {
            url: url.to_string(),
            status: response.status().as_u16(),
        });
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_lowercase());
    if let Some(content_type) = &content_type {
        if !is_html_like(content_type) {
            return Err(CrawlError::Parse {
                url: url.to_string(),
                message: format!("not an HTML page (content-type {})", content_type),
            });
        }
    }

    response.text().await.map_err(|e| CrawlError::Parse {
        url: url.to_string(),
        message: format!("cannot decode body: {}", e),
    })
}

// Plain text, CSS and friends have no links worth scanning
fn is_html_like(content_type: &str) -> bool {
    let mime = content_type.split(';').next().unwrap_or_default().trim();
    mime == "text/html" || mime == "application/xhtml+xml"
}
