// src/download/file.rs
// =============================================================================
// Writing one video to disk.
//
// The body is streamed into "<name>.part" and only renamed to its final name
// once every byte has arrived (and matches Content-Length when the server
// sent one). A final name on disk therefore always means a complete file,
// which is what lets a second run skip it.
// =============================================================================

use super::naming::file_name_for;
use crate::error::CrawlError;
use crate::extract::Candidate;
use futures::StreamExt;
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

// Used when a candidate somehow has no extension
const FALLBACK_EXTENSION: &str = "mp4";

/// What happened to a candidate that passed the filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Saved {
    Downloaded { path: PathBuf, bytes: u64 },
    /// A file for this exact URL was already in the directory
    AlreadyPresent { path: PathBuf },
}

/// Downloads a candidate into `dir`, creating the directory if needed
pub async fn download_candidate(
    client: &Client,
    candidate: &Candidate,
    dir: &Path,
    timeout: Duration,
) -> Result<Saved, CrawlError> {
    let extension = candidate.extension.as_deref().unwrap_or(FALLBACK_EXTENSION);
    let name = file_name_for(&candidate.url, extension);
    let path = dir.join(&name);

    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| CrawlError::io(dir, e))?;

    if tokio::fs::try_exists(&path)
        .await
        .map_err(|e| CrawlError::io(&path, e))?
    {
        debug!(url = %candidate.url, path = %path.display(), "already downloaded");
        return Ok(Saved::AlreadyPresent { path });
    }

    let part = dir.join(format!("{}.part", name));
    let (written, expected) = match fetch_to_file(client, &candidate.url, &part, timeout).await {
        Ok(counts) => counts,
        Err(e) => {
            // Leave nothing half-written behind; the error is what matters
            let _ = tokio::fs::remove_file(&part).await;
            return Err(e);
        }
    };

    let bytes = commit_part(&candidate.url, &part, &path, expected, written).await?;
    info!(url = %candidate.url, path = %path.display(), bytes, "saved");
    Ok(Saved::Downloaded { path, bytes })
}

// Streams the body into `part`. Returns (bytes written, Content-Length).
async fn fetch_to_file(
    client: &Client,
    url: &str,
    part: &Path,
    timeout: Duration,
) -> Result<(u64, Option<u64>), CrawlError> {
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

    let expected = response.content_length();
    let mut file = File::create(part)
        .await
        .map_err(|e| CrawlError::io(part, e))?;

    let mut written = 0u64;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| CrawlError::from_reqwest(url, e))?;
        file.write_all(&chunk)
            .await
            .map_err(|e| CrawlError::io(part, e))?;
        written += chunk.len() as u64;
    }
    file.flush().await.map_err(|e| CrawlError::io(part, e))?;

    Ok((written, expected))
}

/// Moves a finished `.part` file to its final name.
///
/// A body shorter or longer than the announced Content-Length is a
/// `SizeMismatch`; the `.part` file is removed and `target` never appears.
async fn commit_part(
    url: &str,
    part: &Path,
    target: &Path,
    expected: Option<u64>,
    written: u64,
) -> Result<u64, CrawlError> {
    let result = match expected {
        Some(expected) if expected != written => Err(CrawlError::SizeMismatch {
            url: url.to_string(),
            expected,
            actual: written,
        }),
        _ => tokio::fs::rename(part, target)
            .await
            .map_err(|e| CrawlError::io(target, e)),
    };

    if result.is_err() {
        let _ = tokio::fs::remove_file(part).await;
    }
    result.map(|()| written)
}
