//! Target URL input handling.

use std::path::Path;

use anyhow::{Context, Result};
use log::warn;
use tokio::io::AsyncReadExt;

/// Maximum accepted URL length.
const MAX_URL_LENGTH: usize = 2048;

/// Validates and normalizes a target URL.
///
/// Adds an `https://` prefix when no scheme is given and requires an http(s)
/// URL with a host. Logs a warning and returns `None` for anything else.
pub fn validate_and_normalize_url(url: &str) -> Option<String> {
    let url = url.trim();
    let normalized = if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{url}")
    };

    if normalized.len() > MAX_URL_LENGTH {
        warn!(
            "Skipping URL exceeding maximum length ({} > {}): {}...",
            normalized.len(),
            MAX_URL_LENGTH,
            normalized.chars().take(50).collect::<String>()
        );
        return None;
    }

    match url::Url::parse(&normalized) {
        Ok(parsed) if parsed.host_str().is_some() => match parsed.scheme() {
            "http" | "https" => Some(parsed.to_string()),
            _ => {
                warn!("Skipping unsupported scheme for URL: {url}");
                None
            }
        },
        _ => {
            warn!("Skipping invalid URL: {url}");
            None
        }
    }
}

/// Parses a URL list: one URL per line, blank lines and `#` comments skipped.
///
/// Lines that fail normalization are kept verbatim so the batch records them
/// as failed items instead of dropping them silently.
pub fn parse_url_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| validate_and_normalize_url(line).unwrap_or_else(|| line.to_string()))
        .collect()
}

/// Reads a URL list from `path`, or from stdin when `path` is `-`.
pub async fn read_url_list(path: &Path) -> Result<Vec<String>> {
    let text = if path == Path::new("-") {
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .context("Failed to read URL list from stdin")?;
        text
    } else {
        tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read URL list: {}", path.display()))?
    };
    Ok(parse_url_list(&text))
}
