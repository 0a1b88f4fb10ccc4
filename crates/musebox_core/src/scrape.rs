//! Best-effort web page title scraping for the add-URL/add-video flows.
//!
//! # Invariants
//! - Never part of a correctness path: every failure maps to `None`.
//! - Network work is timeout-bounded so a slow host cannot hang a capture
//!   flow indefinitely.

use std::time::Duration;

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

const FETCH_TIMEOUT: Duration = Duration::from_secs(5);
const MAX_TITLE_CHARS: usize = 200;

static TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("valid title regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Fetches `url` and extracts the page title.
///
/// Returns `None` on any network, status or parse failure.
pub fn fetch_page_title(url: &str) -> Option<String> {
    let client = reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .ok()?;

    let response = match client.get(url).send() {
        Ok(response) => response,
        Err(err) => {
            debug!("event=title_scrape module=scrape status=degraded url={url} error={err}");
            return None;
        }
    };

    if !response.status().is_success() {
        debug!(
            "event=title_scrape module=scrape status=degraded url={url} http_status={}",
            response.status()
        );
        return None;
    }

    let body = response.text().ok()?;
    extract_title(&body)
}

/// Extracts and normalizes the `<title>` text from an HTML document.
pub fn extract_title(html: &str) -> Option<String> {
    let raw = TITLE_RE
        .captures(html)
        .and_then(|caps| caps.get(1).map(|m| m.as_str()))?;

    let decoded = decode_basic_entities(raw);
    let normalized = WHITESPACE_RE.replace_all(&decoded, " ");
    let trimmed = normalized.trim();
    if trimmed.is_empty() {
        return None;
    }

    Some(trimmed.chars().take(MAX_TITLE_CHARS).collect())
}

/// Decodes the handful of entities that commonly appear in titles.
fn decode_basic_entities(value: &str) -> String {
    value
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
}
