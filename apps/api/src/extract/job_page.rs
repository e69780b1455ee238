//! Job description retrieval from a posting URL.

use std::time::Duration;

use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::{info, warn};

use crate::extract::ExtractError;

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(20);

/// Extracted text shorter than this is treated as a failed extraction.
pub const MIN_EXTRACTED_CHARS: usize = 200;

/// Containers tried in order; the first with enough text wins.
const CONTENT_SELECTORS: &[&str] = &["main", "article", "[role='main']", "body"];

/// Client used for job page fetches. Shared via `AppState`.
pub fn build_page_client() -> Result<Client, ExtractError> {
    Ok(Client::builder()
        .user_agent(USER_AGENT)
        .timeout(FETCH_TIMEOUT)
        .build()?)
}

/// Downloads a job posting and returns its readable text.
///
/// Falls back to the raw HTML when no container yields at least
/// `MIN_EXTRACTED_CHARS` characters.
pub async fn fetch_job_description(client: &Client, url: &str) -> Result<String, ExtractError> {
    info!("Fetching job description from {}", url);

    let html = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    match extract_readable_text(&html) {
        Some(text) => Ok(text),
        None => {
            warn!("Readable text extraction failed for {}, using raw HTML", url);
            Ok(html)
        }
    }
}

/// Visible text of the first content container long enough to be a description.
pub fn extract_readable_text(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    CONTENT_SELECTORS
        .iter()
        .filter_map(|s| Selector::parse(s).ok())
        .filter_map(|selector| document.select(&selector).next().map(visible_text))
        .find(|text| text.chars().count() > MIN_EXTRACTED_CHARS)
}

/// Text nodes under `element`, skipping script and style content.
fn visible_text(element: ElementRef<'_>) -> String {
    let raw = element
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let parent_tag = node
                .parent()
                .and_then(|p| p.value().as_element().map(|e| e.name().to_string()));
            match parent_tag.as_deref() {
                Some("script") | Some("style") | Some("noscript") => None,
                _ => Some(text.to_string()),
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    clean_text(&raw)
}

fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
