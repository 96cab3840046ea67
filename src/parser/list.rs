use std::sync::LazyLock;

use scraper::{ElementRef, Selector};

use super::text::stripped_text;
use crate::model::{MovieRecord, NOT_AVAILABLE};

static TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h3.ipc-title__text").unwrap());
static METADATA_ITEM: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span.cli-title-metadata-item").unwrap());
static RATING: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span.ipc-rating-star--rating").unwrap());
static VOTE_COUNT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span.ipc-rating-star--voteCount").unwrap());
static IMAGE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("img.ipc-image").unwrap());
static LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.ipc-title-link-wrapper").unwrap());

/// Everything visible for one entry on the list page. Never fails.
pub fn extract_basic(entry: ElementRef<'_>, base_url: &str) -> MovieRecord {
    let raw_title = first_text(entry, &TITLE);
    let year = first_text(entry, &METADATA_ITEM).unwrap_or_else(|| NOT_AVAILABLE.to_string());
    let rating = first_text(entry, &RATING).unwrap_or_else(|| NOT_AVAILABLE.to_string());
    let votes_raw = first_text(entry, &VOTE_COUNT).unwrap_or_else(|| NOT_AVAILABLE.to_string());

    let image_url = entry
        .select(&IMAGE)
        .next()
        .and_then(|img| img.value().attr("src"))
        .map(str::to_string)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    let detail_url = entry.select(&LINK).next().map(|a| {
        let href = a.value().attr("href").unwrap_or("");
        detail_url(base_url, href)
    });

    MovieRecord {
        title: clean_title(raw_title.as_deref().unwrap_or(NOT_AVAILABLE)),
        year,
        rating,
        votes: clean_votes(&votes_raw),
        image_url,
        detail_url,
        details: None,
    }
}

fn first_text(entry: ElementRef<'_>, selector: &Selector) -> Option<String> {
    entry.select(selector).next().map(stripped_text)
}

/// Drop the "N. " ranking prefix: "1. Cadena perpetua" -> "Cadena perpetua".
pub fn clean_title(raw: &str) -> String {
    if raw.is_empty() {
        return NOT_AVAILABLE.to_string();
    }
    match raw.split_once(". ") {
        Some((_, title)) => title.to_string(),
        None => raw.to_string(),
    }
}

/// "(3.2M)" -> 3_200_000, "(972K)" -> 972_000, "(1,234)" -> 1234.
///
/// Scaled values are truncated toward zero. "N/A", empty or unparseable
/// text is absent, never zero.
pub fn clean_votes(raw: &str) -> Option<u64> {
    if raw.is_empty() || raw == NOT_AVAILABLE {
        return None;
    }
    let cleaned = raw.replace(['(', ')'], "");
    let cleaned = cleaned.trim();

    if cleaned.contains('M') {
        return scaled(&cleaned.replace('M', ""), 1_000_000.0);
    }
    if cleaned.contains('K') {
        return scaled(&cleaned.replace('K', ""), 1_000.0);
    }
    cleaned.replace([',', '.'], "").parse::<u64>().ok()
}

fn scaled(number: &str, multiplier: f64) -> Option<u64> {
    let value = number.trim().replace(',', ".").parse::<f64>().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some((value * multiplier) as u64)
}

/// Absolute detail URL: query string dropped, site origin prefixed.
pub fn detail_url(base_url: &str, href: &str) -> String {
    let path = href.split('?').next().unwrap_or_default();
    format!("{}{}", base_url, path)
}
