use std::collections::HashSet;
use std::sync::LazyLock;

use itertools::Itertools;
use regex::Regex;
use scraper::{Html, Selector};

use super::text::stripped_text;
use crate::model::{MovieDetails, NOT_AVAILABLE};

static GENRE_CHIP: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a.ipc-chip span").unwrap());
static RUNTIME: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("li[data-testid='title-techspec_runtime']").unwrap());
static PLOT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span[data-testid='plot-l']").unwrap());
static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+h\s*\d*m?)").unwrap());
static DIRECTOR_LINK: LazyLock<Selector> = LazyLock::new(|| credit_selector(CreditRole::Director));
static WRITER_LINK: LazyLock<Selector> = LazyLock::new(|| credit_selector(CreditRole::Writer));
static ACTOR_LINK: LazyLock<Selector> = LazyLock::new(|| credit_selector(CreditRole::Actor));

/// Credit sections on the overview, keyed by the `ref_` marker in each link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreditRole {
    Director,
    Writer,
    Actor,
}

impl CreditRole {
    pub fn marker(self) -> &'static str {
        match self {
            CreditRole::Director => "tt_ov_1",
            CreditRole::Writer => "tt_ov_2",
            CreditRole::Actor => "tt_ov_3",
        }
    }

    fn selector(self) -> &'static Selector {
        match self {
            CreditRole::Director => &DIRECTOR_LINK,
            CreditRole::Writer => &WRITER_LINK,
            CreditRole::Actor => &ACTOR_LINK,
        }
    }
}

fn credit_selector(role: CreditRole) -> Selector {
    Selector::parse(&format!("a[href*='{}']", role.marker())).unwrap()
}

/// Pull the enrichment fields out of a detail page. Each field falls back on
/// its own; a missing node never affects the others.
pub fn extract_details(doc: &Html) -> MovieDetails {
    MovieDetails {
        genres: genres(doc).join(", "),
        duration: duration(doc),
        directors: credits(doc, CreditRole::Director).into_iter().join(", "),
        writers: credits(doc, CreditRole::Writer).into_iter().join(", "),
        actors: credits(doc, CreditRole::Actor).into_iter().join(", "),
        plot: doc
            .select(&PLOT)
            .next()
            .map(stripped_text)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
    }
}

/// Genre chip labels in page order.
pub fn genres(doc: &Html) -> Vec<String> {
    doc.select(&GENRE_CHIP).map(stripped_text).collect()
}

/// First "2h 22m"-style match inside the runtime item, else "N/A".
pub fn duration(doc: &Html) -> String {
    doc.select(&RUNTIME)
        .next()
        .map(stripped_text)
        .and_then(|text| DURATION_RE.find(&text).map(|m| m.as_str().to_string()))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Names linked under one credit section. Unordered.
pub fn credits(doc: &Html, role: CreditRole) -> HashSet<String> {
    doc.select(role.selector()).map(stripped_text).collect()
}
