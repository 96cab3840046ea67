pub mod detail;
pub mod list;
pub mod text;

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

static LIST_ENTRY: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("li.ipc-metadata-list-summary-item").unwrap());

/// All ranked entries on the list page, in page order.
pub fn list_entries(doc: &Html) -> Vec<ElementRef<'_>> {
    doc.select(&LIST_ENTRY).collect()
}

