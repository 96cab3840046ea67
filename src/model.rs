/// Marker for string fields whose node was missing.
pub const NOT_AVAILABLE: &str = "N/A";

/// One ranked movie. Built from a list entry, optionally enriched once.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieRecord {
    pub title: String,
    pub year: String,
    pub rating: String,
    pub votes: Option<u64>,
    pub image_url: String,
    pub detail_url: Option<String>,
    pub details: Option<MovieDetails>,
}

/// Fields only found on a movie's own page, already rendered as text.
///
/// `directors`, `writers` and `actors` come from a de-duplicated set, so the
/// order of names inside each joined string is not deterministic.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MovieDetails {
    pub genres: String,
    pub duration: String,
    pub directors: String,
    pub writers: String,
    pub actors: String,
    pub plot: String,
}

impl MovieRecord {
    /// Attach the fields fetched from the movie's own page.
    pub fn merge_details(&mut self, details: MovieDetails) {
        self.details = Some(details);
    }
}
