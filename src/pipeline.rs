use std::thread;

use tracing::{debug, info};

use crate::fetch::{fetch_page, FetchError, PageSource};
use crate::model::MovieRecord;
use crate::parser::{detail, list, list_entries};
use crate::settings::Settings;

/// Fetch the ranked list and build one record per entry, in ranking order.
///
/// With `include_details`, every entry that has a detail link costs one more
/// fetch followed by the courtesy delay. Any fetch failure aborts the run.
pub fn scrape_top_movies(
    source: &dyn PageSource,
    settings: &Settings,
) -> Result<Vec<MovieRecord>, FetchError> {
    println!("Fetching IMDb Top 250 list...");
    let doc = fetch_page(source, &settings.list_url)?;

    let mut entries = list_entries(&doc);
    println!("Found {} movies on list page", entries.len());

    if let Some(limit) = settings.limit {
        entries.truncate(limit);
        println!("Limiting to {} movies", limit);
    }

    let total = entries.len();
    let delay = settings.courtesy_delay();
    let mut movies = Vec::with_capacity(total);

    for (i, entry) in entries.into_iter().enumerate() {
        let mut movie = list::extract_basic(entry, &settings.base_url);

        match movie.detail_url.clone() {
            Some(url) if settings.include_details => {
                println!("[{}/{}] Fetching details for: {}", i + 1, total, movie.title);
                let page = fetch_page(source, &url)?;
                movie.merge_details(detail::extract_details(&page));

                if !delay.is_zero() {
                    debug!("Sleeping {:?} after {}", delay, url);
                    thread::sleep(delay);
                }
            }
            _ => println!("[{}/{}] {}", i + 1, total, movie.title),
        }

        movies.push(movie);
    }

    info!("Extracted {} movies", movies.len());
    println!("\nSuccessfully extracted {} movies", movies.len());
    Ok(movies)
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::fetch::testing::FixtureSource;

    const LIST: &str = "fixture://chart/top/";
    const SHAWSHANK: &str = "https://www.imdb.com/title/tt0111161/";
    const GODFATHER: &str = "https://www.imdb.com/title/tt0068646/";

    fn fixture(name: &str) -> String {
        std::fs::read_to_string(format!("tests/fixtures/{}.html", name)).unwrap()
    }

    fn source() -> FixtureSource {
        FixtureSource::default()
            .with_page(LIST, &fixture("top_list"))
            .with_page(SHAWSHANK, &fixture("title_tt0111161"))
            .with_page(GODFATHER, &fixture("title_tt0068646"))
    }

    fn settings(include_details: bool) -> Settings {
        Settings {
            list_url: LIST.to_string(),
            courtesy_delay_ms: 0,
            include_details,
            ..Settings::default()
        }
    }

    #[test]
    fn end_to_end_with_details() {
        let src = source();
        let movies = scrape_top_movies(&src, &settings(true)).unwrap();

        assert_eq!(movies.len(), 3);
        let titles: Vec<&str> = movies.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, ["The Shawshank Redemption", "The Godfather", "The Dark Knight"]);

        assert_eq!(movies[1].rating, "N/A");
        assert_eq!(movies[1].votes, Some(2_100_000));
        assert_eq!(movies[1].details.as_ref().unwrap().genres, "Crime, Drama");

        assert_eq!(movies[0].details.as_ref().unwrap().duration, "2h 22m");

        assert!(movies[2].detail_url.is_none());
        assert!(movies[2].details.is_none());

        // list page plus the two linked detail pages, nothing else
        assert_eq!(src.requested(), vec![LIST, SHAWSHANK, GODFATHER]);
    }

    #[test]
    fn details_disabled_fetches_only_the_list() {
        let src = source();
        // a sleep here would stall the test for a minute
        let s = Settings {
            courtesy_delay_ms: 60_000,
            ..settings(false)
        };
        let movies = scrape_top_movies(&src, &s).unwrap();

        assert_eq!(src.requested(), vec![LIST]);
        assert!(movies.iter().all(|m| m.details.is_none()));
        assert!(movies[0].detail_url.is_some());
    }

    #[test]
    fn courtesy_delay_after_each_detail_fetch() {
        let src = source();
        let s = Settings {
            courtesy_delay_ms: 20,
            ..settings(true)
        };
        let started = Instant::now();
        scrape_top_movies(&src, &s).unwrap();
        assert!(started.elapsed() >= Duration::from_millis(40));
    }

    #[test]
    fn limit_keeps_ranking_order() {
        let src = source();
        let s = Settings {
            limit: Some(2),
            ..settings(false)
        };
        let movies = scrape_top_movies(&src, &s).unwrap();
        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].title, "The Shawshank Redemption");
        assert_eq!(movies[1].title, "The Godfather");
    }

    #[test]
    fn limit_above_available_returns_all() {
        let src = source();
        let s = Settings {
            limit: Some(10),
            ..settings(false)
        };
        assert_eq!(scrape_top_movies(&src, &s).unwrap().len(), 3);
    }

    #[test]
    fn limit_also_bounds_detail_fetches() {
        let src = source();
        let s = Settings {
            limit: Some(1),
            ..settings(true)
        };
        scrape_top_movies(&src, &s).unwrap();
        assert_eq!(src.requested(), vec![LIST, SHAWSHANK]);
    }

    #[test]
    fn failed_detail_fetch_aborts_run() {
        let src = FixtureSource::default().with_page(LIST, &fixture("top_list"));
        let err = scrape_top_movies(&src, &settings(true)).unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 404, .. }));
    }

    #[test]
    fn failed_list_fetch_aborts_run() {
        let src = FixtureSource::default();
        assert!(scrape_top_movies(&src, &settings(false)).is_err());
    }
}
