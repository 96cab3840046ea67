use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::model::{MovieDetails, MovieRecord};

/// Fields every record has, in export order.
pub const BASIC_COLUMNS: [&str; 6] = ["title", "year", "rating", "votes", "image_url", "detail_url"];
/// Fields only enriched records have, appended after the basic ones.
pub const DETAIL_COLUMNS: [&str; 6] = ["genres", "duration", "directors", "writers", "actors", "plot"];

/// Header row: basic fields always, detail fields once any record carries them.
pub fn columns_for(movies: &[MovieRecord]) -> Vec<&'static str> {
    let mut cols = BASIC_COLUMNS.to_vec();
    if movies.iter().any(|m| m.details.is_some()) {
        cols.extend(DETAIL_COLUMNS);
    }
    cols
}

/// Write records to `path`, replacing whatever was there. Absent values are
/// empty cells; there is no index column.
pub fn write_csv(movies: &[MovieRecord], path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    let columns = columns_for(movies);
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to open {} for writing", path.display()))?;
    writer.write_record(&columns)?;

    for movie in movies {
        let mut row = vec![
            movie.title.clone(),
            movie.year.clone(),
            movie.rating.clone(),
            movie.votes.map(|v| v.to_string()).unwrap_or_default(),
            movie.image_url.clone(),
            movie.detail_url.clone().unwrap_or_default(),
        ];
        if columns.len() > BASIC_COLUMNS.len() {
            let d = movie.details.clone().unwrap_or_default();
            row.extend([d.genres, d.duration, d.directors, d.writers, d.actors, d.plot]);
        }
        writer.write_record(&row)?;
    }

    writer.flush()?;
    info!("Wrote {} rows to {}", movies.len(), path.display());
    Ok(())
}

/// Reload a file written by [`write_csv`].
pub fn read_csv(path: &Path) -> Result<Vec<MovieRecord>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let headers = reader.headers()?.clone();
    let index = |name: &str| headers.iter().position(|h| h == name);
    let basic: Vec<Option<usize>> = BASIC_COLUMNS.iter().map(|&c| index(c)).collect();
    let detail: Vec<Option<usize>> = DETAIL_COLUMNS.iter().map(|&c| index(c)).collect();

    let mut movies = Vec::new();
    for result in reader.records() {
        let record = result.with_context(|| format!("Malformed row in {}", path.display()))?;
        let cell = |i: Option<usize>| -> String {
            i.and_then(|i| record.get(i)).unwrap_or_default().to_string()
        };
        let optional = |i: Option<usize>| Some(cell(i)).filter(|s| !s.is_empty());

        let d: Vec<String> = detail.iter().map(|&i| cell(i)).collect();
        let details = if d.iter().all(String::is_empty) {
            None
        } else {
            Some(MovieDetails {
                genres: d[0].clone(),
                duration: d[1].clone(),
                directors: d[2].clone(),
                writers: d[3].clone(),
                actors: d[4].clone(),
                plot: d[5].clone(),
            })
        };

        movies.push(MovieRecord {
            title: cell(basic[0]),
            year: cell(basic[1]),
            rating: cell(basic[2]),
            votes: optional(basic[3]).and_then(|v| v.parse().ok()),
            image_url: cell(basic[4]),
            detail_url: optional(basic[5]),
            details,
        });
    }
    Ok(movies)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn temp_csv(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("imdb_top_scraper_{}_{}", std::process::id(), name))
            .join("movies.csv")
    }

    fn shawshank() -> MovieRecord {
        MovieRecord {
            title: "The Shawshank Redemption".into(),
            year: "1994".into(),
            rating: "9.3".into(),
            votes: Some(3_000_000),
            image_url: "https://m.media-amazon.com/images/M/shawshank.jpg".into(),
            detail_url: Some("https://www.imdb.com/title/tt0111161/".into()),
            details: Some(MovieDetails {
                genres: "Epic, Drama".into(),
                duration: "2h 22m".into(),
                directors: "Frank Darabont".into(),
                writers: "Stephen King, Frank Darabont".into(),
                actors: "Tim Robbins, Morgan Freeman".into(),
                plot: "Two imprisoned men bond over a number of years, \"finding\" solace.".into(),
            }),
        }
    }

    fn dark_knight() -> MovieRecord {
        MovieRecord {
            title: "The Dark Knight".into(),
            year: "2008".into(),
            rating: "N/A".into(),
            votes: None,
            image_url: "N/A".into(),
            detail_url: None,
            details: None,
        }
    }

    #[test]
    fn columns_follow_first_seen_order() {
        assert_eq!(columns_for(&[dark_knight()]), BASIC_COLUMNS.to_vec());
        let cols = columns_for(&[dark_knight(), shawshank()]);
        assert_eq!(cols.len(), 12);
        assert_eq!(cols[0], "title");
        assert_eq!(cols[6], "genres");
        assert_eq!(cols[11], "plot");
    }

    #[test]
    fn round_trip_preserves_values() {
        let path = temp_csv("round_trip");
        let movies = vec![shawshank(), dark_knight()];
        write_csv(&movies, &path).unwrap();
        let loaded = read_csv(&path).unwrap();
        assert_eq!(loaded, movies);
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn header_and_empty_cells() {
        let path = temp_csv("header");
        write_csv(&[dark_knight()], &path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("title,year,rating,votes,image_url,detail_url"));
        assert_eq!(lines.next(), Some("The Dark Knight,2008,N/A,,N/A,"));
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn existing_file_is_overwritten() {
        let path = temp_csv("overwrite");
        write_csv(&[shawshank(), dark_knight()], &path).unwrap();
        write_csv(&[dark_knight()], &path).unwrap();
        assert_eq!(read_csv(&path).unwrap().len(), 1);
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
