use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use plotly::common::{Font, Marker, Mode, Orientation, Title};
use plotly::layout::Axis;
use plotly::{Bar, Histogram, Layout, Plot, Scatter};
use tracing::info;

const IMDB_YELLOW: &str = "#F5C518";
const DARK_BACKGROUND: &str = "#111111";
const DARK_FOREGROUND: &str = "#f2f5fa";

pub const RATINGS_FILE: &str = "chart_ratings.html";
pub const DECADES_FILE: &str = "chart_decades.html";
pub const GENRES_FILE: &str = "chart_genres.html";
pub const RATING_VOTES_FILE: &str = "chart_rating_votes.html";

/// One exported row after numeric coercion. Unparseable numbers are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRow {
    pub title: String,
    pub year: Option<f64>,
    pub rating: Option<f64>,
    pub votes: Option<f64>,
    pub genres: Option<String>,
}

impl ChartRow {
    /// 1994 -> 1990.
    pub fn decade(&self) -> Option<i64> {
        self.year.map(|y| (y / 10.0).floor() as i64 * 10)
    }
}

#[derive(Debug, Default)]
pub struct ChartTable {
    pub rows: Vec<ChartRow>,
}

fn to_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

impl ChartTable {
    pub fn load(path: &Path) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        let headers = reader.headers()?.clone();
        let col = |name: &str| headers.iter().position(|h| h == name);
        let (title, year, rating, votes, genres) =
            (col("title"), col("year"), col("rating"), col("votes"), col("genres"));

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result.with_context(|| format!("Malformed row in {}", path.display()))?;
            let get = |i: Option<usize>| i.and_then(|i| record.get(i));
            rows.push(ChartRow {
                title: get(title).unwrap_or_default().to_string(),
                year: get(year).and_then(to_number),
                rating: get(rating).and_then(to_number),
                votes: get(votes).and_then(to_number),
                genres: get(genres).filter(|g| !g.is_empty()).map(str::to_string),
            });
        }
        Ok(ChartTable { rows })
    }

    pub fn ratings(&self) -> Vec<f64> {
        self.rows.iter().filter_map(|r| r.rating).collect()
    }

    /// Count per decade, decades ascending. Rows without a year are skipped.
    pub fn decade_counts(&self) -> BTreeMap<i64, usize> {
        let mut counts = BTreeMap::new();
        for decade in self.rows.iter().filter_map(ChartRow::decade) {
            *counts.entry(decade).or_insert(0) += 1;
        }
        counts
    }

    /// Most frequent individual genres, highest first. Ties keep first-seen order.
    pub fn top_genres(&self, n: usize) -> Vec<(String, usize)> {
        let mut order: Vec<(String, usize)> = Vec::new();
        let mut slot: HashMap<String, usize> = HashMap::new();

        let names = self
            .rows
            .iter()
            .filter_map(|r| r.genres.as_deref())
            .flat_map(|g| g.split(','))
            .map(str::trim)
            .filter(|g| !g.is_empty());

        for name in names {
            match slot.get(name) {
                Some(&i) => order[i].1 += 1,
                None => {
                    slot.insert(name.to_string(), order.len());
                    order.push((name.to_string(), 1));
                }
            }
        }

        order.sort_by(|a, b| b.1.cmp(&a.1));
        order.truncate(n);
        order
    }

    /// (votes, rating, hover label) for rows that have both numbers.
    pub fn rating_votes_points(&self) -> Vec<(f64, f64, String)> {
        self.rows
            .iter()
            .filter_map(|r| {
                let (votes, rating) = (r.votes?, r.rating?);
                let year = r.year.map(|y| format!("{y:.0}")).unwrap_or_else(|| "N/A".into());
                Some((votes, rating, format!("{} ({})", r.title, year)))
            })
            .collect()
    }
}

fn dark_layout(title: &str, x_title: &str, y_title: &str) -> Layout {
    Layout::new()
        .title(Title::with_text(title))
        .x_axis(Axis::new().title(Title::with_text(x_title)))
        .y_axis(Axis::new().title(Title::with_text(y_title)))
        .paper_background_color(DARK_BACKGROUND)
        .plot_background_color(DARK_BACKGROUND)
        .font(Font::new().color(DARK_FOREGROUND))
        .show_legend(false)
}

fn save(plot: &Plot, dir: &Path, file: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    let path = dir.join(file);
    fs::write(&path, plot.to_html())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Saved: {}", file);
    Ok(path)
}

pub fn chart_ratings_distribution(table: &ChartTable, dir: &Path) -> Result<PathBuf> {
    let mut plot = Plot::new();
    plot.add_trace(
        Histogram::new(table.ratings())
            .n_bins_x(10)
            .marker(Marker::new().color(IMDB_YELLOW)),
    );
    plot.set_layout(dark_layout(
        "IMDb Top Movies - Rating Distribution",
        "IMDb Rating",
        "Number of Movies",
    ));
    save(&plot, dir, RATINGS_FILE)
}

pub fn chart_movies_by_decade(table: &ChartTable, dir: &Path) -> Result<PathBuf> {
    let (decades, counts): (Vec<i64>, Vec<usize>) = table.decade_counts().into_iter().unzip();
    let mut plot = Plot::new();
    plot.add_trace(Bar::new(decades, counts).marker(Marker::new().color(IMDB_YELLOW)));
    plot.set_layout(dark_layout("Top Movies by Decade", "Decade", "Number of Movies"));
    save(&plot, dir, DECADES_FILE)
}

pub fn chart_top_genres(table: &ChartTable, dir: &Path) -> Result<PathBuf> {
    // horizontal bars stack bottom-up, so feed least frequent first
    let (genres, counts): (Vec<String>, Vec<usize>) =
        table.top_genres(10).into_iter().rev().unzip();
    let mut plot = Plot::new();
    plot.add_trace(
        Bar::new(counts, genres)
            .orientation(Orientation::Horizontal)
            .marker(Marker::new().color(IMDB_YELLOW)),
    );
    plot.set_layout(dark_layout(
        "Most Common Genres in Top Movies",
        "Number of Movies",
        "Genre",
    ));
    save(&plot, dir, GENRES_FILE)
}

pub fn chart_rating_vs_votes(table: &ChartTable, dir: &Path) -> Result<PathBuf> {
    let points = table.rating_votes_points();
    let votes: Vec<f64> = points.iter().map(|p| p.0).collect();
    let ratings: Vec<f64> = points.iter().map(|p| p.1).collect();
    let labels: Vec<String> = points.into_iter().map(|p| p.2).collect();

    let mut plot = Plot::new();
    plot.add_trace(
        Scatter::new(votes, ratings)
            .mode(Mode::Markers)
            .text_array(labels)
            .marker(Marker::new().size(12).color(IMDB_YELLOW)),
    );
    plot.set_layout(dark_layout(
        "Rating vs Popularity (Votes)",
        "Number of Votes",
        "IMDb Rating",
    ));
    save(&plot, dir, RATING_VOTES_FILE)
}

/// Reload the exported table and write all four charts into `dir`.
pub fn create_all_charts(input: &Path, dir: &Path) -> Result<Vec<PathBuf>> {
    println!("Loading data...");
    let table = ChartTable::load(input)?;
    println!("Loaded {} movies\n", table.rows.len());
    info!("Rendering charts from {}", input.display());

    println!("Creating charts...");
    let written = vec![
        chart_ratings_distribution(&table, dir)?,
        chart_movies_by_decade(&table, dir)?,
        chart_top_genres(&table, dir)?,
        chart_rating_vs_votes(&table, dir)?,
    ];

    println!("\nAll charts saved to {}", dir.display());
    Ok(written)
}
