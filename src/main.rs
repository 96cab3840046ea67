use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};
use tracing::info;

use imdb_top_scraper::model::MovieRecord;
use imdb_top_scraper::settings::Settings;
use imdb_top_scraper::{charts, export, fetch, pipeline};

#[derive(Parser)]
#[command(name = "imdb_top_scraper", about = "IMDb Top 250 scraper and chart renderer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the ranked list (and detail pages) and write the CSV
    Scrape {
        /// Only the first N entries of the list
        #[arg(short = 'n', long)]
        limit: Option<usize>,
        /// Skip the per-movie detail pages
        #[arg(long)]
        no_details: bool,
        /// Output CSV path
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Render the four charts from an exported CSV
    Charts {
        #[arg(short, long)]
        input: Option<PathBuf>,
        #[arg(short = 'd', long)]
        out_dir: Option<PathBuf>,
    },
    /// Print an exported CSV as a table
    Preview {
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let mut settings = Settings::load()?;
    info!(?settings, "Settings loaded");

    let result = match cli.command {
        Commands::Scrape { limit, no_details, out } => {
            if limit.is_some() {
                settings.limit = limit;
            }
            if no_details {
                settings.include_details = false;
            }
            if let Some(out) = out {
                settings.csv_path = out;
            }

            let source = fetch::HttpSource::new(&settings)?;
            let movies = pipeline::scrape_top_movies(&source, &settings)?;

            println!("\n=== Preview of scraped data ===\n");
            print_table(&movies, movies.len());

            export::write_csv(&movies, &settings.csv_path)?;
            println!("\nData saved to {}", settings.csv_path.display());
            Ok(())
        }
        Commands::Charts { input, out_dir } => {
            let input = input.unwrap_or(settings.csv_path);
            let out_dir = out_dir.unwrap_or(settings.chart_dir);
            charts::create_all_charts(&input, &out_dir)?;
            println!("Open the .html files in your browser to view them!");
            Ok(())
        }
        Commands::Preview { input, limit } => {
            let input = input.unwrap_or(settings.csv_path);
            let movies = export::read_csv(&input)?;
            if movies.is_empty() {
                println!("No movies in {}.", input.display());
                return Ok(());
            }
            print_table(&movies, limit);
            println!("\n{} movies | {}", movies.len(), input.display());
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn print_table(movies: &[MovieRecord], limit: usize) {
    println!(
        "{:>3} | {:<32} | {:<4} | {:>6} | {:>9} | {:<7} | {:<28}",
        "#", "Title", "Year", "Rating", "Votes", "Runtime", "Genres"
    );
    println!("{}", "-".repeat(106));

    for (i, m) in movies.iter().take(limit).enumerate() {
        let votes = m.votes.map(|v| v.to_string()).unwrap_or_else(|| "-".into());
        let (runtime, genres) = m
            .details
            .as_ref()
            .map(|d| (d.duration.as_str(), d.genres.as_str()))
            .unwrap_or(("-", "-"));

        println!(
            "{:>3} | {:<32} | {:<4} | {:>6} | {:>9} | {:<7} | {:<28}",
            i + 1,
            truncate(&m.title, 32),
            m.year,
            m.rating,
            votes,
            runtime,
            truncate(genres, 28)
        );
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
