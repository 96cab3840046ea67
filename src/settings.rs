use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment};
use serde::Deserialize;

pub const TOP_CHART_URL: &str = "https://www.imdb.com/chart/top/";
pub const SITE_ORIGIN: &str = "https://www.imdb.com";
pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Everything the scraper and chart renderer would otherwise hardcode.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub list_url: String,
    /// Prefixed to relative detail links found on the list page.
    pub base_url: String,
    pub user_agent: String,
    /// Pause after every detail fetch. Unconditional; 0 disables it.
    pub courtesy_delay_ms: u64,
    pub limit: Option<usize>,
    pub include_details: bool,
    pub csv_path: PathBuf,
    pub chart_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            list_url: TOP_CHART_URL.to_string(),
            base_url: SITE_ORIGIN.to_string(),
            user_agent: BROWSER_USER_AGENT.to_string(),
            courtesy_delay_ms: 1000,
            limit: None,
            include_details: true,
            csv_path: PathBuf::from("data/processed/imdb_top_movies_detailed.csv"),
            chart_dir: PathBuf::from("data/processed"),
        }
    }
}

impl Settings {
    /// Compiled defaults overlaid with `IMDB_*` environment variables.
    pub fn load() -> Result<Self> {
        Config::builder()
            .add_source(Environment::with_prefix("IMDB").try_parsing(true))
            .build()
            .and_then(|c| c.try_deserialize::<Settings>())
            .context("Failed to load settings")
    }

    pub fn courtesy_delay(&self) -> Duration {
        Duration::from_millis(self.courtesy_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_top_chart() {
        let s = Settings::default();
        assert_eq!(s.list_url, "https://www.imdb.com/chart/top/");
        assert_eq!(s.base_url, "https://www.imdb.com");
        assert_eq!(s.courtesy_delay(), Duration::from_secs(1));
        assert!(s.include_details);
        assert!(s.limit.is_none());
    }
}
