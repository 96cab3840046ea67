use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, InvalidHeaderValue, USER_AGENT};
use reqwest::StatusCode;
use scraper::Html;
use thiserror::Error;
use tracing::debug;

use crate::settings::Settings;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to fetch page. Status code: {status} ({url})")]
    Status { url: String, status: u16 },
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error("invalid User-Agent header value")]
    Header(#[from] InvalidHeaderValue),
}

/// Anything that can hand back the raw body of a page.
pub trait PageSource {
    fn get(&self, url: &str) -> Result<String, FetchError>;
}

/// Blocking HTTP source. One client, one fixed header set, no timeout.
pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    pub fn new(settings: &Settings) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_str(&settings.user_agent)?);
        let client = Client::builder()
            .default_headers(headers)
            .timeout(None::<std::time::Duration>)
            .build()?;
        Ok(HttpSource { client })
    }
}

impl PageSource for HttpSource {
    fn get(&self, url: &str) -> Result<String, FetchError> {
        debug!("GET {}", url);
        let response = self.client.get(url).send()?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.text()?)
    }
}

/// Fetch a page and parse it into a document. Never cached.
pub fn fetch_page(source: &dyn PageSource, url: &str) -> Result<Html, FetchError> {
    let body = source.get(url)?;
    Ok(Html::parse_document(&body))
}
