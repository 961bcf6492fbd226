//! REST Countries API client
//!
//! Issues the four lookups the application needs (by alpha code, name,
//! capital and region) and parses the JSON array each endpoint returns.

use reqwest::{Client, Url};
use thiserror::Error;
use tracing::debug;

use super::{Country, Region};

/// Base URL for the REST Countries API
pub const DEFAULT_BASE_URL: &str = "https://restcountries.com/v3.1";

/// Errors that can occur when querying the countries API
#[derive(Debug, Error)]
pub enum CountriesError {
    /// The configured base URL cannot have path segments appended
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// HTTP request failed or returned a non-success status
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Client for the REST Countries API
#[derive(Debug, Clone)]
pub struct CountriesClient {
    client: Client,
    base_url: String,
}

impl Default for CountriesClient {
    fn default() -> Self {
        Self::new()
    }
}

impl CountriesClient {
    /// Create a new CountriesClient pointing at the public API
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Create a new CountriesClient with a custom base URL
    ///
    /// Used for self-hosted mirrors and for pointing tests at a mock server.
    pub fn with_base_url(base_url: &str) -> Result<Self, CountriesError> {
        let url =
            Url::parse(base_url).map_err(|e| CountriesError::InvalidBaseUrl(e.to_string()))?;
        if url.cannot_be_a_base() {
            return Err(CountriesError::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self {
            client: Client::new(),
            base_url: url.to_string(),
        })
    }

    /// Returns the base URL requests are built from
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the countries matching an alpha code (`GET /alpha/{code}`)
    pub async fn fetch_by_code(&self, code: &str) -> Result<Vec<Country>, CountriesError> {
        self.fetch_countries("alpha", code).await
    }

    /// Fetch the countries whose name matches `term` (`GET /name/{term}`)
    pub async fn fetch_by_name(&self, term: &str) -> Result<Vec<Country>, CountriesError> {
        self.fetch_countries("name", term).await
    }

    /// Fetch the countries whose capital matches `term` (`GET /capital/{term}`)
    pub async fn fetch_by_capital(&self, term: &str) -> Result<Vec<Country>, CountriesError> {
        self.fetch_countries("capital", term).await
    }

    /// Fetch all countries in a region (`GET /region/{region}`)
    pub async fn fetch_by_region(&self, region: Region) -> Result<Vec<Country>, CountriesError> {
        self.fetch_countries("region", region.as_str()).await
    }

    /// Builds `{base}/{kind}/{term}` with `term` as a single encoded segment
    fn endpoint(&self, kind: &str, term: &str) -> Result<Url, CountriesError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| CountriesError::InvalidBaseUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| CountriesError::InvalidBaseUrl(self.base_url.clone()))?
            .pop_if_empty()
            .push(kind)
            .push(term);
        Ok(url)
    }

    async fn fetch_countries(&self, kind: &str, term: &str) -> Result<Vec<Country>, CountriesError> {
        let url = self.endpoint(kind, term)?;
        debug!(%url, "requesting countries");

        let response = self.client.get(url).send().await?.error_for_status()?;
        let text = response.text().await?;
        let countries: Vec<Country> = serde_json::from_str(&text)?;

        debug!(kind, term, count = countries.len(), "countries received");
        Ok(countries)
    }
}
