//! USGS earthquake feed loader.
//!
//! Provides blocking HTTP access to USGS summary feeds and reading of
//! saved feed files. Uses reqwest with rustls for TLS.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::Client;
use tracing::{debug, instrument};

use crate::errors::QuakemapError;
use crate::models::FeatureCollection;

/// Default request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// User agent string for API requests.
const USER_AGENT: &str = concat!("quakemap/", env!("CARGO_PKG_VERSION"));

/// USGS base URL for earthquake feeds.
const USGS_BASE_URL: &str = "https://earthquake.usgs.gov";

/// Available feed types for summary feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedType {
    AllHour,
    AllDay,
    AllWeek,
    AllMonth,
    Mag1Hour,
    Mag1Day,
    Mag1Week,
    Mag1Month,
    Mag25Hour,
    Mag25Day,
    Mag25Week,
    Mag25Month,
    Mag45Hour,
    Mag45Day,
    Mag45Week,
    #[default]
    Mag45Month,
    SignificantHour,
    SignificantDay,
    SignificantWeek,
    SignificantMonth,
}

impl FeedType {
    const ALL: [Self; 20] = [
        Self::AllHour,
        Self::AllDay,
        Self::AllWeek,
        Self::AllMonth,
        Self::Mag1Hour,
        Self::Mag1Day,
        Self::Mag1Week,
        Self::Mag1Month,
        Self::Mag25Hour,
        Self::Mag25Day,
        Self::Mag25Week,
        Self::Mag25Month,
        Self::Mag45Hour,
        Self::Mag45Day,
        Self::Mag45Week,
        Self::Mag45Month,
        Self::SignificantHour,
        Self::SignificantDay,
        Self::SignificantWeek,
        Self::SignificantMonth,
    ];

    /// Get the URL path segment for this feed type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AllHour => "all_hour",
            Self::AllDay => "all_day",
            Self::AllWeek => "all_week",
            Self::AllMonth => "all_month",
            Self::Mag1Hour => "1.0_hour",
            Self::Mag1Day => "1.0_day",
            Self::Mag1Week => "1.0_week",
            Self::Mag1Month => "1.0_month",
            Self::Mag25Hour => "2.5_hour",
            Self::Mag25Day => "2.5_day",
            Self::Mag25Week => "2.5_week",
            Self::Mag25Month => "2.5_month",
            Self::Mag45Hour => "4.5_hour",
            Self::Mag45Day => "4.5_day",
            Self::Mag45Week => "4.5_week",
            Self::Mag45Month => "4.5_month",
            Self::SignificantHour => "significant_hour",
            Self::SignificantDay => "significant_day",
            Self::SignificantWeek => "significant_week",
            Self::SignificantMonth => "significant_month",
        }
    }
}

impl std::str::FromStr for FeedType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == wanted)
            .ok_or_else(|| format!("unknown feed type: {s}"))
    }
}

/// Client for USGS summary feeds.
///
/// Construction performs no I/O; the only request is made by
/// [`FeedClient::fetch_feed`].
pub struct FeedClient {
    client: Client,
    base_url: String,
}

impl FeedClient {
    /// Create a client for the public USGS host.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new() -> Result<Self, QuakemapError> {
        Self::with_base_url(USGS_BASE_URL)
    }

    /// Create a client for another host serving the same feed paths.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn with_base_url(base_url: &str) -> Result<Self, QuakemapError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Full URL of a summary feed.
    #[must_use]
    pub fn feed_url(&self, feed_type: FeedType) -> String {
        format!(
            "{}/earthquakes/feed/v1.0/summary/{}.geojson",
            self.base_url,
            feed_type.as_str()
        )
    }

    /// Fetch a summary GeoJSON feed with a single request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the status is not a success,
    /// or the response is not a GeoJSON `FeatureCollection`.
    #[instrument(skip(self), fields(feed = feed_type.as_str()))]
    pub fn fetch_feed(&self, feed_type: FeedType) -> Result<FeatureCollection, QuakemapError> {
        let url = self.feed_url(feed_type);

        debug!("fetching feed from {}", url);

        let response = self.client.get(&url).send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(QuakemapError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let feed: FeatureCollection = response.json()?;
        feed.validate()?;

        debug!("fetched {} events", feed.features.len());
        Ok(feed)
    }
}

/// Read a saved GeoJSON feed from disk.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a GeoJSON
/// `FeatureCollection`.
pub fn load_file(path: &Path) -> Result<FeatureCollection, QuakemapError> {
    debug!("reading feed from {}", path.display());
    let text = std::fs::read_to_string(path)?;
    let feed: FeatureCollection = serde_json::from_str(&text)?;
    feed.validate()?;
    Ok(feed)
}

/// Where features come from.
#[derive(Debug, Clone)]
pub enum FeedSource {
    /// A USGS summary feed, optionally on a mirror host
    Remote {
        feed: FeedType,
        base_url: Option<String>,
    },
    /// A GeoJSON file on disk
    File(PathBuf),
}

impl Default for FeedSource {
    fn default() -> Self {
        Self::Remote {
            feed: FeedType::default(),
            base_url: None,
        }
    }
}

impl FeedSource {
    /// Load the feature collection once.
    ///
    /// # Errors
    ///
    /// Returns any client, network, I/O or decoding error.
    pub fn load(&self) -> Result<FeatureCollection, QuakemapError> {
        match self {
            Self::Remote { feed, base_url } => {
                let client = match base_url {
                    Some(url) => FeedClient::with_base_url(url)?,
                    None => FeedClient::new()?,
                };
                client.fetch_feed(*feed)
            }
            Self::File(path) => load_file(path),
        }
    }

    /// Short description for logs and banners.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Remote { feed, .. } => format!("USGS {}", feed.as_str()),
            Self::File(path) => path.display().to_string(),
        }
    }
}
