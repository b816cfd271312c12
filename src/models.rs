//! Data models for USGS earthquake GeoJSON feeds.
//!
//! Only the fields the map reads are modelled; everything else in the
//! feed is ignored by serde.

use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

use crate::errors::QuakemapError;

/// Top-level GeoJSON response from USGS feeds.
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureCollection {
    /// Always "FeatureCollection"
    #[serde(rename = "type")]
    pub type_: String,

    /// Feed metadata (absent in hand-written files)
    #[serde(default)]
    pub metadata: Option<Metadata>,

    /// Earthquake events
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    /// Validate the response structure.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not a `FeatureCollection`.
    pub fn validate(&self) -> Result<(), QuakemapError> {
        if self.type_ != "FeatureCollection" {
            return Err(QuakemapError::InvalidResponse(format!(
                "expected type 'FeatureCollection', got '{}'",
                self.type_
            )));
        }
        Ok(())
    }
}

/// Metadata about the feed response.
#[derive(Debug, Clone, Deserialize)]
pub struct Metadata {
    /// Human-readable title
    pub title: String,

    /// Number of events in response
    pub count: usize,
}

/// A single earthquake event.
#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    /// USGS event ID
    #[serde(default)]
    pub id: Option<String>,

    /// Geographic location
    pub geometry: Geometry,

    /// Event properties; `null` or missing in malformed feeds
    #[serde(default)]
    pub properties: Option<Properties>,
}

impl Feature {
    /// Check that the feature can be drawn as a marker.
    ///
    /// # Errors
    ///
    /// Returns an error if properties are missing or the geometry has no
    /// latitude/longitude pair.
    pub fn validate(&self) -> Result<(), QuakemapError> {
        if self.properties.is_none() {
            return Err(QuakemapError::Validation(format!(
                "feature {} has no properties",
                self.label()
            )));
        }
        if self.geometry.coordinates.len() < 2 {
            return Err(QuakemapError::Validation(format!(
                "feature {}: expected at least 2 coordinates, got {}",
                self.label(),
                self.geometry.coordinates.len()
            )));
        }
        Ok(())
    }

    /// Event time as a `DateTime<Utc>`.
    #[must_use]
    pub fn time(&self) -> Option<DateTime<Utc>> {
        self.properties
            .as_ref()
            .and_then(|p| p.time)
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
    }

    /// Magnitude, if the feature has one.
    #[must_use]
    pub fn magnitude(&self) -> Option<f64> {
        self.properties.as_ref().and_then(|p| p.mag)
    }

    /// Place description, if the feature has one.
    #[must_use]
    pub fn place(&self) -> Option<&str> {
        self.properties.as_ref().and_then(|p| p.place.as_deref())
    }

    #[must_use]
    pub fn longitude(&self) -> Option<f64> {
        self.geometry.coordinates.first().copied()
    }

    #[must_use]
    pub fn latitude(&self) -> Option<f64> {
        self.geometry.coordinates.get(1).copied()
    }

    /// Depth in kilometers (positive down), the third coordinate.
    #[must_use]
    pub fn depth_km(&self) -> Option<f64> {
        self.geometry.coordinates.get(2).copied()
    }

    /// Identifier used in log and error messages.
    fn label(&self) -> &str {
        self.id.as_deref().unwrap_or("<unnamed>")
    }
}

/// Geographic geometry for an event.
#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    /// Coordinates: [longitude, latitude, depth_km]
    pub coordinates: Vec<f64>,
}

/// Event properties from the USGS feed.
#[derive(Debug, Clone, Deserialize)]
pub struct Properties {
    /// Human-readable place description
    pub place: Option<String>,

    /// Event time (ms since epoch); missing or null in some feeds
    #[serde(default)]
    pub time: Option<i64>,

    /// Magnitude value
    pub mag: Option<f64>,

    /// Magnitude type (mb, Ml, Mw, etc.)
    #[serde(rename = "magType", default)]
    pub mag_type: Option<String>,

    /// Event page URL
    #[serde(default)]
    pub url: Option<String>,
}
