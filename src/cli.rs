//! Command-line interface definitions.
//!
//! Uses clap derive API for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::client::{FeedSource, FeedType};
use crate::errors::QuakemapError;
use crate::filters::{BBox, EventFilter, LatLng};
use crate::map::{DEFAULT_ZOOM, MapConfig};
use crate::output::Format;
use crate::scale::{DEPTH_COLORS, DEPTH_THRESHOLDS_KM, DepthScale};

/// Render USGS earthquake feeds as an interactive map.
#[derive(Parser, Debug)]
#[command(name = "quakemap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Command to run
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose debug logging
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    pub quiet: bool,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch the feed once and write the map page
    Render(RenderArgs),

    /// Serve the map page, rebuilt on every load
    Serve(ServeArgs),

    /// Print the markers the map would draw
    Markers(MarkersArgs),

    /// Print the depth legend
    Legend(LegendArgs),
}

/// Where to read earthquakes from.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Feed type to fetch
    #[arg(long, default_value = "4.5_month", value_parser = parse_feed_type)]
    pub feed: FeedType,

    /// Read a saved GeoJSON feed instead of fetching
    #[arg(long, short = 'i', conflicts_with = "base_url")]
    pub input: Option<PathBuf>,

    /// Alternate host serving the USGS feed paths
    #[arg(long)]
    pub base_url: Option<String>,
}

impl SourceArgs {
    #[must_use]
    pub fn source(&self) -> FeedSource {
        match &self.input {
            Some(path) => FeedSource::File(path.clone()),
            None => FeedSource::Remote {
                feed: self.feed,
                base_url: self.base_url.clone(),
            },
        }
    }
}

/// Optional pre-filters; none are applied by default.
#[derive(Args, Debug, Clone)]
pub struct FilterArgs {
    /// Minimum magnitude to show
    #[arg(long)]
    pub min_magnitude: Option<f64>,

    /// Maximum depth in km to show
    #[arg(long)]
    pub max_depth: Option<f64>,

    /// Bounding box filter: minlat,minlon,maxlat,maxlon
    #[arg(long, value_parser = parse_bbox, allow_hyphen_values = true)]
    pub bbox: Option<BBox>,
}

impl FilterArgs {
    #[must_use]
    pub fn filter(&self) -> EventFilter {
        EventFilter {
            min_magnitude: self.min_magnitude,
            max_depth: self.max_depth,
            bbox: self.bbox,
        }
    }
}

/// Initial view of the map.
#[derive(Args, Debug, Clone)]
pub struct ViewArgs {
    /// Initial map center: lat,lon
    #[arg(long, value_parser = parse_center, allow_hyphen_values = true)]
    pub center: Option<LatLng>,

    /// Initial zoom level
    #[arg(long, default_value_t = DEFAULT_ZOOM)]
    pub zoom: u8,

    /// Page title
    #[arg(long)]
    pub title: Option<String>,
}

impl ViewArgs {
    #[must_use]
    pub fn map_config(&self) -> MapConfig {
        let defaults = MapConfig::default();
        MapConfig {
            center: self.center.unwrap_or(defaults.center),
            zoom: self.zoom,
            title: self.title.clone().unwrap_or_else(|| defaults.title.clone()),
            ..defaults
        }
    }
}

/// Depth color scale; either list falls back to the built-in ramp.
#[derive(Args, Debug, Clone)]
pub struct ScaleArgs {
    /// Ascending depth thresholds in km: 10,30,50,70,90
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub thresholds: Option<Vec<f64>>,

    /// One color per threshold; the last also colors deeper events
    #[arg(long, value_delimiter = ',')]
    pub colors: Option<Vec<String>>,
}

impl ScaleArgs {
    /// Build the validated depth scale.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting thresholds and colors do not form a
    /// valid scale.
    pub fn scale(&self) -> Result<DepthScale, QuakemapError> {
        let thresholds = self
            .thresholds
            .clone()
            .unwrap_or_else(|| DEPTH_THRESHOLDS_KM.to_vec());
        let colors = self
            .colors
            .clone()
            .unwrap_or_else(|| DEPTH_COLORS.iter().map(|c| (*c).to_string()).collect());
        DepthScale::new(thresholds, colors)
    }
}

/// Arguments for the `render` command.
#[derive(Parser, Debug)]
pub struct RenderArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub filter: FilterArgs,

    #[command(flatten)]
    pub view: ViewArgs,

    #[command(flatten)]
    pub scale: ScaleArgs,

    /// Output file ("-" for stdout)
    #[arg(long, short = 'o', default_value = "quakemap.html")]
    pub output: PathBuf,
}

/// Arguments for the `serve` command.
#[derive(Parser, Debug)]
pub struct ServeArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub filter: FilterArgs,

    #[command(flatten)]
    pub view: ViewArgs,

    #[command(flatten)]
    pub scale: ScaleArgs,

    /// Port to listen on
    #[arg(long, short = 'p', default_value = "8080")]
    pub port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Open browser automatically
    #[arg(long)]
    pub open: bool,
}

/// Arguments for the `markers` command.
#[derive(Parser, Debug)]
pub struct MarkersArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub filter: FilterArgs,

    #[command(flatten)]
    pub scale: ScaleArgs,

    /// Maximum number of markers to show
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Output format
    #[arg(long, short = 'f', default_value = "human", value_parser = parse_format)]
    pub format: Format,
}

/// Arguments for the `legend` command.
#[derive(Parser, Debug)]
pub struct LegendArgs {
    #[command(flatten)]
    pub scale: ScaleArgs,

    /// Print the legend's HTML fragment instead of its rows
    #[arg(long)]
    pub html: bool,

    /// Output format for rows
    #[arg(long, short = 'f', default_value = "human", value_parser = parse_format)]
    pub format: Format,
}

/// Parse a feed type from string.
fn parse_feed_type(s: &str) -> Result<FeedType, String> {
    s.parse()
}

/// Parse an output format from string.
fn parse_format(s: &str) -> Result<Format, String> {
    s.parse()
}

/// Parse a bounding box from string.
fn parse_bbox(s: &str) -> Result<BBox, String> {
    s.parse()
}

/// Parse a map center from string.
fn parse_center(s: &str) -> Result<LatLng, String> {
    s.parse()
}
