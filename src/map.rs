//! Map view composition.
//!
//! Builds the complete, serializable description of the map: base tile
//! layers, the earthquake overlay, the layer control and the legend. The
//! page script hands this description to Leaflet unchanged.

use serde::Serialize;
use tracing::debug;

use crate::errors::QuakemapError;
use crate::filters::LatLng;
use crate::legend::LegendControl;
use crate::marker::{CircleMarker, circle_marker};
use crate::models::Feature;
use crate::popup::popup_content;
use crate::scale::DepthScale;

/// Continental US center used when no center is given.
pub const DEFAULT_CENTER: LatLng = LatLng {
    lat: 37.09,
    lng: -95.71,
};

pub const DEFAULT_ZOOM: u8 = 5;

const STREET_TILES: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
const STREET_ATTRIBUTION: &str = "&copy; OpenStreetMap contributors";
const TOPO_TILES: &str = "https://{s}.tile.opentopomap.org/{z}/{x}/{y}.png";
const TOPO_ATTRIBUTION: &str = "Map data: &copy; OpenStreetMap contributors, SRTM | Map style: &copy; OpenTopoMap (CC-BY-SA)";

/// A base tile layer definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BaseLayer {
    pub name: String,
    pub url: String,
    pub attribution: String,
}

impl BaseLayer {
    fn new(name: &str, url: &str, attribution: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            attribution: attribution.to_string(),
        }
    }
}

/// Map configuration.
#[derive(Debug, Clone)]
pub struct MapConfig {
    /// Id of the page element holding the map
    pub container_id: String,
    pub center: LatLng,
    pub zoom: u8,
    /// Mutually exclusive backgrounds; the first one is shown initially
    pub base_layers: Vec<BaseLayer>,
    pub overlay_name: String,
    /// Page title
    pub title: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            container_id: "map".to_string(),
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            base_layers: vec![
                BaseLayer::new("Street Map", STREET_TILES, STREET_ATTRIBUTION),
                BaseLayer::new("Topographic Map", TOPO_TILES, TOPO_ATTRIBUTION),
            ],
            overlay_name: "Seismic Activity".to_string(),
            title: "Earthquakes".to_string(),
        }
    }
}

/// A base layer as placed on the map.
#[derive(Debug, Clone, Serialize)]
pub struct TileLayer {
    #[serde(flatten)]
    pub layer: BaseLayer,
    /// Shown at startup
    pub active: bool,
}

/// The earthquake overlay; always active at startup.
#[derive(Debug, Clone, Serialize)]
pub struct Overlay {
    pub name: String,
    pub markers: Vec<CircleMarker>,
}

/// Layer selection control: radio buttons for base layers, a checkbox
/// for the overlay.
#[derive(Debug, Clone, Serialize)]
pub struct LayerControl {
    pub collapsed: bool,
}

/// Everything the page needs to draw the map.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapView {
    pub title: String,
    pub container_id: String,
    /// `[lat, lng]`
    pub center: [f64; 2],
    pub zoom: u8,
    pub base_layers: Vec<TileLayer>,
    pub overlay: Overlay,
    pub layer_control: LayerControl,
    pub legend: LegendControl,
}

impl MapView {
    #[must_use]
    pub fn markers(&self) -> &[CircleMarker] {
        &self.overlay.markers
    }
}

/// Build the map view for a list of features.
///
/// Every feature becomes one marker with its popup bound, in feed order.
///
/// # Errors
///
/// Returns an error for the first feature that cannot be drawn; no
/// partial view is produced.
pub fn build_map(
    features: &[Feature],
    config: &MapConfig,
    scale: &DepthScale,
) -> Result<MapView, QuakemapError> {
    let markers = features
        .iter()
        .map(|f| -> Result<CircleMarker, QuakemapError> {
            Ok(circle_marker(f, scale)?.with_popup(popup_content(f)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!("built {} markers", markers.len());

    let base_layers = config
        .base_layers
        .iter()
        .enumerate()
        .map(|(i, layer)| TileLayer {
            layer: layer.clone(),
            active: i == 0,
        })
        .collect();

    Ok(MapView {
        title: config.title.clone(),
        container_id: config.container_id.clone(),
        center: [config.center.lat, config.center.lng],
        zoom: config.zoom,
        base_layers,
        overlay: Overlay {
            name: config.overlay_name.clone(),
            markers,
        },
        layer_control: LayerControl { collapsed: false },
        legend: LegendControl::new(scale),
    })
}
