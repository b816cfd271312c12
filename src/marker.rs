//! Circle markers sized by magnitude and colored by depth.

use serde::Serialize;

use crate::errors::QuakemapError;
use crate::models::Feature;
use crate::scale::{DepthScale, FILL_OPACITY, radius_for_magnitude};

/// Visual parameters of one earthquake marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CircleMarker {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub lat: f64,
    pub lng: f64,
    pub radius: f64,
    /// Outline and fill color
    pub color: String,
    pub fill_opacity: f64,
    pub magnitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mag_type: Option<String>,
    pub depth_km: Option<f64>,
    pub place: Option<String>,
    /// USGS event page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Popup HTML; empty until bound
    pub popup: String,
}

impl CircleMarker {
    /// Attach popup content to the marker.
    #[must_use]
    pub fn with_popup(mut self, popup: String) -> Self {
        self.popup = popup;
        self
    }
}

/// Build the marker for one feature.
///
/// A `null` magnitude is drawn as magnitude 0 and a missing depth takes
/// the overflow color.
///
/// # Errors
///
/// Returns an error if the feature has no properties or no
/// latitude/longitude pair.
pub fn circle_marker(feature: &Feature, scale: &DepthScale) -> Result<CircleMarker, QuakemapError> {
    feature.validate()?;
    let (Some(lng), Some(lat)) = (feature.longitude(), feature.latitude()) else {
        return Err(QuakemapError::Validation("feature has no point geometry".into()));
    };

    let props = feature.properties.as_ref();
    let magnitude = feature.magnitude();
    let depth_km = feature.depth_km();
    let color = depth_km.map_or_else(|| scale.overflow_color(), |d| scale.color_for_depth(d));

    Ok(CircleMarker {
        id: feature.id.clone(),
        lat,
        lng,
        radius: radius_for_magnitude(magnitude.unwrap_or(0.0)),
        color: color.to_string(),
        fill_opacity: FILL_OPACITY,
        magnitude,
        mag_type: props.and_then(|p| p.mag_type.clone()),
        depth_km,
        place: feature.place().map(str::to_string),
        url: props.and_then(|p| p.url.clone()),
        popup: String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tests::feature;

    #[test]
    fn test_marker_from_feature() {
        let f = feature(
            r#"{"id":"t1","geometry":{"coordinates":[-100,40,25]},
                "properties":{"place":"Test","time":0,"mag":4.5}}"#,
        );
        let m = circle_marker(&f, &DepthScale::default()).unwrap();
        assert_eq!(m.id.as_deref(), Some("t1"));
        assert!((m.lat - 40.0).abs() < f64::EPSILON);
        assert!((m.lng + 100.0).abs() < f64::EPSILON);
        assert_eq!(m.color, "#fecc5c");
        assert!((m.radius - 3.5566).abs() < 1e-3);
        assert!((m.fill_opacity - 0.8).abs() < f64::EPSILON);
        assert!(m.popup.is_empty());
    }

    #[test]
    fn test_null_magnitude_and_missing_depth() {
        let f = feature(
            r#"{"geometry":{"coordinates":[10,20]},
                "properties":{"place":"X","time":0,"mag":null}}"#,
        );
        let m = circle_marker(&f, &DepthScale::default()).unwrap();
        assert!((m.radius - 0.02).abs() < 1e-12);
        assert_eq!(m.color, "#bd0026");
    }

    #[test]
    fn test_marker_requires_properties() {
        let f = feature(r#"{"geometry":{"coordinates":[10,20,5]}}"#);
        assert!(matches!(
            circle_marker(&f, &DepthScale::default()),
            Err(QuakemapError::Validation(_))
        ));
    }

    #[test]
    fn test_serialized_field_names() {
        let f = feature(
            r#"{"geometry":{"coordinates":[1,2,3]},
                "properties":{"place":"P","time":0,"mag":2}}"#,
        );
        let m = circle_marker(&f, &DepthScale::default())
            .unwrap()
            .with_popup("<h3>P</h3>".into());
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["fillOpacity"], 0.8);
        assert_eq!(json["depthKm"], 3.0);
        assert_eq!(json["popup"], "<h3>P</h3>");
        assert!(json.get("id").is_none());
    }
}
