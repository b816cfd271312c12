//! Optional pre-filtering of features before they reach the map.
//!
//! The default filter accepts every feature, so the map shows the feed
//! exactly as delivered.

use crate::models::Feature;

/// Bounding box for geographic filtering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl std::str::FromStr for BBox {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let vals = parse_numbers(s, 4, "bbox (minlat,minlon,maxlat,maxlon)")?;
        let bbox = Self {
            min_lat: vals[0],
            min_lon: vals[1],
            max_lat: vals[2],
            max_lon: vals[3],
        };

        for lat in [bbox.min_lat, bbox.max_lat] {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(format!("latitude {lat} out of range [-90, 90]"));
            }
        }
        for lon in [bbox.min_lon, bbox.max_lon] {
            if !(-180.0..=180.0).contains(&lon) {
                return Err(format!("longitude {lon} out of range [-180, 180]"));
            }
        }
        if bbox.min_lat > bbox.max_lat {
            return Err(format!(
                "min_lat {} must be <= max_lat {}",
                bbox.min_lat, bbox.max_lat
            ));
        }

        Ok(bbox)
    }
}

impl BBox {
    /// Check if a point is within the bounding box.
    #[must_use]
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lon >= self.min_lon && lon <= self.max_lon
    }
}

/// A `lat,lon` pair, used for the map center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl std::str::FromStr for LatLng {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let vals = parse_numbers(s, 2, "center (lat,lon)")?;
        if !(-90.0..=90.0).contains(&vals[0]) || !(-180.0..=180.0).contains(&vals[1]) {
            return Err(format!("center {},{} out of range", vals[0], vals[1]));
        }
        Ok(Self {
            lat: vals[0],
            lng: vals[1],
        })
    }
}

fn parse_numbers(s: &str, expected: usize, what: &str) -> Result<Vec<f64>, String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != expected {
        return Err(format!(
            "{what} requires {expected} values, got {}",
            parts.len()
        ));
    }
    parts
        .iter()
        .map(|p| p.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid number in {what}: {e}"))
}

/// Combined filter criteria.
#[derive(Debug, Default, Clone)]
pub struct EventFilter {
    pub min_magnitude: Option<f64>,
    pub max_depth: Option<f64>,
    pub bbox: Option<BBox>,
}

impl EventFilter {
    /// Check if a feature passes all filter criteria.
    ///
    /// Criteria that cannot be evaluated (no magnitude, no coordinates)
    /// only reject when that criterion is set.
    #[must_use]
    pub fn matches(&self, event: &Feature) -> bool {
        self.check_magnitude(event) && self.check_depth(event) && self.check_bbox(event)
    }

    /// True when no criterion is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min_magnitude.is_none() && self.max_depth.is_none() && self.bbox.is_none()
    }

    fn check_magnitude(&self, event: &Feature) -> bool {
        match self.min_magnitude {
            None => true,
            Some(min) => event.magnitude().is_some_and(|m| m >= min),
        }
    }

    fn check_depth(&self, event: &Feature) -> bool {
        match self.max_depth {
            None => true,
            Some(max) => event.depth_km().is_some_and(|d| d <= max),
        }
    }

    fn check_bbox(&self, event: &Feature) -> bool {
        match (&self.bbox, event.latitude(), event.longitude()) {
            (None, _, _) => true,
            (Some(bbox), Some(lat), Some(lon)) => bbox.contains(lat, lon),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tests::feature;

    fn quake(lon: f64, lat: f64, depth: f64, mag: f64) -> Feature {
        feature(&format!(
            r#"{{"geometry":{{"coordinates":[{lon},{lat},{depth}]}},
                 "properties":{{"place":"p","time":0,"mag":{mag}}}}}"#
        ))
    }

    #[test]
    fn test_bbox_parse() {
        let bbox: BBox = "32.5,-124.5,42.0,-114.0".parse().unwrap();
        assert!((bbox.min_lat - 32.5).abs() < 0.001);
        assert!((bbox.min_lon - (-124.5)).abs() < 0.001);
        assert!("1,2,3".parse::<BBox>().is_err());
        assert!("95,0,96,1".parse::<BBox>().is_err());
        assert!("40,0,30,1".parse::<BBox>().is_err());
    }

    #[test]
    fn test_center_parse() {
        let c: LatLng = "37.09,-95.71".parse().unwrap();
        assert!((c.lat - 37.09).abs() < 1e-9);
        assert!((c.lng + 95.71).abs() < 1e-9);
        assert!("37.09".parse::<LatLng>().is_err());
        assert!("37,x".parse::<LatLng>().is_err());
    }

    #[test]
    fn test_default_filter_accepts_everything() {
        let filter = EventFilter::default();
        assert!(filter.is_empty());
        assert!(filter.matches(&quake(0.0, 0.0, 700.0, -1.0)));
        assert!(filter.matches(&feature(r#"{"geometry":{"coordinates":[]}}"#)));
    }

    #[test]
    fn test_combined_filter() {
        let filter = EventFilter {
            min_magnitude: Some(5.0),
            max_depth: Some(70.0),
            bbox: Some("32.5,-124.5,42.0,-114.0".parse().unwrap()),
        };
        assert!(filter.matches(&quake(-120.0, 37.0, 10.0, 5.5)));
        assert!(!filter.matches(&quake(-120.0, 37.0, 10.0, 4.9)));
        assert!(!filter.matches(&quake(-120.0, 37.0, 71.0, 5.5)));
        assert!(!filter.matches(&quake(-120.0, 50.0, 10.0, 5.5)));
    }
}
