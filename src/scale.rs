//! Visual scales: depth to color and magnitude to radius.
//!
//! Both mappings are pure functions over primitive inputs so they can be
//! tested without any map or feed around them.

use serde::Serialize;

use crate::errors::QuakemapError;

/// Upper bounds (inclusive, km) of the finite depth bins.
pub const DEPTH_THRESHOLDS_KM: [f64; 5] = [10.0, 30.0, 50.0, 70.0, 90.0];

/// Yellow to red ramp, one color per threshold.
pub const DEPTH_COLORS: [&str; 5] = ["#ffffb2", "#fecc5c", "#fd8d3c", "#f03b20", "#bd0026"];

/// Fill opacity shared by every marker.
pub const FILL_OPACITY: f64 = 0.80;

/// Divisor applied to the energy-equivalent amplitude.
const RADIUS_DIVISOR: f64 = 50.0;

/// Marker radius in pixels for a magnitude: `sqrt(10^m) / 50`.
///
/// Magnitude 0 gives 0.02, so no event is invisible. Negative and extreme
/// magnitudes are not clamped.
#[must_use]
pub fn radius_for_magnitude(magnitude: f64) -> f64 {
    10f64.powf(magnitude).sqrt() / RADIUS_DIVISOR
}

/// One depth range and its color. `upper_km` is `None` for the overflow bin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorBin {
    pub upper_km: Option<f64>,
    pub color: String,
}

/// Ascending depth thresholds with a parallel color for each.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthScale {
    thresholds: Vec<f64>,
    colors: Vec<String>,
}

impl Default for DepthScale {
    fn default() -> Self {
        Self {
            thresholds: DEPTH_THRESHOLDS_KM.to_vec(),
            colors: DEPTH_COLORS.iter().map(|c| (*c).to_string()).collect(),
        }
    }
}

impl DepthScale {
    /// Create a scale from thresholds and their colors.
    ///
    /// # Errors
    ///
    /// Returns an error if the lists are empty, differ in length, or the
    /// thresholds are not finite and strictly ascending.
    pub fn new(thresholds: Vec<f64>, colors: Vec<String>) -> Result<Self, QuakemapError> {
        if thresholds.is_empty() {
            return Err(QuakemapError::Scale("no thresholds".into()));
        }
        if thresholds.len() != colors.len() {
            return Err(QuakemapError::Scale(format!(
                "{} thresholds but {} colors",
                thresholds.len(),
                colors.len()
            )));
        }
        if let Some(t) = thresholds.iter().find(|t| !t.is_finite()) {
            return Err(QuakemapError::Scale(format!("threshold {t} is not a finite depth")));
        }
        // Every threshold is finite here, so `>=` is the exact negation of `<`.
        if let Some(pair) = thresholds.windows(2).find(|w| w[0] >= w[1]) {
            return Err(QuakemapError::Scale(format!(
                "thresholds must be strictly ascending ({} >= {})",
                pair[0], pair[1]
            )));
        }
        Ok(Self { thresholds, colors })
    }

    /// Color used beyond the last threshold.
    #[must_use]
    pub fn overflow_color(&self) -> &str {
        self.colors.last().map_or("", String::as_str)
    }

    /// Color for a depth: the first bin whose threshold is `>= depth`.
    ///
    /// A depth equal to a threshold belongs to that (lower) bin. Depths past
    /// every threshold, and NaN, get the overflow color.
    #[must_use]
    pub fn color_for_depth(&self, depth_km: f64) -> &str {
        self.thresholds
            .iter()
            .position(|t| depth_km <= *t)
            .map_or_else(|| self.overflow_color(), |i| self.colors[i].as_str())
    }

    /// All bins in order: one per threshold plus the overflow bin.
    #[must_use]
    pub fn bins(&self) -> Vec<ColorBin> {
        self.thresholds
            .iter()
            .zip(&self.colors)
            .map(|(t, c)| ColorBin {
                upper_km: Some(*t),
                color: c.clone(),
            })
            .chain(std::iter::once(ColorBin {
                upper_km: None,
                color: self.overflow_color().to_string(),
            }))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_tie_goes_to_lower_bin() {
        let scale = DepthScale::default();
        assert_eq!(scale.color_for_depth(10.0), "#ffffb2");
        assert_eq!(scale.color_for_depth(11.0), "#fecc5c");
        assert_eq!(scale.color_for_depth(30.0), "#fecc5c");
        assert_eq!(scale.color_for_depth(90.0), "#bd0026");
        assert_eq!(scale.color_for_depth(91.0), "#bd0026");
    }

    #[test]
    fn test_color_edges() {
        let scale = DepthScale::default();
        assert_eq!(scale.color_for_depth(-3.2), "#ffffb2");
        assert_eq!(scale.color_for_depth(25.0), "#fecc5c");
        assert_eq!(scale.color_for_depth(650.0), "#bd0026");
        assert_eq!(scale.color_for_depth(f64::NAN), "#bd0026");
    }

    #[test]
    fn test_radius() {
        assert!((radius_for_magnitude(0.0) - 0.02).abs() < 1e-12);
        assert!((radius_for_magnitude(4.5) - 3.5566).abs() < 1e-3);
        assert!((radius_for_magnitude(5.0) - 6.3246).abs() < 1e-3);
        // Unclamped below zero
        assert!(radius_for_magnitude(-1.0) < 0.02);
        assert!(radius_for_magnitude(-1.0) > 0.0);
    }

    #[test]
    fn test_bins() {
        let bins = DepthScale::default().bins();
        assert_eq!(bins.len(), DEPTH_THRESHOLDS_KM.len() + 1);
        assert_eq!(bins[0].upper_km, Some(10.0));
        assert_eq!(bins[5].upper_km, None);
        assert_eq!(bins[5].color, bins[4].color);
    }

    #[test]
    fn test_new_rejects_bad_scales() {
        let colors = |n: usize| vec!["#000".to_string(); n];
        assert!(DepthScale::new(vec![], vec![]).is_err());
        assert!(DepthScale::new(vec![1.0, 2.0], colors(1)).is_err());
        assert!(DepthScale::new(vec![5.0, 5.0], colors(2)).is_err());
        assert!(DepthScale::new(vec![9.0, 3.0], colors(2)).is_err());
        assert!(DepthScale::new(vec![10.0, f64::NAN, 5.0], colors(3)).is_err());
        assert!(DepthScale::new(vec![f64::NAN, 5.0], colors(2)).is_err());
        assert!(DepthScale::new(vec![f64::NAN], colors(1)).is_err());
        assert!(DepthScale::new(vec![10.0, f64::INFINITY], colors(2)).is_err());

        let custom = DepthScale::new(vec![100.0, 300.0], vec!["#a".into(), "#b".into()])
            .expect("valid scale");
        assert_eq!(custom.color_for_depth(300.0), "#b");
        assert_eq!(custom.color_for_depth(301.0), "#b");
        assert_eq!(custom.color_for_depth(0.0), "#a");
    }
}
