//! Popup content for earthquake markers.

use std::fmt::Display;
use std::num::FpCategory;

use chrono::{Local, TimeZone};

use crate::models::Feature;

/// Date layout of a browser `Date` string, e.g. `Thu Jan 01 1970 00:00:00 GMT+0000`.
const DATE_FORMAT: &str = "%a %b %d %Y %H:%M:%S GMT%z";

/// Popup HTML for a feature, with the event time in the local time zone.
#[must_use]
pub fn popup_content(feature: &Feature) -> String {
    popup_content_in(feature, &Local)
}

/// Popup HTML for a feature, with the event time rendered in `tz`.
///
/// Returns an empty string when the feature has no properties. The place
/// name is inserted as-is, without HTML escaping.
#[must_use]
pub fn popup_content_in<Tz>(feature: &Feature, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let Some(props) = feature.properties.as_ref() else {
        return String::new();
    };

    let place = props.place.as_deref().unwrap_or("null");
    let date = feature.time().map_or_else(
        || "Invalid Date".to_string(),
        |t| t.with_timezone(tz).format(DATE_FORMAT).to_string(),
    );
    let mag = display_or(props.mag, "null");
    let depth = display_or(feature.depth_km(), "undefined");

    format!("<h3>{place}</h3><hr>{date}<br>Magnitude: {mag} / Depth: {depth}")
}

fn display_or(value: Option<f64>, missing: &str) -> String {
    value.map_or_else(|| missing.to_string(), js_number)
}

/// Number text as a browser prints it: no negative zero, and exponent form
/// below 1e-6 or from 1e21 up (`1e-7`, `1.5e+21`).
fn js_number(value: f64) -> String {
    match value.classify() {
        FpCategory::Nan => "NaN".to_string(),
        FpCategory::Zero => "0".to_string(),
        FpCategory::Infinite if value > 0.0 => "Infinity".to_string(),
        FpCategory::Infinite => "-Infinity".to_string(),
        _ if (1e-6..1e21).contains(&value.abs()) => value.to_string(),
        _ => {
            let text = format!("{value:e}");
            if text.contains("e-") {
                text
            } else {
                text.replacen('e', "e+", 1)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, Utc};

    use super::*;
    use crate::models::tests::feature;

    #[test]
    fn test_popup_layout() {
        let f = feature(
            r#"{"geometry":{"coordinates":[-100,40,25]},
                "properties":{"place":"Test","time":0,"mag":4.5}}"#,
        );
        assert_eq!(
            popup_content_in(&f, &Utc),
            "<h3>Test</h3><hr>Thu Jan 01 1970 00:00:00 GMT+0000<br>Magnitude: 4.5 / Depth: 25"
        );
    }

    #[test]
    fn test_popup_uses_given_zone() {
        let f = feature(
            r#"{"geometry":{"coordinates":[0,0,7.9]},
                "properties":{"place":"Somewhere","time":1760510000000,"mag":4.5}}"#,
        );
        let tz = FixedOffset::west_opt(8 * 3600).unwrap();
        let html = popup_content_in(&f, &tz);
        assert!(html.contains("Tue Oct 14 2025 22:33:20 GMT-0800"), "{html}");
        assert!(html.ends_with("Magnitude: 4.5 / Depth: 7.9"));
    }

    #[test]
    fn test_popup_without_properties_is_empty() {
        let f = feature(r#"{"geometry":{"coordinates":[1,2,3]}}"#);
        assert_eq!(popup_content(&f), "");
        let f = feature(r#"{"geometry":{"coordinates":[1,2,3]},"properties":null}"#);
        assert_eq!(popup_content_in(&f, &Utc), "");
    }

    #[test]
    fn test_popup_field_order() {
        let f = feature(
            r#"{"geometry":{"coordinates":[1,2,33]},
                "properties":{"place":"Order","time":86400000,"mag":5.2}}"#,
        );
        let html = popup_content_in(&f, &Utc);
        let place = html.find("Order").unwrap();
        let date = html.find("1970").unwrap();
        let mag = html.find("5.2").unwrap();
        let depth = html.find("33").unwrap();
        assert!(place < date && date < mag && mag < depth);
    }

    #[test]
    fn test_popup_missing_values() {
        let f = feature(
            r#"{"geometry":{"coordinates":[1,2]},
                "properties":{"place":null,"time":0,"mag":null}}"#,
        );
        let html = popup_content_in(&f, &Utc);
        assert!(html.starts_with("<h3>null</h3>"));
        assert!(html.ends_with("Magnitude: null / Depth: undefined"));
    }

    #[test]
    fn test_popup_without_time() {
        let f = feature(
            r#"{"geometry":{"coordinates":[1,2,3]},
                "properties":{"place":"Nowhen","time":null,"mag":3}}"#,
        );
        assert_eq!(
            popup_content_in(&f, &Utc),
            "<h3>Nowhen</h3><hr>Invalid Date<br>Magnitude: 3 / Depth: 3"
        );
    }

    #[test]
    fn test_popup_numbers_print_like_a_browser() {
        let f = feature(
            r#"{"geometry":{"coordinates":[1,2,-0.0]},
                "properties":{"place":"Tiny","time":0,"mag":0.0000001}}"#,
        );
        assert!(popup_content_in(&f, &Utc).ends_with("Magnitude: 1e-7 / Depth: 0"));
    }

    #[test]
    fn test_js_number() {
        assert_eq!(js_number(-0.0), "0");
        assert_eq!(js_number(0.000_001), "0.000001");
        assert_eq!(js_number(0.000_000_123), "1.23e-7");
        assert_eq!(js_number(-3.2), "-3.2");
        assert_eq!(js_number(1e20), "100000000000000000000");
        assert_eq!(js_number(1.5e21), "1.5e+21");
        assert_eq!(js_number(f64::NAN), "NaN");
        assert_eq!(js_number(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn test_place_is_not_escaped() {
        let f = feature(
            r#"{"geometry":{"coordinates":[1,2,3]},
                "properties":{"place":"<b>A & B</b>","time":0,"mag":1}}"#,
        );
        assert!(popup_content_in(&f, &Utc).starts_with("<h3><b>A & B</b></h3>"));
    }
}
