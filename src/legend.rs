//! Depth legend shown in the bottom-right corner of the map.

use serde::Serialize;

use crate::scale::DepthScale;

/// Corner the legend control is attached to.
pub const LEGEND_POSITION: &str = "bottomright";

/// CSS classes of the legend container.
pub const LEGEND_CLASS: &str = "info legend";

const LEGEND_TITLE: &str = "<b>Depth (km)</b>";

/// One legend row: swatch color and depth range text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    pub color: String,
    pub range: String,
}

/// Static legend control; built once and never updated.
#[derive(Debug, Clone, Serialize)]
pub struct LegendControl {
    pub position: &'static str,
    pub class: &'static str,
    pub html: String,
}

impl LegendControl {
    #[must_use]
    pub fn new(scale: &DepthScale) -> Self {
        Self {
            position: LEGEND_POSITION,
            class: LEGEND_CLASS,
            html: legend_html(scale),
        }
    }
}

/// Legend rows: `0-10`, `11-30`, ..., then `90+` for the overflow bin.
///
/// The low bound of bin `i > 0` is the previous threshold plus one.
#[must_use]
pub fn legend_labels(scale: &DepthScale) -> Vec<LegendEntry> {
    let mut low = 0.0;
    let mut last = 0.0;
    scale
        .bins()
        .into_iter()
        .map(|bin| {
            let range = match bin.upper_km {
                Some(high) => {
                    let range = format!("{low}-{high}");
                    low = high + 1.0;
                    last = high;
                    range
                }
                None => format!("{last}+"),
            };
            LegendEntry {
                color: bin.color,
                range,
            }
        })
        .collect()
}

/// Inner HTML of the legend container.
#[must_use]
pub fn legend_html(scale: &DepthScale) -> String {
    std::iter::once(LEGEND_TITLE.to_string())
        .chain(legend_labels(scale).iter().map(|e| {
            format!(r#"<li style="background:{}"></li> {}"#, e.color, e.range)
        }))
        .collect::<Vec<_>>()
        .join("<br>")
}
