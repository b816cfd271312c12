//! HTML page rendering.
//!
//! The page is self-contained apart from Leaflet, which is loaded from a
//! CDN. The serialized [`MapView`] is embedded in the page and the script
//! only turns it into Leaflet layers and controls.

use crate::errors::QuakemapError;
use crate::map::MapView;

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";

/// Render the complete page for a map view.
///
/// # Errors
///
/// Returns an error if the view cannot be serialized.
pub fn render_page(view: &MapView) -> Result<String, QuakemapError> {
    let data = embed_json(&serde_json::to_string(view)?);
    Ok(PAGE_TEMPLATE
        .replace("{{TITLE}}", &view.title)
        .replace("{{LEAFLET_CSS}}", LEAFLET_CSS)
        .replace("{{LEAFLET_JS}}", LEAFLET_JS)
        .replace("{{CONTAINER_ID}}", &view.container_id)
        .replace("{{MAP_VIEW}}", &data))
}

/// Make JSON safe to place inside a `<script>` element.
///
/// `<` only occurs inside JSON strings, where `\u003c` decodes back to it.
fn embed_json(json: &str) -> String {
    json.replace('<', "\\u003c")
}

const PAGE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{TITLE}}</title>
    <link rel="stylesheet" href="{{LEAFLET_CSS}}">
    <style>
        html, body { height: 100%; margin: 0; padding: 0; }
        #{{CONTAINER_ID}} { width: 100%; height: 100%; }

        .info.legend {
            background: #fff;
            padding: 6px 10px;
            line-height: 18px;
            color: #555;
            border-radius: 5px;
            box-shadow: 0 0 15px rgba(0, 0, 0, 0.2);
        }

        .info.legend li {
            list-style: none;
            display: inline-block;
            width: 18px;
            height: 12px;
            margin-right: 6px;
        }
    </style>
</head>
<body>
    <div id="{{CONTAINER_ID}}"></div>

    <script src="{{LEAFLET_JS}}"></script>
    <script id="map-view" type="application/json">{{MAP_VIEW}}</script>
    <script>
    (function() {
        var view = JSON.parse(document.getElementById('map-view').textContent);

        var baseLayers = {};
        var active = [];
        view.baseLayers.forEach(function(b) {
            var layer = L.tileLayer(b.url, { attribution: b.attribution });
            baseLayers[b.name] = layer;
            if (b.active) active.push(layer);
        });

        var overlay = L.layerGroup(view.overlay.markers.map(function(m) {
            var marker = L.circleMarker([m.lat, m.lng], {
                radius: m.radius,
                fillOpacity: m.fillOpacity,
                color: m.color
            });
            return marker.bindPopup(m.popup);
        }));
        active.push(overlay);

        var overlays = {};
        overlays[view.overlay.name] = overlay;

        var map = L.map(view.containerId, {
            center: view.center,
            zoom: view.zoom,
            layers: active
        });

        L.control.layers(baseLayers, overlays, { collapsed: view.layerControl.collapsed }).addTo(map);

        var legend = L.control({ position: view.legend.position });
        legend.onAdd = function() {
            var div = L.DomUtil.create('div', view.legend.class);
            div.innerHTML = view.legend.html;
            return div;
        };
        legend.addTo(map);
    })();
    </script>
</body>
</html>
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{MapConfig, build_map};
    use crate::models::tests::feature;
    use crate::scale::DepthScale;

    #[test]
    fn test_page_embeds_view() {
        let f = feature(
            r#"{"geometry":{"coordinates":[-100,40,25]},
                "properties":{"place":"Test","time":0,"mag":4.5}}"#,
        );
        let view = build_map(&[f], &MapConfig::default(), &DepthScale::default()).unwrap();
        let page = render_page(&view).unwrap();

        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>Earthquakes</title>"));
        assert!(page.contains(r#"<div id="map"></div>"#));
        assert!(page.contains(LEAFLET_JS));
        assert!(page.contains(r#""containerId":"map""#));
        assert!(page.contains(r##""color":"#fecc5c""##));
        assert!(!page.contains("{{"));
    }

    #[test]
    fn test_script_breakout_is_escaped() {
        let f = feature(
            r#"{"geometry":{"coordinates":[1,2,3]},
                "properties":{"place":"</script><script>alert(1)</script>","time":0,"mag":4}}"#,
        );
        let view = build_map(&[f], &MapConfig::default(), &DepthScale::default()).unwrap();
        let page = render_page(&view).unwrap();
        let data_start = page.find(r#"type="application/json">"#).unwrap();
        let data_end = data_start + page[data_start..].find("</script>").unwrap();
        assert!(page[data_start..data_end].contains(r"\u003c/script>"));
    }

    #[test]
    fn test_embed_json() {
        assert_eq!(embed_json(r#"{"a":"</b>"}"#), r#"{"a":"\u003c/b>"}"#);
        let round: serde_json::Value = serde_json::from_str(&embed_json(r#"{"a":"<!--"}"#)).unwrap();
        assert_eq!(round["a"], "<!--");
    }
}
