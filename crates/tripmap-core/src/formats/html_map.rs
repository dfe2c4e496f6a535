//! Interactive trip planner page
//!
//! Renders one self-contained HTML document: a Leaflet base map, a filled polygon for every
//! zone that has a boundary, one pin per POI and a collapsible zone sidebar.
//!
//! The page talks to its embedded script through a small, versioned protocol
//! ([`PROTOCOL_VERSION`]):
//!
//! - clicking a zone header flies to the zone's stored view and shows that zone's location
//!   list while hiding every other list; clicking the open zone again hides it
//! - clicking a location row flies to the POI at [`POI_FOCUS_ZOOM`] and opens its popup
//! - boundary fill opacity drops to [`CLOSE_UP_FILL_OPACITY`] at or above
//!   [`BOUNDARY_FADE_ZOOM`], otherwise [`OVERVIEW_FILL_OPACITY`]; the rule runs once at load
//!   and again after every zoom change
//!
//! Pin styling comes from [`classify`](crate::classify::classify) on the raw category.
//! Boundary coloring comes from the zone. The two never influence each other.

use serde::Serialize;
use std::borrow::Cow;
use std::fmt::Write;

use crate::assign::{assign, ZonePartition};
use crate::classify::classify;
use crate::error::{Result, TripmapError};
use crate::models::{MapView, Poi, Region};

pub const PROTOCOL_VERSION: u32 = 1;

/// Zoom level at and above which boundaries fade
pub const BOUNDARY_FADE_ZOOM: u8 = 15;
pub const CLOSE_UP_FILL_OPACITY: f64 = 0.1;
pub const OVERVIEW_FILL_OPACITY: f64 = 0.45;

/// Zoom used when a single POI is selected from the sidebar
pub const POI_FOCUS_ZOOM: u8 = 18;

const BOUNDARY_WEIGHT: u32 = 2;
const FLY_DURATION_SECS: f64 = 1.5;
const POPUP_MAX_WIDTH: u32 = 250;

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";
const GLYPHICONS_CSS: &str =
    "https://cdn.jsdelivr.net/npm/bootstrap@3.4.1/dist/css/bootstrap.min.css";
const MARKERS_CSS: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/Leaflet.awesome-markers/2.0.2/leaflet.awesome-markers.css";
const MARKERS_JS: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/Leaflet.awesome-markers/2.0.2/leaflet.awesome-markers.js";

/// Base map tile source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TileLayer {
    /// Leaflet URL template
    pub url: String,
    /// Attribution HTML shown in the map corner
    pub attribution: String,
}

impl Default for TileLayer {
    fn default() -> Self {
        Self {
            url: "https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}{r}.png".to_string(),
            attribution: "&copy; \
                          <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> \
                          contributors &copy; <a href=\"https://carto.com/attributions\">CARTO</a>"
                .to_string(),
        }
    }
}

/// Rendering options for the interactive map
#[derive(Debug, Clone, Default)]
pub struct MapOptions {
    pub tiles: TileLayer,

    /// Element id of the map container. A fresh `map_<uuid>` id is generated when unset;
    /// pin it to get byte-identical output across runs.
    pub map_id: Option<String>,
}

/// Renders the interactive planner document
#[derive(Debug, Clone, Default)]
pub struct MapEmitter {
    options: MapOptions,
}

impl MapEmitter {
    pub fn new(options: MapOptions) -> Self {
        Self { options }
    }

    /// Assign `pois` to the region's zones and render the page
    pub fn emit(&self, region: &Region, country: &str, pois: &[Poi]) -> Result<String> {
        let partition = assign(region, pois);
        self.render(&partition, country)
    }

    /// Render an already computed partition
    pub fn render(&self, partition: &ZonePartition<'_>, country: &str) -> Result<String> {
        let map_id = self
            .options
            .map_id
            .clone()
            .unwrap_or_else(|| format!("map_{}", uuid::Uuid::new_v4().simple()));

        let data = MapData::build(partition, &map_id, &self.options.tiles);
        let data_json = serde_json::to_string(&data)
            .map_err(|e| TripmapError::Serialization(e.to_string()))?
            // No markup may reach the script element's tokenizer
            .replace('<', "\\u003c");

        let mut html = String::with_capacity(16 * 1024);
        write_document(&mut html, partition, country, &map_id, &data_json).map_err(|e| {
            TripmapError::Render { artifact: "interactive map".to_string(), reason: e.to_string() }
        })?;

        tracing::debug!(
            region = partition.region().name(),
            pins = data.pins.len(),
            boundaries = data.zones.iter().filter(|z| !z.boundary.is_empty()).count(),
            "Rendered interactive map"
        );
        Ok(html)
    }
}

/// Everything the client script needs, embedded as JSON
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MapData<'a> {
    protocol: u32,
    map_id: &'a str,
    view: MapView,
    tiles: &'a TileLayer,
    opacity: OpacityRule,
    focus_zoom: u8,
    fly_duration: f64,
    boundary_weight: u32,
    popup_max_width: u32,
    zones: Vec<ZoneData<'a>>,
    pins: Vec<PinData<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OpacityRule {
    threshold: u8,
    close_up: f64,
    overview: f64,
}

#[derive(Debug, Serialize)]
struct ZoneData<'a> {
    id: &'a str,
    name: &'a str,
    color: &'a str,
    description: &'a str,
    view: MapView,
    boundary: Vec<[f64; 2]>,
}

#[derive(Debug, Serialize)]
struct PinData<'a> {
    name: &'a str,
    lat: f64,
    lon: f64,
    zone: &'a str,
    color: &'static str,
    icon: &'static str,
    popup: String,
}

impl<'a> MapData<'a> {
    fn build(partition: &ZonePartition<'a>, map_id: &'a str, tiles: &'a TileLayer) -> Self {
        let zones = partition
            .buckets()
            .iter()
            .map(|bucket| ZoneData {
                id: &bucket.zone.id,
                name: &bucket.zone.name,
                color: &bucket.zone.color,
                description: &bucket.zone.description,
                view: bucket.zone.view,
                boundary: bucket.zone.boundary.iter().map(|p| p.to_array()).collect(),
            })
            .collect();

        // Pins follow sidebar order so a row's index is its pin index
        let pins = partition
            .buckets()
            .iter()
            .flat_map(|bucket| bucket.members.iter().map(move |poi| (bucket.zone, *poi)))
            .map(|(zone, poi)| {
                let style = classify(&poi.category);
                PinData {
                    name: &poi.name,
                    lat: poi.lat(),
                    lon: poi.lon(),
                    zone: &zone.id,
                    color: style.color,
                    icon: style.icon,
                    popup: popup_html(poi),
                }
            })
            .collect();

        Self {
            protocol: PROTOCOL_VERSION,
            map_id,
            view: partition.region().view(),
            tiles,
            opacity: OpacityRule {
                threshold: BOUNDARY_FADE_ZOOM,
                close_up: CLOSE_UP_FILL_OPACITY,
                overview: OVERVIEW_FILL_OPACITY,
            },
            focus_zoom: POI_FOCUS_ZOOM,
            fly_duration: FLY_DURATION_SECS,
            boundary_weight: BOUNDARY_WEIGHT,
            popup_max_width: POPUP_MAX_WIDTH,
            zones,
            pins,
        }
    }
}

fn escape(text: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(text)
}

/// Popup body for one pin; notes keep their inline markup
fn popup_html(poi: &Poi) -> String {
    format!(
        "<div class=\"pin-popup\"><b>{}</b><br><span class=\"pin-category\">{}</span><hr>\
         {}<br><br><small>&#128205; {}</small></div>",
        escape(&poi.name),
        escape(&poi.category),
        poi.notes,
        escape(&poi.address)
    )
}

fn write_document(
    out: &mut String,
    partition: &ZonePartition<'_>,
    country: &str,
    map_id: &str,
    data_json: &str,
) -> std::fmt::Result {
    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, "<html lang=\"en\">")?;
    writeln!(out, "<head>")?;
    writeln!(out, "<meta charset=\"utf-8\">")?;
    writeln!(out, "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">")?;
    writeln!(out, "<title>{} Trip Planner</title>", escape(country))?;
    writeln!(out, "<link rel=\"stylesheet\" href=\"{}\">", LEAFLET_CSS)?;
    writeln!(out, "<link rel=\"stylesheet\" href=\"{}\">", GLYPHICONS_CSS)?;
    writeln!(out, "<link rel=\"stylesheet\" href=\"{}\">", MARKERS_CSS)?;
    writeln!(out, "<script src=\"{}\"></script>", LEAFLET_JS)?;
    writeln!(out, "<script src=\"{}\"></script>", MARKERS_JS)?;
    writeln!(out, "<style>{}</style>", PAGE_CSS)?;
    writeln!(out, "</head>")?;
    writeln!(out, "<body>")?;
    writeln!(out, "<div id=\"{}\" class=\"trip-map\"></div>", escape(map_id))?;
    write_sidebar(out, partition, country)?;
    writeln!(out, "<script>")?;
    writeln!(out, "var TRIP_DATA = {};", data_json)?;
    writeln!(out, "{}", CLIENT_SCRIPT)?;
    writeln!(out, "</script>")?;
    writeln!(out, "</body>")?;
    writeln!(out, "</html>")
}

fn write_sidebar(
    out: &mut String,
    partition: &ZonePartition<'_>,
    country: &str,
) -> std::fmt::Result {
    writeln!(out, "<div id=\"map-sidebar\">")?;
    writeln!(
        out,
        "  <div class=\"sidebar-header\">&#127757; {} Trip Planner</div>",
        escape(country)
    )?;

    let mut pin_index = 0usize;
    for bucket in partition.buckets() {
        let zone = bucket.zone;
        let id = escape(&zone.id);
        let color = escape(&zone.color);

        writeln!(
            out,
            "  <div class=\"zone-container\" style=\"border-left: 4px solid {color};\">"
        )?;
        writeln!(
            out,
            "    <div class=\"zone-title\" data-zone=\"{id}\" \
             style=\"background: linear-gradient(90deg, {color}dd, {color}99);\">"
        )?;
        writeln!(
            out,
            "      <span><span class=\"zone-dot\"></span>\
             {} (<span class=\"zone-count\">{}</span>)</span>\
             <span class=\"zone-caret\">&#9660;</span>",
            escape(&zone.name),
            bucket.len()
        )?;
        writeln!(out, "    </div>")?;
        writeln!(out, "    <div class=\"location-list\" id=\"list-{id}\" data-zone=\"{id}\">")?;
        if !zone.description.is_empty() {
            writeln!(
                out,
                "      <div class=\"zone-description\">{}</div>",
                escape(&zone.description)
            )?;
        }
        for poi in &bucket.members {
            writeln!(
                out,
                "      <div class=\"location-item\" data-pin=\"{}\">&#128205; {} \
                 <span class=\"location-category\">({})</span></div>",
                pin_index,
                escape(&poi.name),
                escape(&poi.category)
            )?;
            pin_index += 1;
        }
        writeln!(out, "    </div>")?;
        writeln!(out, "  </div>")?;
    }

    writeln!(
        out,
        "  <div class=\"sidebar-footer\">Click headers to zoom.<br>Click items to see pin.</div>"
    )?;
    writeln!(out, "</div>")
}

const PAGE_CSS: &str = r#"
html, body { height: 100%; margin: 0; padding: 0; }
.trip-map { position: absolute; top: 0; bottom: 0; left: 0; right: 0; }
.pin-popup { font-family: sans-serif; width: 200px; }
.pin-category { color: gray; font-size: 11px; }
#map-sidebar {
    position: absolute;
    top: 10px;
    right: 10px;
    width: 280px;
    max-height: 90vh;
    background-color: white;
    z-index: 9999;
    overflow-y: auto;
    box-shadow: 0 4px 6px rgba(0,0,0,0.3);
    border-radius: 8px;
    font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
    padding: 10px;
}
.sidebar-header {
    font-size: 18px;
    font-weight: bold;
    margin-bottom: 10px;
    color: #2c3e50;
    border-bottom: 2px solid #ecf0f1;
    padding-bottom: 5px;
}
.zone-container {
    margin-bottom: 8px;
    border: 1px solid #eee;
    border-radius: 5px;
    overflow: hidden;
}
.zone-title {
    padding: 10px;
    cursor: pointer;
    font-weight: 600;
    font-size: 14px;
    display: flex;
    justify-content: space-between;
    align-items: center;
    color: white;
    transition: all 0.3s ease;
}
.zone-title:hover { transform: translateX(2px); box-shadow: inset 0 -2px 4px rgba(0,0,0,0.1); }
.zone-dot {
    height: 10px;
    width: 10px;
    border-radius: 50%;
    display: inline-block;
    margin-right: 8px;
    background-color: white;
}
.zone-caret { font-size: 10px; }
.zone-description { padding: 8px 15px; font-size: 12px; color: #666; font-style: italic; }
.location-list { display: none; padding: 5px 0; background-color: #fff; }
.location-item {
    padding: 6px 15px;
    font-size: 13px;
    cursor: pointer;
    color: #555;
    border-left: 3px solid transparent;
}
.location-item:hover { background-color: #f0f8ff; color: #000; border-left: 3px solid #3498db; }
.location-category { font-size: 10px; color: #aaa; }
.sidebar-footer { font-size: 11px; color: #999; margin-top: 10px; text-align: center; }
#map-sidebar::-webkit-scrollbar { width: 6px; }
#map-sidebar::-webkit-scrollbar-thumb { background: #ccc; border-radius: 3px; }
"#;

const CLIENT_SCRIPT: &str = r#"
(function () {
    var data = TRIP_DATA;
    var map = L.map(data.mapId, { center: data.view.center, zoom: data.view.zoom });
    L.tileLayer(data.tiles.url, { attribution: data.tiles.attribution, maxZoom: 19 }).addTo(map);

    function textNode(text) {
        var span = document.createElement('span');
        span.textContent = text;
        return span;
    }

    var boundaries = [];
    data.zones.forEach(function (zone) {
        if (!zone.boundary.length) {
            return;
        }
        var polygon = L.polygon(zone.boundary, {
            color: zone.color,
            weight: data.boundaryWeight,
            fill: true,
            fillColor: zone.color,
            fillOpacity: data.opacity.overview
        });
        polygon.bindTooltip(textNode(zone.name));
        if (zone.description) {
            polygon.bindPopup(textNode(zone.description));
        }
        polygon.addTo(map);
        boundaries.push(polygon);
    });

    var markers = data.pins.map(function (pin) {
        var marker = L.marker([pin.lat, pin.lon], {
            icon: L.AwesomeMarkers.icon({
                icon: pin.icon,
                markerColor: pin.color,
                prefix: 'glyphicon'
            })
        });
        marker.bindTooltip(textNode(pin.name));
        marker.bindPopup(pin.popup, { maxWidth: data.popupMaxWidth });
        marker.addTo(map);
        return marker;
    });

    function applyBoundaryOpacity() {
        var opacity = map.getZoom() >= data.opacity.threshold
            ? data.opacity.closeUp
            : data.opacity.overview;
        boundaries.forEach(function (polygon) {
            polygon.setStyle({ fillOpacity: opacity });
        });
    }

    function findZone(id) {
        for (var i = 0; i < data.zones.length; i++) {
            if (data.zones[i].id === id) {
                return data.zones[i];
            }
        }
        return null;
    }

    function toggleZone(id) {
        var zone = findZone(id);
        if (!zone) {
            return;
        }
        map.flyTo(zone.view.center, zone.view.zoom, { animate: true, duration: data.flyDuration });

        var lists = document.querySelectorAll('.location-list');
        for (var i = 0; i < lists.length; i++) {
            var list = lists[i];
            if (list.getAttribute('data-zone') === id) {
                list.style.display = list.style.display === 'block' ? 'none' : 'block';
            } else {
                list.style.display = 'none';
            }
        }
    }

    function focusPin(index) {
        var pin = data.pins[index];
        var marker = markers[index];
        if (!pin || !marker) {
            return;
        }
        map.once('moveend', function () {
            marker.openPopup();
        });
        map.flyTo([pin.lat, pin.lon], data.focusZoom, {
            animate: true,
            duration: data.flyDuration
        });
    }

    var titles = document.querySelectorAll('.zone-title');
    for (var t = 0; t < titles.length; t++) {
        titles[t].addEventListener('click', function (event) {
            toggleZone(event.currentTarget.getAttribute('data-zone'));
        });
    }

    var items = document.querySelectorAll('.location-item');
    for (var r = 0; r < items.length; r++) {
        items[r].addEventListener('click', function (event) {
            focusPin(parseInt(event.currentTarget.getAttribute('data-pin'), 10));
        });
    }

    map.on('zoomend', applyBoundaryOpacity);
    applyBoundaryOpacity();
})();
"#;
