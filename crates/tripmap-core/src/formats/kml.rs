//! KML (Keyhole Markup Language) writer for mobile import
//!
//! Produces a flat list of placemarks, one per POI, styled by the POI's raw category.
//! Zones play no part here: mobile clients get pins only, no boundaries.

use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::fmt::Display;

use crate::error::{Result, TripmapError};
use crate::models::Poi;

const KML_NAMESPACE: &str = "http://www.opengis.net/kml/2.2";
const PUSHPIN_HREF: &str = "http://maps.google.com/mapfiles/kml/pushpin/wht-pushpin.png";
const ICON_SCALE: &str = "1.1";

/// Style id used for categories that are not in the table
pub const FALLBACK_STYLE: &str = "Unique";

/// One pin style keyed by an exact category name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KmlStyle {
    pub category: String,
    /// KML `aabbggrr` hex color
    pub color: String,
}

impl KmlStyle {
    pub fn new(category: impl Into<String>, color: impl Into<String>) -> Self {
        Self { category: category.into(), color: color.into() }
    }

    /// Style id: the category with spaces replaced by underscores
    pub fn id(&self) -> String {
        style_id(&self.category)
    }
}

/// Ordered category to pin color table
///
/// This table is deliberately independent of the pin classifier in
/// [`classify`](crate::classify): lookups here are exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KmlStyleTable {
    styles: Vec<KmlStyle>,
}

impl KmlStyleTable {
    pub fn new(styles: Vec<KmlStyle>) -> Self {
        Self { styles }
    }

    pub fn styles(&self) -> &[KmlStyle] {
        &self.styles
    }

    pub fn get(&self, category: &str) -> Option<&KmlStyle> {
        self.styles.iter().find(|s| s.category == category)
    }

    /// `styleUrl` value for a POI category
    pub fn style_url(&self, category: &str) -> String {
        match self.get(category) {
            Some(style) => format!("#{}", style.id()),
            None => format!("#{}", FALLBACK_STYLE),
        }
    }
}

impl Default for KmlStyleTable {
    fn default() -> Self {
        Self::new(vec![
            KmlStyle::new("Food", "ff5252ff"),
            KmlStyle::new("Sweet Tooth", "ff99ccff"),
            KmlStyle::new("Bar", "ff000099"),
            KmlStyle::new("Nature", "ff57bb8a"),
            KmlStyle::new("Culture", "ffffcc33"),
            KmlStyle::new("Unique", "ffba68c8"),
        ])
    }
}

fn style_id(category: &str) -> String {
    category.replace(' ', "_")
}

/// Writes POIs as a KML document
#[derive(Debug, Clone, Default)]
pub struct KmlEmitter {
    styles: KmlStyleTable,
}

impl KmlEmitter {
    pub fn new(styles: KmlStyleTable) -> Self {
        Self { styles }
    }

    /// Render the document. Output depends only on the arguments.
    pub fn emit(&self, country: &str, pois: &[Poi]) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(render_error)?;
        start(&mut writer, BytesStart::new("kml").with_attributes([("xmlns", KML_NAMESPACE)]))?;
        start(&mut writer, BytesStart::new("Document"))?;
        text_element(&mut writer, "name", &format!("{} Trip Plan", country))?;
        text_element(&mut writer, "description", "Generated by tripmap")?;

        for style in self.styles.styles() {
            self.write_style(&mut writer, style)?;
        }

        for poi in pois {
            self.write_placemark(&mut writer, poi)?;
        }

        end(&mut writer, "Document")?;
        end(&mut writer, "kml")?;

        String::from_utf8(writer.into_inner()).map_err(render_error)
    }

    fn write_style(&self, writer: &mut Writer<Vec<u8>>, style: &KmlStyle) -> Result<()> {
        let id = style.id();
        start(writer, BytesStart::new("Style").with_attributes([("id", id.as_str())]))?;
        start(writer, BytesStart::new("IconStyle"))?;
        text_element(writer, "color", &style.color)?;
        text_element(writer, "scale", ICON_SCALE)?;
        start(writer, BytesStart::new("Icon"))?;
        text_element(writer, "href", PUSHPIN_HREF)?;
        end(writer, "Icon")?;
        end(writer, "IconStyle")?;
        end(writer, "Style")
    }

    fn write_placemark(&self, writer: &mut Writer<Vec<u8>>, poi: &Poi) -> Result<()> {
        start(writer, BytesStart::new("Placemark"))?;
        text_element(writer, "name", &poi.name)?;

        // Address is escaped, notes keep their inline markup
        let description = format!(
            "<b>Category:</b> {}<br><b>Address:</b> {}<br><br>{}",
            poi.category,
            quick_xml::escape::escape(poi.address.as_str()),
            poi.notes
        );
        start(writer, BytesStart::new("description"))?;
        for section in cdata_sections(&description) {
            writer.write_event(Event::CData(BytesCData::new(section))).map_err(render_error)?;
        }
        end(writer, "description")?;

        text_element(writer, "styleUrl", &self.styles.style_url(&poi.category))?;

        // KML wants longitude first
        start(writer, BytesStart::new("Point"))?;
        let coordinates = format!("{},{},0", coordinate(poi.lon()), coordinate(poi.lat()));
        text_element(writer, "coordinates", &coordinates)?;
        end(writer, "Point")?;
        end(writer, "Placemark")
    }
}

/// Decimal text for a coordinate, keeping `.0` on whole degrees
fn coordinate(value: f64) -> String {
    let text = value.to_string();
    if text.contains('.') {
        text
    } else {
        format!("{}.0", text)
    }
}

/// Split text so no CDATA section contains the `]]>` terminator
fn cdata_sections(content: &str) -> Vec<&str> {
    let mut sections = Vec::new();
    let mut rest = content;
    while let Some(pos) = rest.find("]]>") {
        sections.push(&rest[..pos + 2]);
        rest = &rest[pos + 2..];
    }
    sections.push(rest);
    sections
}

fn start(writer: &mut Writer<Vec<u8>>, element: BytesStart<'_>) -> Result<()> {
    writer.write_event(Event::Start(element)).map_err(render_error)
}

fn end(writer: &mut Writer<Vec<u8>>, name: &str) -> Result<()> {
    writer.write_event(Event::End(BytesEnd::new(name))).map_err(render_error)
}

fn text_element(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> Result<()> {
    start(writer, BytesStart::new(name))?;
    writer.write_event(Event::Text(BytesText::new(text))).map_err(render_error)?;
    end(writer, name)
}

fn render_error<E: Display>(e: E) -> TripmapError {
    TripmapError::Render { artifact: "KML".to_string(), reason: e.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emit(pois: &[Poi]) -> String {
        KmlEmitter::default().emit("Singapore", pois).unwrap()
    }

    #[test]
    fn test_style_ids() {
        let table = KmlStyleTable::default();
        let ids: Vec<String> = table.styles().iter().map(KmlStyle::id).collect();
        assert_eq!(ids, vec!["Food", "Sweet_Tooth", "Bar", "Nature", "Culture", "Unique"]);
    }

    #[test]
    fn test_style_url_is_exact_match() {
        let table = KmlStyleTable::default();
        assert_eq!(table.style_url("Sweet Tooth"), "#Sweet_Tooth");
        assert_eq!(table.style_url("Obscure Thing"), "#Unique");
        assert_eq!(table.style_url("food"), "#Unique");
        assert_eq!(table.style_url(""), "#Unique");
    }

    #[test]
    fn test_header() {
        let kml = emit(&[]);
        assert!(kml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(kml.contains(r#"<kml xmlns="http://www.opengis.net/kml/2.2">"#));
        assert!(kml.contains("<name>Singapore Trip Plan</name>"));
        assert!(kml.contains(r#"<Style id="Sweet_Tooth">"#));
        assert!(kml.contains("<color>ff99ccff</color>"));
        assert!(!kml.contains("<Placemark>"));
    }

    #[test]
    fn test_coordinates_are_lon_lat() {
        let kml = emit(&[Poi::new("Somewhere", 1.31, 103.84)]);
        assert!(kml.contains("<coordinates>103.84,1.31,0</coordinates>"));
    }

    #[test]
    fn test_whole_degree_coordinates_keep_fraction() {
        let kml = emit(&[Poi::new("Equator", 0.0, 103.0), Poi::new("South", -1.5, -70.0)]);
        assert!(kml.contains("<coordinates>103.0,0.0,0</coordinates>"));
        assert!(kml.contains("<coordinates>-70.0,-1.5,0</coordinates>"));
        assert_eq!(coordinate(0.00001), "0.00001");
    }

    #[test]
    fn test_name_and_address_escaped_notes_raw() {
        let poi = Poi::new("Fish & Chips <Best>", 1.0, 2.0)
            .with_category("Food")
            .with_address("12 A&B Road")
            .with_notes("Try the <b>laksa</b>");
        let kml = emit(&[poi]);

        assert!(kml.contains("<name>Fish &amp; Chips &lt;Best&gt;</name>"));
        assert!(kml.contains(
            "<![CDATA[<b>Category:</b> Food<br><b>Address:</b> 12 A&amp;B Road<br><br>\
             Try the <b>laksa</b>]]>"
        ));
        assert!(kml.contains("<styleUrl>#Food</styleUrl>"));
    }

    #[test]
    fn test_cdata_terminator_is_split() {
        assert_eq!(cdata_sections("plain"), vec!["plain"]);
        assert_eq!(cdata_sections("a]]>b"), vec!["a]]", ">b"]);
        assert_eq!(cdata_sections("]]>]]>"), vec!["]]", ">]]", ">"]);
    }

    #[test]
    fn test_output_is_deterministic() {
        let pois = vec![
            Poi::new("A", 1.0, 2.0).with_category("Bar"),
            Poi::new("B", 3.0, 4.0).with_category("Nature"),
        ];
        assert_eq!(emit(&pois), emit(&pois));
    }
}
