//! Category classifier for interactive map pins
//!
//! Maps a free-text category to a marker color and glyph by case-insensitive substring
//! matching against an ordered keyword table. The first matching group wins, so a category
//! like "Nature Food Tour" always resolves to the food style.

use serde::Serialize;

/// Marker color and glyph for one pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PinStyle {
    /// Marker color name understood by the client marker plugin
    pub color: &'static str,
    /// Glyph name from the marker icon set
    pub icon: &'static str,
}

impl PinStyle {
    pub const fn new(color: &'static str, icon: &'static str) -> Self {
        Self { color, icon }
    }
}

/// Style for categories that match no keyword group
pub const DEFAULT_PIN: PinStyle = PinStyle::new("blue", "info-sign");

/// Ordered keyword groups. Order is part of the output contract.
const KEYWORD_GROUPS: &[(&[&str], PinStyle)] = &[
    (&["food", "sweet"], PinStyle::new("red", "cutlery")),
    (&["bar"], PinStyle::new("darkred", "glass")),
    (&["nature"], PinStyle::new("green", "tree-deciduous")),
    (&["culture", "museum"], PinStyle::new("orange", "star")),
    (&["unique"], PinStyle::new("purple", "star")),
];

/// Classify a category string into a pin style
pub fn classify(category: &str) -> PinStyle {
    let category = category.to_lowercase();

    KEYWORD_GROUPS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| category.contains(k)))
        .map(|(_, style)| *style)
        .unwrap_or(DEFAULT_PIN)
}
