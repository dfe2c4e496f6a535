//! Zone assignment
//!
//! Each POI goes to the first zone (in catalog order) whose display name equals the POI's
//! zone hint, ignoring case. A POI that matches nothing goes to the region's last zone.
//! There is no geographic matching: a POI sitting inside a zone's boundary but carrying a
//! different hint is still routed by its hint.

use serde::Serialize;

use crate::models::{Poi, Region, Zone};

/// POIs grouped under one zone
#[derive(Debug, Clone)]
pub struct ZoneBucket<'a> {
    pub zone: &'a Zone,
    /// Members in input order
    pub members: Vec<&'a Poi>,
}

impl ZoneBucket<'_> {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Result of assigning a batch of POIs to a region's zones
///
/// Buckets follow the region's zone order. The catalog is never modified; every run gets a
/// fresh partition.
#[derive(Debug, Clone)]
pub struct ZonePartition<'a> {
    region: &'a Region,
    buckets: Vec<ZoneBucket<'a>>,
}

impl<'a> ZonePartition<'a> {
    pub fn region(&self) -> &'a Region {
        self.region
    }

    pub fn buckets(&self) -> &[ZoneBucket<'a>] {
        &self.buckets
    }

    pub fn bucket(&self, zone_id: &str) -> Option<&ZoneBucket<'a>> {
        self.buckets.iter().find(|b| b.zone.id == zone_id)
    }

    /// Total number of assigned POIs
    pub fn total(&self) -> usize {
        self.buckets.iter().map(ZoneBucket::len).sum()
    }

    /// Per-zone member counts in zone order
    pub fn counts(&self) -> Vec<ZoneCount> {
        self.buckets
            .iter()
            .map(|b| ZoneCount {
                id: b.zone.id.clone(),
                name: b.zone.name.clone(),
                count: b.len(),
                has_boundary: b.zone.has_boundary(),
            })
            .collect()
    }
}

/// Member count summary for one zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZoneCount {
    pub id: String,
    pub name: String,
    pub count: usize,
    pub has_boundary: bool,
}

/// Assign every POI to exactly one zone of `region`
pub fn assign<'a>(region: &'a Region, pois: &'a [Poi]) -> ZonePartition<'a> {
    let zones = region.zones();
    let mut buckets: Vec<ZoneBucket<'a>> =
        zones.iter().map(|zone| ZoneBucket { zone, members: Vec::new() }).collect();
    let fallback = buckets.len() - 1;
    let mut unmatched = 0usize;

    for poi in pois {
        let index = match zones.iter().position(|z| z.matches_hint(&poi.zone_hint)) {
            Some(index) => index,
            None => {
                unmatched += 1;
                fallback
            }
        };
        buckets[index].members.push(poi);
    }

    tracing::debug!(
        region = region.name(),
        pois = pois.len(),
        unmatched,
        fallback = %region.fallback_zone().name,
        "Assigned POIs to zones"
    );

    ZonePartition { region, buckets }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MapView;
    use proptest::prelude::*;

    fn japan() -> Region {
        let zone = |id: &str, name: &str| {
            Zone::new(id, name, "#e74c3c", MapView::new(35.0, 135.0, 12))
        };
        Region::new(
            "Japan",
            MapView::new(35.68, 139.65, 10),
            vec![zone("tokyo", "Tokyo"), zone("osaka", "Osaka"), zone("other", "Other Regions")],
        )
        .unwrap()
    }

    #[test]
    fn test_hint_match_ignores_case() {
        let region = japan();
        let pois = vec![
            Poi::new("Senso-ji", 35.7148, 139.7967).with_zone_hint("tokyo"),
            Poi::new("Dotonbori", 34.6687, 135.5013).with_zone_hint("OSAKA"),
        ];

        let partition = assign(&region, &pois);

        assert_eq!(partition.bucket("tokyo").unwrap().members[0].name, "Senso-ji");
        assert_eq!(partition.bucket("osaka").unwrap().members[0].name, "Dotonbori");
        assert!(partition.bucket("other").unwrap().is_empty());
    }

    #[test]
    fn test_unmatched_goes_to_last_zone() {
        let region = japan();
        let pois = vec![
            Poi::new("Fushimi Inari", 34.9671, 135.7727).with_zone_hint("Kyoto"),
            Poi::new("Mt Fuji", 35.3606, 138.7274),
        ];

        let partition = assign(&region, &pois);
        let other = partition.bucket("other").unwrap();

        assert_eq!(other.len(), 2);
        assert_eq!(other.members[0].name, "Fushimi Inari");
        assert_eq!(other.members[1].name, "Mt Fuji");
    }

    #[test]
    fn test_geography_is_ignored() {
        let region = japan();
        // Sits in Tokyo but is hinted to Osaka
        let pois = vec![Poi::new("Tokyo Tower", 35.6586, 139.7454).with_zone_hint("Osaka")];

        let partition = assign(&region, &pois);
        assert_eq!(partition.bucket("osaka").unwrap().len(), 1);
        assert_eq!(partition.bucket("tokyo").unwrap().len(), 0);
    }

    #[test]
    fn test_single_zone_region() {
        let region = Region::new(
            "Solo",
            MapView::new(0.0, 0.0, 3),
            vec![Zone::new("all", "Everywhere", "#000000", MapView::new(0.0, 0.0, 3))],
        )
        .unwrap();
        let pois = vec![Poi::new("A", 1.0, 1.0).with_zone_hint("Nowhere"), Poi::new("B", 2.0, 2.0)];

        let partition = assign(&region, &pois);
        assert_eq!(partition.buckets().len(), 1);
        assert_eq!(partition.total(), 2);
    }

    #[test]
    fn test_counts_follow_zone_order() {
        let region = japan();
        let pois = vec![
            Poi::new("A", 0.0, 0.0).with_zone_hint("Osaka"),
            Poi::new("B", 0.0, 0.0).with_zone_hint("Osaka"),
            Poi::new("C", 0.0, 0.0).with_zone_hint("Tokyo"),
        ];

        let counts = assign(&region, &pois).counts();
        let summary: Vec<(&str, usize)> = counts.iter().map(|c| (c.id.as_str(), c.count)).collect();
        assert_eq!(summary, vec![("tokyo", 1), ("osaka", 2), ("other", 0)]);
    }

    fn hint_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("Tokyo".to_string()),
            Just("OSAKA".to_string()),
            Just("other regions".to_string()),
            Just(String::new()),
            "[a-zA-Z ]{0,12}",
        ]
    }

    proptest! {
        #[test]
        fn prop_partition_is_total(hints in prop::collection::vec(hint_strategy(), 1..64)) {
            let region = japan();
            let pois: Vec<Poi> = hints
                .iter()
                .enumerate()
                .map(|(i, hint)| {
                    Poi::new(format!("poi-{i}"), 0.0, 0.0).with_zone_hint(hint.clone())
                })
                .collect();

            let partition = assign(&region, &pois);
            prop_assert_eq!(partition.total(), pois.len());

            // Every POI appears in exactly one bucket
            for poi in &pois {
                let hits = partition
                    .buckets()
                    .iter()
                    .filter(|b| b.members.iter().any(|m| std::ptr::eq(*m, poi)))
                    .count();
                prop_assert_eq!(hits, 1);
            }
        }

        #[test]
        fn prop_unmatched_hint_lands_in_fallback(hint in "[0-9]{1,8}") {
            let region = japan();
            let pois = vec![Poi::new("x", 0.0, 0.0).with_zone_hint(hint)];
            let partition = assign(&region, &pois);
            prop_assert_eq!(partition.bucket("other").map(ZoneBucket::len), Some(1));
        }
    }
}
