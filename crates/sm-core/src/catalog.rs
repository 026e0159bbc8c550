//! The ordered, read-only location catalog.

use crate::error::CoreError;
use crate::id::LocationId;
use crate::model::{Location, Region, VisitedStore};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    locations: Vec<Location>,
    index: HashMap<LocationId, usize>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids.
    pub fn new(locations: Vec<Location>) -> Result<Self, CoreError> {
        let mut index = HashMap::with_capacity(locations.len());
        for (i, loc) in locations.iter().enumerate() {
            if index.insert(loc.id, i).is_some() {
                return Err(CoreError::DuplicateLocation(loc.id));
            }
        }
        Ok(Self { locations, index })
    }

    /// Parse a JSON array of locations.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let locations: Vec<Location> = serde_json::from_str(json)?;
        Self::new(locations)
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn get(&self, id: LocationId) -> Option<&Location> {
        self.index.get(&id).map(|&i| &self.locations[i])
    }

    /// Position of `id` in catalog order.
    pub fn position_of(&self, id: LocationId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Location> {
        self.locations.iter()
    }

    /// The `k` locations closest to `id`, nearest first.
    ///
    /// Equal distances keep catalog order. Returns an empty list for an
    /// unknown id.
    pub fn nearest(&self, id: LocationId, k: usize) -> Vec<LocationId> {
        let Some(origin) = self.get(id) else {
            return Vec::new();
        };
        let mut others: Vec<(f64, &Location)> = self
            .locations
            .iter()
            .filter(|loc| loc.id != id)
            .map(|loc| (loc.position.distance(origin.position), loc))
            .collect();
        others.sort_by(|a, b| a.0.total_cmp(&b.0));
        others.into_iter().take(k).map(|(_, loc)| loc.id).collect()
    }

    /// Visit counts overall and per region (regions in declaration order).
    pub fn stats(&self, visited: &dyn VisitedStore) -> VisitStats {
        let mut by_region: Vec<RegionStats> = Region::ALL
            .iter()
            .map(|&region| RegionStats {
                region,
                visited: 0,
                total: 0,
            })
            .collect();
        let mut total_visited = 0;
        for loc in &self.locations {
            let is_visited = visited.is_visited(loc.id);
            if let Some(entry) = by_region.iter_mut().find(|r| r.region == loc.region) {
                entry.total += 1;
                if is_visited {
                    entry.visited += 1;
                }
            }
            if is_visited {
                total_visited += 1;
            }
        }
        by_region.retain(|r| r.total > 0);
        VisitStats {
            visited: total_visited,
            total: self.locations.len(),
            by_region,
        }
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Location;
    type IntoIter = std::slice::Iter<'a, Location>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitStats {
    pub visited: usize,
    pub total: usize,
    pub by_region: Vec<RegionStats>,
}

impl VisitStats {
    /// Visited fraction in `[0, 1]`; an empty catalog counts as 0.
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.visited as f64 / self.total as f64
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionStats {
    pub region: Region,
    pub visited: usize,
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::model::VisitedSet;
    use pretty_assertions::assert_eq;

    fn loc(id: &str, region: Region, x: f64, y: f64) -> Location {
        Location {
            id: LocationId::intern(id),
            display_name: id.to_string(),
            region,
            position: Point::new(x, y),
        }
    }

    fn sample() -> Catalog {
        Catalog::new(vec![
            loc("a", Region::Hokkaido, 0.0, 0.0),
            loc("b", Region::Hokkaido, 10.0, 0.0),
            loc("c", Region::Chubu, 0.0, 10.0),
            loc("d", Region::Chubu, 30.0, 0.0),
        ])
        .unwrap()
    }

    #[test]
    fn nearest_orders_by_distance_then_catalog_order() {
        let catalog = sample();
        let ids = catalog.nearest(LocationId::intern("a"), 2);
        assert_eq!(ids, vec![LocationId::intern("b"), LocationId::intern("c")]);
        assert!(catalog.nearest(LocationId::intern("nowhere"), 3).is_empty());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = Catalog::new(vec![
            loc("dup", Region::Kanto, 0.0, 0.0),
            loc("dup", Region::Kanto, 1.0, 1.0),
        ])
        .unwrap_err();
        assert!(matches!(err, CoreError::DuplicateLocation(id) if id.as_str() == "dup"));
    }

    #[test]
    fn parses_json_catalog() {
        let json = r#"[
            {"id":"niseko","displayName":"Niseko","region":"hokkaido","position":{"x":750,"y":180}},
            {"id":"hakuba","displayName":"Hakuba","region":"chubu","position":{"x":520,"y":560}}
        ]"#;
        let catalog = Catalog::from_json(json).unwrap();
        assert_eq!(catalog.len(), 2);
        let niseko = catalog.get(LocationId::intern("niseko")).unwrap();
        assert_eq!(niseko.position, Point::new(750.0, 180.0));
        assert_eq!(catalog.position_of(LocationId::intern("hakuba")), Some(1));
    }

    #[test]
    fn stats_count_per_region() {
        let catalog = sample();
        let visited: VisitedSet = ["a", "c", "d"].into_iter().map(LocationId::intern).collect();
        let stats = catalog.stats(&visited);
        assert_eq!(stats.visited, 3);
        assert_eq!(stats.total, 4);
        assert_eq!(
            stats.by_region,
            vec![
                RegionStats {
                    region: Region::Hokkaido,
                    visited: 1,
                    total: 2
                },
                RegionStats {
                    region: Region::Chubu,
                    visited: 2,
                    total: 2
                },
            ]
        );
        assert!((stats.ratio() - 0.75).abs() < 1e-12);
    }
}
