//! Locations, focus targets, and the visited-set contract.

use crate::geometry::Point;
use crate::id::LocationId;
use serde::{Deserialize, Serialize};

/// Geographic region a location belongs to. Drives marker colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Region {
    Hokkaido,
    Tohoku,
    Kanto,
    Chubu,
    Kansai,
    ChugokuShikoku,
    Kyushu,
}

impl Region {
    pub const ALL: [Region; 7] = [
        Region::Hokkaido,
        Region::Tohoku,
        Region::Kanto,
        Region::Chubu,
        Region::Kansai,
        Region::ChugokuShikoku,
        Region::Kyushu,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Region::Hokkaido => "hokkaido",
            Region::Tohoku => "tohoku",
            Region::Kanto => "kanto",
            Region::Chubu => "chubu",
            Region::Kansai => "kansai",
            Region::ChugokuShikoku => "chugoku-shikoku",
            Region::Kyushu => "kyushu",
        }
    }
}

/// One entry of the read-only location catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: LocationId,
    pub display_name: String,
    pub region: Region,
    /// Position in logical space.
    pub position: Point,
}

/// The location currently selected for scratching.
///
/// Owned by the controller layer and handed to the gesture and scratch
/// machinery as configuration; neither mutates it.
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub id: LocationId,
    pub logical_position: Point,
    pub display_name: String,
    pub region: Region,
}

impl From<&Location> for Target {
    fn from(loc: &Location) -> Self {
        Self {
            id: loc.id,
            logical_position: loc.position,
            display_name: loc.display_name.clone(),
            region: loc.region,
        }
    }
}

/// External store of visited location ids.
///
/// The core reads it to decide a session's starting state and asks it to
/// record completions; persistence is the implementor's business.
pub trait VisitedStore {
    fn is_visited(&self, id: LocationId) -> bool;

    /// Record a visit. Returns `true` if the id was not already present.
    fn mark_visited(&mut self, id: LocationId) -> bool;

    /// Flip the visited flag. Returns the new state.
    fn toggle(&mut self, id: LocationId) -> bool {
        if self.is_visited(id) {
            self.unmark(id);
            false
        } else {
            self.mark_visited(id);
            true
        }
    }

    fn unmark(&mut self, id: LocationId);
}

/// In-memory visited set, kept in insertion order so it serializes stably.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisitedSet {
    ids: Vec<LocationId>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = LocationId> + '_ {
        self.ids.iter().copied()
    }
}

impl FromIterator<LocationId> for VisitedSet {
    fn from_iter<I: IntoIterator<Item = LocationId>>(iter: I) -> Self {
        let mut set = VisitedSet::new();
        for id in iter {
            set.mark_visited(id);
        }
        set
    }
}

impl VisitedStore for VisitedSet {
    fn is_visited(&self, id: LocationId) -> bool {
        self.ids.contains(&id)
    }

    fn mark_visited(&mut self, id: LocationId) -> bool {
        if self.is_visited(id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    fn unmark(&mut self, id: LocationId) {
        self.ids.retain(|v| *v != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visited_set_deduplicates() {
        let mut set = VisitedSet::new();
        let id = LocationId::intern("rusutsu");
        assert!(set.mark_visited(id));
        assert!(!set.mark_visited(id));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn toggle_flips_state() {
        let mut set = VisitedSet::new();
        let id = LocationId::intern("zao");
        assert!(set.toggle(id));
        assert!(set.is_visited(id));
        assert!(!set.toggle(id));
        assert!(set.is_empty());
    }

    #[test]
    fn visited_set_serializes_as_array() {
        let set: VisitedSet = ["a", "b", "a"].into_iter().map(LocationId::intern).collect();
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"["a","b"]"#);
    }

    #[test]
    fn region_keys_match_serde_names() {
        for region in Region::ALL {
            let json = serde_json::to_string(&region).unwrap();
            assert_eq!(json, format!("\"{}\"", region.key()));
        }
    }
}
