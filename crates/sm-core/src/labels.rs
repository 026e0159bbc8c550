//! Label declutter: choose which marker labels to show without overlap.
//!
//! Greedy by priority. Candidates are sorted by priority (stable, so ties
//! keep catalog order) and each one is accepted if its box, grown by the
//! margin, clears every box already accepted. This is O(n²) in the number of
//! candidates and is not a maximum independent set; a higher-priority label
//! always wins over a lower-priority one it overlaps.

use crate::catalog::Catalog;
use crate::config::LabelConfig;
use crate::geometry::{Bounds, Point, ViewportRect};
use crate::id::LocationId;
use crate::viewport::Transform;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LabelPriority {
    Default = 1,
    /// Search highlight or near-focus neighbour.
    Highlighted = 2,
    Visited = 3,
    Focused = 4,
    Hovered = 5,
}

/// Everything about the current interaction that affects labels.
#[derive(Debug, Clone, Default)]
pub struct InteractionState {
    pub hovered: Option<LocationId>,
    pub focused: Option<LocationId>,
    pub visited: Vec<LocationId>,
    pub highlighted: Vec<LocationId>,
    pub neighbors: Vec<LocationId>,
    pub show_all: bool,
}

impl InteractionState {
    /// Priority of `id`, or `None` when nothing flags it.
    pub fn flagged_priority(&self, id: LocationId) -> Option<LabelPriority> {
        if self.hovered == Some(id) {
            Some(LabelPriority::Hovered)
        } else if self.focused == Some(id) {
            Some(LabelPriority::Focused)
        } else if self.visited.contains(&id) {
            Some(LabelPriority::Visited)
        } else if self.highlighted.contains(&id) || self.neighbors.contains(&id) {
            Some(LabelPriority::Highlighted)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelCandidate {
    pub id: LocationId,
    pub bounds: Bounds,
    pub priority: LabelPriority,
}

/// Estimated label footprint for a marker at container-relative `anchor`.
pub fn label_bounds(anchor: Point, text: &str, config: &LabelConfig) -> Bounds {
    let chars = text.chars().count() as f64;
    Bounds::new(
        anchor.x + config.offset_x,
        anchor.y + config.offset_y,
        chars * config.char_width + config.padding * 2.0,
        config.height,
    )
}

/// Candidates in catalog order.
pub fn collect_candidates(
    catalog: &Catalog,
    transform: &Transform,
    rect: &ViewportRect,
    logical_size: f64,
    state: &InteractionState,
    config: &LabelConfig,
) -> Vec<LabelCandidate> {
    let zoomed_in = transform.scale > config.show_scale_threshold;
    catalog
        .iter()
        .filter_map(|loc| {
            let flagged = state.flagged_priority(loc.id);
            if flagged.is_none() && !state.show_all && !zoomed_in {
                return None;
            }
            let anchor = transform.project(loc.position, rect, logical_size);
            Some(LabelCandidate {
                id: loc.id,
                bounds: label_bounds(anchor, &loc.display_name, config),
                priority: flagged.unwrap_or(LabelPriority::Default),
            })
        })
        .collect()
}

/// Greedy selection. Returned ids are in acceptance order.
pub fn select_non_colliding(candidates: &[LabelCandidate], margin: f64) -> Vec<LocationId> {
    let mut order: Vec<&LabelCandidate> = candidates.iter().collect();
    // `sort_by` is stable: equal priorities keep input order.
    order.sort_by(|a, b| b.priority.cmp(&a.priority));

    let mut accepted: Vec<&LabelCandidate> = Vec::with_capacity(order.len());
    for candidate in order {
        let collides = accepted
            .iter()
            .any(|kept| candidate.bounds.collides_with(&kept.bounds, margin));
        if collides {
            log::trace!("labels: dropping {} (overlap)", candidate.id);
            continue;
        }
        accepted.push(candidate);
    }
    accepted.into_iter().map(|c| c.id).collect()
}

/// Ids whose labels should be drawn this frame.
pub fn compute_visible_labels(
    catalog: &Catalog,
    transform: &Transform,
    rect: &ViewportRect,
    logical_size: f64,
    state: &InteractionState,
    config: &LabelConfig,
) -> Vec<LocationId> {
    let candidates = collect_candidates(catalog, transform, rect, logical_size, state, config);
    select_non_colliding(&candidates, config.margin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn candidate(id: &str, x: f64, priority: LabelPriority) -> LabelCandidate {
        LabelCandidate {
            id: LocationId::intern(id),
            bounds: Bounds::new(x, 0.0, 100.0, 28.0),
            priority,
        }
    }

    #[test]
    fn bounds_follow_text_length() {
        let b = label_bounds(Point::new(100.0, 50.0), "Niseko", &LabelConfig::default());
        assert_eq!(b, Bounds::new(112.0, 30.0, 6.0 * 14.0 + 16.0, 28.0));
        // Width counts characters, not bytes.
        let cjk = label_bounds(Point::ZERO, "白馬", &LabelConfig::default());
        assert_eq!(cjk.width, 2.0 * 14.0 + 16.0);
    }

    #[test]
    fn higher_priority_wins_overlap() {
        let low = candidate("low", 0.0, LabelPriority::Default);
        let high = candidate("high", 50.0, LabelPriority::Visited);
        let picked = select_non_colliding(&[low, high], 4.0);
        assert_eq!(picked, vec![LocationId::intern("high")]);
    }

    #[test]
    fn ties_keep_input_order() {
        let a = candidate("tie-a", 0.0, LabelPriority::Default);
        let b = candidate("tie-b", 50.0, LabelPriority::Default);
        let far = candidate("tie-far", 500.0, LabelPriority::Default);
        let picked = select_non_colliding(&[a.clone(), b.clone(), far.clone()], 4.0);
        assert_eq!(
            picked,
            vec![LocationId::intern("tie-a"), LocationId::intern("tie-far")]
        );
        let again = select_non_colliding(&[a, b, far], 4.0);
        assert_eq!(picked, again);
    }

    #[test]
    fn hover_outranks_everything() {
        let id = LocationId::intern("hover-me");
        let state = InteractionState {
            hovered: Some(id),
            focused: Some(id),
            visited: vec![id],
            ..Default::default()
        };
        assert_eq!(state.flagged_priority(id), Some(LabelPriority::Hovered));
        assert_eq!(
            state.flagged_priority(LocationId::intern("someone-else")),
            None
        );
    }

    #[test]
    fn neighbor_ranks_with_highlight() {
        let id = LocationId::intern("neighbour");
        let state = InteractionState {
            neighbors: vec![id],
            ..Default::default()
        };
        assert_eq!(state.flagged_priority(id), Some(LabelPriority::Highlighted));
    }
}
