//! Marker state and the render-ready data driving the vector layer.
//!
//! The core never touches DOM or SVG nodes. Each frame it produces a list of
//! [`MarkerView`]s from the catalog and the interaction state; the wasm
//! bridge turns them into SVG.

use crate::palette::{NEUTRAL, region_color};
use peniko::Color;
use sm_core::labels::InteractionState;
use sm_core::{Catalog, LocationId, Point, Region};

/// Visual state of one marker, highest precedence first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerState {
    Focused,
    Hovered,
    Highlighted,
    Visited,
    Default,
}

pub fn marker_state(
    focused: bool,
    hovered: bool,
    highlighted: bool,
    visited: bool,
) -> MarkerState {
    if focused {
        MarkerState::Focused
    } else if hovered {
        MarkerState::Hovered
    } else if highlighted {
        MarkerState::Highlighted
    } else if visited {
        MarkerState::Visited
    } else {
        MarkerState::Default
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerStyle {
    /// Expanding ring around visited markers.
    pub pulse: bool,
    /// Soft halo around search hits.
    pub glow: bool,
    pub scale: f64,
    pub fill: Color,
}

pub fn marker_style(state: MarkerState, region: Region) -> MarkerStyle {
    let accent = region_color(region);
    let (pulse, glow, scale, fill) = match state {
        MarkerState::Focused => (false, false, 1.5, accent),
        MarkerState::Hovered => (false, false, 1.2, accent),
        MarkerState::Highlighted => (false, true, 1.15, accent),
        MarkerState::Visited => (true, false, 1.0, accent),
        MarkerState::Default => (false, false, 1.0, NEUTRAL),
    };
    MarkerStyle {
        pulse,
        glow,
        scale,
        fill,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerView {
    pub id: LocationId,
    pub name: String,
    /// Logical position.
    pub position: Point,
    pub state: MarkerState,
    pub style: MarkerStyle,
    /// Region accent, used for the pulse ring and label border.
    pub accent: Color,
    pub label_visible: bool,
}

/// One view per catalog entry, in catalog order.
pub fn build_markers(
    catalog: &Catalog,
    state: &InteractionState,
    visible_labels: &[LocationId],
) -> Vec<MarkerView> {
    catalog
        .iter()
        .map(|loc| {
            let marker = marker_state(
                state.focused == Some(loc.id),
                state.hovered == Some(loc.id),
                state.highlighted.contains(&loc.id),
                state.visited.contains(&loc.id),
            );
            MarkerView {
                id: loc.id,
                name: loc.display_name.clone(),
                position: loc.position,
                state: marker,
                style: marker_style(marker, loc.region),
                accent: region_color(loc.region),
                label_visible: visible_labels.contains(&loc.id),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sm_core::Location;

    #[test]
    fn state_precedence() {
        assert_eq!(marker_state(true, true, true, true), MarkerState::Focused);
        assert_eq!(marker_state(false, true, true, true), MarkerState::Hovered);
        assert_eq!(
            marker_state(false, false, true, true),
            MarkerState::Highlighted
        );
        assert_eq!(marker_state(false, false, false, true), MarkerState::Visited);
        assert_eq!(
            marker_state(false, false, false, false),
            MarkerState::Default
        );
    }

    #[test]
    fn default_markers_are_grey() {
        let style = marker_style(MarkerState::Default, Region::Kanto);
        assert_eq!(style.fill, NEUTRAL);
        let visited = marker_style(MarkerState::Visited, Region::Kanto);
        assert_eq!(visited.fill, region_color(Region::Kanto));
        assert!(visited.pulse);
        assert!(marker_style(MarkerState::Highlighted, Region::Kanto).glow);
    }

    #[test]
    fn build_markers_reflects_interaction() {
        let a = LocationId::intern("marker-a");
        let b = LocationId::intern("marker-b");
        let catalog = Catalog::new(vec![
            Location {
                id: a,
                display_name: "A".into(),
                region: Region::Kyushu,
                position: Point::new(10.0, 10.0),
            },
            Location {
                id: b,
                display_name: "B".into(),
                region: Region::Kansai,
                position: Point::new(20.0, 20.0),
            },
        ])
        .unwrap();
        let state = InteractionState {
            focused: Some(b),
            visited: vec![a],
            ..Default::default()
        };
        let views = build_markers(&catalog, &state, &[b]);
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].state, MarkerState::Visited);
        assert!(!views[0].label_visible);
        assert_eq!(views[1].state, MarkerState::Focused);
        assert_eq!(views[1].style.scale, 1.5);
        assert!(views[1].label_visible);
    }
}
