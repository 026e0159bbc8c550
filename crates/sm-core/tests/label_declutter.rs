//! Integration tests: label declutter over a real catalog.
//!
//! Exercises catalog parsing, projection through the viewport transform,
//! candidate filtering and greedy selection together.

use pretty_assertions::assert_eq;
use sm_core::labels::{InteractionState, compute_visible_labels};
use sm_core::{Catalog, LabelConfig, LocationId, Transform, ViewportRect};

const RECT: ViewportRect = ViewportRect::new(0.0, 0.0, 1000.0, 1000.0);

fn catalog() -> Catalog {
    Catalog::from_json(include_str!("fixtures/resorts.json")).unwrap()
}

fn ids(names: &[&str]) -> Vec<LocationId> {
    names.iter().map(|n| LocationId::intern(n)).collect()
}

fn visible(state: &InteractionState, transform: Transform) -> Vec<LocationId> {
    compute_visible_labels(
        &catalog(),
        &transform,
        &RECT,
        1000.0,
        state,
        &LabelConfig::default(),
    )
}

// ─── Candidacy ──────────────────────────────────────────────────────────

#[test]
fn nothing_flagged_at_rest_shows_nothing() {
    let state = InteractionState::default();
    assert!(visible(&state, Transform::IDENTITY).is_empty());
}

#[test]
fn scale_threshold_is_strict() {
    let state = InteractionState::default();
    assert!(visible(&state, Transform::new(2.8, 0.0, 0.0)).is_empty());
    assert!(!visible(&state, Transform::new(2.9, 0.0, 0.0)).is_empty());
}

// ─── Priority ───────────────────────────────────────────────────────────

#[test]
fn hovered_label_beats_overlapping_visited_label() {
    let state = InteractionState {
        hovered: Some(LocationId::intern("nozawa_onsen")),
        visited: ids(&["hakuba_goryu"]),
        ..Default::default()
    };
    assert_eq!(
        visible(&state, Transform::IDENTITY),
        ids(&["nozawa_onsen"])
    );
}

#[test]
fn show_all_keeps_first_of_each_cluster() {
    let state = InteractionState {
        show_all: true,
        ..Default::default()
    };
    assert_eq!(
        visible(&state, Transform::IDENTITY),
        ids(&[
            "niseko_grand_hirafu",
            "appi_kogen",
            "zao_onsen",
            "alts_bandai",
            "hakuba_happo_one",
        ])
    );
}

#[test]
fn focus_neighbours_become_candidates() {
    let catalog = catalog();
    let focus = LocationId::intern("zao_onsen");
    let state = InteractionState {
        focused: Some(focus),
        neighbors: catalog.nearest(focus, 2),
        ..Default::default()
    };
    assert_eq!(state.neighbors, ids(&["alts_bandai", "appi_kogen"]));
    let shown = visible(&state, Transform::IDENTITY);
    // Equal priorities fall back to catalog order.
    assert_eq!(shown, ids(&["zao_onsen", "appi_kogen", "alts_bandai"]));
}

// ─── Determinism ────────────────────────────────────────────────────────

#[test]
fn identical_input_yields_identical_output() {
    let state = InteractionState {
        visited: ids(&["rusutsu", "shiga_kogen", "furano"]),
        highlighted: ids(&["hakuba_goryu"]),
        show_all: true,
        ..Default::default()
    };
    let t = Transform::new(1.7, -310.0, -220.0);
    let first = visible(&state, t);
    for _ in 0..10 {
        assert_eq!(visible(&state, t), first);
    }
}
