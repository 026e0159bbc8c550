//! Map controller: gesture → viewport → scratch, plus focus lifecycle.
//!
//! Owns every piece of interaction state for one map instance. The host
//! feeds it normalized input and frame ticks; it answers with [`MapEvent`]s
//! describing what changed. It never touches the DOM.

use crate::gesture::{GestureController, GestureEvent, GestureMode};
use crate::input::InputEvent;
use crate::scratch::ScratchEngine;
use crate::session::{FocusSession, ScratchSessionEvent};
use sm_core::labels::{InteractionState, compute_visible_labels};
use sm_core::{
    Catalog, Config, CoreError, LocationId, Point, Target, ViewportRect, ViewportTransform,
    VisitedStore,
};
use sm_render::hit::hit_test_marker;
use sm_render::markers::{MarkerView, build_markers};
use sm_render::surface::ScratchSurface;

/// Something the host may want to react to.
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    Scratch(ScratchSessionEvent),
    FocusChanged(Option<LocationId>),
    /// A location was added to the visited set.
    Visited(LocationId),
    TransformChanged,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControllerResponse {
    pub events: Vec<MapEvent>,
    pub prevent_default: bool,
}

pub struct MapController<S, V> {
    config: Config,
    catalog: Catalog,
    visited: V,
    viewport: ViewportTransform,
    gestures: GestureController,
    scratch: ScratchEngine<S>,
    focus: Option<FocusSession>,
    hovered: Option<LocationId>,
    highlighted: Vec<LocationId>,
    show_all_labels: bool,
    auto_exit_at: Option<f64>,
}

impl<S: ScratchSurface, V: VisitedStore> MapController<S, V> {
    pub fn new(config: Config, catalog: Catalog, visited: V) -> Self {
        let config = config.validated();
        Self {
            viewport: ViewportTransform::new(config.map.clone()),
            gestures: GestureController::new(config.gesture.clone()),
            scratch: ScratchEngine::new(config.scratch.clone(), config.map.logical_size),
            config,
            catalog,
            visited,
            focus: None,
            hovered: None,
            highlighted: Vec::new(),
            show_all_labels: false,
            auto_exit_at: None,
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn visited(&self) -> &V {
        &self.visited
    }

    pub fn viewport(&self) -> &ViewportTransform {
        &self.viewport
    }

    pub fn scratch_engine(&self) -> &ScratchEngine<S> {
        &self.scratch
    }

    pub fn focus(&self) -> Option<&FocusSession> {
        self.focus.as_ref()
    }

    pub fn focused_id(&self) -> Option<LocationId> {
        self.focus.as_ref().map(FocusSession::id)
    }

    pub fn gesture_mode(&self) -> GestureMode {
        self.gestures.mode()
    }

    pub fn progress(&self) -> f64 {
        self.scratch.progress()
    }

    /// Whether an animation or pending timer needs more frames.
    pub fn needs_frame(&self) -> bool {
        self.viewport.is_animating() || self.auto_exit_at.is_some()
    }

    // ─── Setup ───────────────────────────────────────────────────────────

    pub fn attach_surface(&mut self, surface: S) {
        self.scratch.attach_surface(surface);
    }

    /// Record the map container's client rect.
    pub fn set_viewport(&mut self, rect: ViewportRect) {
        if rect.is_degenerate() {
            log::warn!("controller: degenerate viewport {rect:?}");
        }
        self.viewport.set_viewport(rect);
    }

    // ─── Input ───────────────────────────────────────────────────────────

    pub fn handle_input(&mut self, event: &InputEvent, now_ms: f64) -> ControllerResponse {
        let response = self.gestures.handle(event, self.focus.as_ref());
        let mut events = Vec::new();
        for gesture in response.events {
            self.apply_gesture(gesture, now_ms, &mut events);
        }
        ControllerResponse {
            events,
            prevent_default: response.prevent_default,
        }
    }

    fn apply_gesture(&mut self, gesture: GestureEvent, now_ms: f64, out: &mut Vec<MapEvent>) {
        match gesture {
            GestureEvent::Pan(delta) => match self.viewport.pan(delta) {
                Ok(()) => out.push(MapEvent::TransformChanged),
                Err(e) => log::warn!("controller: pan ignored: {e}"),
            },
            GestureEvent::Zoom { factor, center } => match self.viewport.zoom(factor, center) {
                Ok(()) => out.push(MapEvent::TransformChanged),
                Err(e) => log::warn!("controller: zoom ignored: {e}"),
            },
            GestureEvent::Scratch(point) => {
                let canvas = self.viewport.content_rect();
                let session_events = self.scratch.scratch(point, &canvas);
                self.apply_session_events(session_events, now_ms, out);
            }
            GestureEvent::StrokeEnd => self.scratch.end_stroke(),
            GestureEvent::Tap(point) => {
                let rect = self.viewport.viewport();
                let hit = hit_test_marker(
                    &self.catalog,
                    &self.viewport.transform(),
                    &rect,
                    self.config.map.logical_size,
                    rect.to_local(point),
                    self.config.labels.marker_hit_radius,
                );
                if let Some(id) = hit {
                    match self.focus_location(id, now_ms) {
                        Ok(events) => out.extend(events),
                        Err(e) => log::warn!("controller: tap focus failed: {e}"),
                    }
                }
            }
        }
    }

    fn apply_session_events(
        &mut self,
        session_events: Vec<ScratchSessionEvent>,
        now_ms: f64,
        out: &mut Vec<MapEvent>,
    ) {
        for event in session_events {
            match event {
                ScratchSessionEvent::ExitFocus => {
                    out.push(MapEvent::Scratch(event));
                    out.extend(self.exit_focus(now_ms));
                    return;
                }
                ScratchSessionEvent::Completed(id) => {
                    out.push(MapEvent::Scratch(event));
                    if self.visited.mark_visited(id) {
                        out.push(MapEvent::Visited(id));
                    }
                    self.auto_exit_at = Some(now_ms + self.config.map.auto_exit_delay_ms);
                }
                other => out.push(MapEvent::Scratch(other)),
            }
        }
    }

    /// Advance frame-driven state: pan coalescing, transitions, auto exit.
    pub fn tick(&mut self, now_ms: f64) -> Vec<MapEvent> {
        let mut out = Vec::new();
        if let Some(pan) = self.gestures.flush_frame() {
            self.apply_gesture(pan, now_ms, &mut out);
        }
        if self.viewport.tick(now_ms) {
            out.push(MapEvent::TransformChanged);
        }
        if let Some(at) = self.auto_exit_at
            && now_ms >= at
        {
            out.extend(self.exit_focus(now_ms));
        }
        out
    }

    // ─── Focus ───────────────────────────────────────────────────────────

    /// Focus `id`: start a scratch session and animate the map onto it.
    pub fn focus_location(&mut self, id: LocationId, now_ms: f64) -> Result<Vec<MapEvent>, CoreError> {
        let location = self
            .catalog
            .get(id)
            .ok_or_else(|| CoreError::UnknownLocation(id.to_string()))?;
        let target = Target::from(location);
        let position = target.logical_position;
        let session = FocusSession::new(target, self.visited.is_visited(id));

        let mut out = Vec::new();
        self.auto_exit_at = None;
        let session_events = self.scratch.initialize(&session);
        self.focus = Some(session);
        out.extend(session_events.into_iter().map(MapEvent::Scratch));
        if let Err(e) = self.viewport.focus_on(position, now_ms) {
            log::warn!("controller: cannot animate to {id}: {e}");
        }
        out.push(MapEvent::FocusChanged(Some(id)));
        log::info!("controller: focused {id}");
        Ok(out)
    }

    /// Focus by string id, as received from the host.
    pub fn focus_by_name(&mut self, id: &str, now_ms: f64) -> Result<Vec<MapEvent>, CoreError> {
        let id = LocationId::intern(id);
        self.focus_location(id, now_ms)
    }

    /// Leave focus and animate back to the default view.
    pub fn exit_focus(&mut self, now_ms: f64) -> Vec<MapEvent> {
        self.auto_exit_at = None;
        if self.focus.take().is_none() {
            return Vec::new();
        }
        self.scratch.clear();
        self.viewport.reset(now_ms);
        log::info!("controller: focus cleared");
        vec![MapEvent::FocusChanged(None)]
    }

    /// Restart scratching on the focused location. A location that is
    /// already visited comes back fully revealed.
    pub fn reset_scratch(&mut self) -> Vec<MapEvent> {
        self.auto_exit_at = None;
        let done = self.focused_id().is_some_and(|id| self.visited.is_visited(id));
        self.scratch
            .reset(done)
            .into_iter()
            .map(MapEvent::Scratch)
            .collect()
    }

    // ─── Visited set ─────────────────────────────────────────────────────

    /// Flip the visited flag of `id` directly (e.g. from a list view).
    pub fn toggle_visited(&mut self, id: LocationId) -> bool {
        self.visited.toggle(id)
    }

    // ─── Labels & markers ────────────────────────────────────────────────

    pub fn set_hovered(&mut self, id: Option<LocationId>) {
        self.hovered = id;
    }

    pub fn set_highlighted(&mut self, ids: Vec<LocationId>) {
        self.highlighted = ids;
    }

    pub fn set_show_all_labels(&mut self, show: bool) {
        self.show_all_labels = show;
    }

    pub fn interaction_state(&self) -> InteractionState {
        let focused = self.focused_id();
        InteractionState {
            hovered: self.hovered,
            focused,
            visited: self
                .catalog
                .iter()
                .map(|loc| loc.id)
                .filter(|id| self.visited.is_visited(*id))
                .collect(),
            highlighted: self.highlighted.clone(),
            neighbors: focused
                .map(|id| self.catalog.nearest(id, self.config.labels.neighbor_count))
                .unwrap_or_default(),
            show_all: self.show_all_labels,
        }
    }

    pub fn visible_labels(&self) -> Vec<LocationId> {
        compute_visible_labels(
            &self.catalog,
            &self.viewport.transform(),
            &self.viewport.viewport(),
            self.config.map.logical_size,
            &self.interaction_state(),
            &self.config.labels,
        )
    }

    pub fn markers(&self) -> Vec<MarkerView> {
        let state = self.interaction_state();
        let labels = compute_visible_labels(
            &self.catalog,
            &self.viewport.transform(),
            &self.viewport.viewport(),
            self.config.map.logical_size,
            &state,
            &self.config.labels,
        );
        build_markers(&self.catalog, &state, &labels)
    }

    /// Marker under a client-space point, for hover tracking.
    pub fn marker_at(&self, client: Point) -> Option<LocationId> {
        let rect = self.viewport.viewport();
        hit_test_marker(
            &self.catalog,
            &self.viewport.transform(),
            &rect,
            self.config.map.logical_size,
            rect.to_local(client),
            self.config.labels.marker_hit_radius,
        )
    }
}
