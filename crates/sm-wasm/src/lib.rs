//! WASM bridge for Scratch Map: exposes the map controller to JavaScript.
//!
//! Compiled via `wasm-pack build --target web`. The host page owns the DOM:
//! it forwards pointer/wheel events and `requestAnimationFrame` ticks, applies
//! the returned CSS transform, and redraws overlays when told to.

mod canvas;
mod svg;

pub use canvas::CanvasSurface;

use serde::Serialize;
use sm_core::{Catalog, Config, CoreError, LocationId, Point, ViewportRect, VisitedSet};
use sm_editor::{ControllerResponse, InputEvent, MapController, MapEvent, PointerKind, ScratchSessionEvent};
use sm_render::palette::css_color;
use sm_render::progress::RingGeometry;
use wasm_bindgen::prelude::*;
use web_sys::CanvasRenderingContext2d;

/// The main WASM-facing map instance.
#[wasm_bindgen]
pub struct ScratchMapApp {
    controller: MapController<CanvasSurface, VisitedSet>,
    ring: RingGeometry,
}

#[wasm_bindgen]
impl ScratchMapApp {
    /// Build from catalog JSON, optional config JSON (`""` for defaults),
    /// and the persisted visited-id array (`""` for none).
    #[wasm_bindgen(constructor)]
    pub fn new(catalog_json: &str, config_json: &str, visited_json: &str) -> Result<ScratchMapApp, JsValue> {
        init_runtime();

        let catalog = Catalog::from_json(catalog_json).map_err(to_js)?;
        let config = if config_json.trim().is_empty() {
            Config::default()
        } else {
            Config::from_json(config_json).map_err(to_js)?
        };
        let visited: VisitedSet = if visited_json.trim().is_empty() {
            VisitedSet::new()
        } else {
            serde_json::from_str(visited_json)
                .map_err(|e| to_js(CoreError::Json(e)))?
        };
        log::info!(
            "scratch-map: {} locations, {} visited",
            catalog.len(),
            visited.len()
        );

        Ok(Self {
            controller: MapController::new(config, catalog, visited),
            ring: RingGeometry::default(),
        })
    }

    /// Use `ctx` as the scratch cover.
    pub fn attach_canvas(&mut self, ctx: CanvasRenderingContext2d) {
        let size = self.controller.config().map.logical_size;
        self.controller.attach_surface(CanvasSurface::new(ctx, size));
    }

    /// Record the map container's client rect (call on mount and resize).
    pub fn set_viewport(&mut self, left: f64, top: f64, width: f64, height: f64) {
        self.controller
            .set_viewport(ViewportRect::new(left, top, width, height));
    }

    // ─── Input ───────────────────────────────────────────────────────────
    //
    // Every handler returns `{"events":[...],"preventDefault":bool}`.

    pub fn pointer_down(&mut self, id: i32, pointer_type: &str, x: f64, y: f64, now_ms: f64) -> String {
        let kind = PointerKind::from_dom(pointer_type);
        self.input(&InputEvent::down(id, kind, x, y), now_ms)
    }

    pub fn pointer_move(&mut self, id: i32, x: f64, y: f64, now_ms: f64) -> String {
        self.input(&InputEvent::moved(id, x, y), now_ms)
    }

    pub fn pointer_up(&mut self, id: i32, x: f64, y: f64, now_ms: f64) -> String {
        self.input(&InputEvent::up(id, x, y), now_ms)
    }

    pub fn pointer_cancel(&mut self, id: i32, now_ms: f64) -> String {
        self.input(&InputEvent::PointerCancel { id }, now_ms)
    }

    pub fn wheel(&mut self, x: f64, y: f64, delta_y: f64, now_ms: f64) -> String {
        self.input(&InputEvent::wheel(x, y, delta_y), now_ms)
    }

    /// Update the hovered marker from a client point. Returns whether it changed.
    pub fn hover_at(&mut self, x: f64, y: f64) -> bool {
        let hit = self.controller.marker_at(Point::new(x, y));
        let changed = self.controller.interaction_state().hovered != hit;
        self.controller.set_hovered(hit);
        changed
    }

    pub fn clear_hover(&mut self) {
        self.controller.set_hovered(None);
    }

    /// Per-frame tick. Returns the JSON event array.
    pub fn tick(&mut self, now_ms: f64) -> String {
        events_json(&self.controller.tick(now_ms))
    }

    pub fn needs_frame(&self) -> bool {
        self.controller.needs_frame()
    }

    // ─── Focus ───────────────────────────────────────────────────────────

    pub fn focus(&mut self, id: &str, now_ms: f64) -> Result<String, JsValue> {
        let events = self.controller.focus_by_name(id, now_ms).map_err(to_js)?;
        Ok(events_json(&events))
    }

    pub fn exit_focus(&mut self, now_ms: f64) -> String {
        events_json(&self.controller.exit_focus(now_ms))
    }

    pub fn reset_scratch(&mut self) -> String {
        events_json(&self.controller.reset_scratch())
    }

    /// Focused location id, or empty string.
    pub fn focused_id(&self) -> String {
        self.controller
            .focused_id()
            .map(|id| id.as_str().to_string())
            .unwrap_or_default()
    }

    pub fn progress(&self) -> f64 {
        self.controller.progress()
    }

    // ─── Visited & labels ────────────────────────────────────────────────

    /// Flip the visited flag. Returns the new state.
    pub fn toggle_visited(&mut self, id: &str) -> bool {
        self.controller.toggle_visited(LocationId::intern(id))
    }

    /// Visited ids as a JSON array, for persistence.
    pub fn visited_json(&self) -> String {
        serde_json::to_string(self.controller.visited()).unwrap_or_else(|_| "[]".to_string())
    }

    /// `{"visited":n,"total":n,"byRegion":[...]}`.
    pub fn stats_json(&self) -> String {
        let stats = self.controller.catalog().stats(self.controller.visited());
        serde_json::to_string(&stats).unwrap_or_else(|_| "{}".to_string())
    }

    /// Highlight a set of ids (e.g. search results). Non-string entries are skipped.
    pub fn set_highlighted(&mut self, ids: js_sys::Array) {
        let ids = ids
            .iter()
            .filter_map(|v| v.as_string())
            .map(|s| LocationId::intern(&s))
            .collect();
        self.controller.set_highlighted(ids);
    }

    pub fn set_show_all_labels(&mut self, show: bool) {
        self.controller.set_show_all_labels(show);
    }

    pub fn visible_labels_json(&self) -> String {
        serde_json::to_string(&self.controller.visible_labels()).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn markers_json(&self) -> String {
        let markers: Vec<MarkerDto> = self
            .controller
            .markers()
            .iter()
            .map(|m| MarkerDto {
                id: m.id.as_str().to_string(),
                name: m.name.clone(),
                x: m.position.x,
                y: m.position.y,
                state: format!("{:?}", m.state).to_lowercase(),
                fill: css_color(m.style.fill),
                accent: css_color(m.accent),
                scale: m.style.scale,
                pulse: m.style.pulse,
                glow: m.style.glow,
                label_visible: m.label_visible,
            })
            .collect();
        serde_json::to_string(&markers).unwrap_or_else(|_| "[]".to_string())
    }

    // ─── Rendering helpers ───────────────────────────────────────────────

    /// CSS `transform` for the map container.
    pub fn transform_css(&self) -> String {
        self.controller.viewport().transform().to_css()
    }

    pub fn markers_svg(&self) -> String {
        let config = self.controller.config();
        svg::render_markers(
            &self.controller.markers(),
            config.map.logical_size,
            self.controller.viewport().viewport().width,
            self.controller.viewport().transform().scale,
            &config.labels,
        )
    }

    pub fn progress_ring_svg(&self) -> String {
        svg::render_progress_ring(self.controller.progress(), &self.ring)
    }
}

impl ScratchMapApp {
    fn input(&mut self, event: &InputEvent, now_ms: f64) -> String {
        response_json(&self.controller.handle_input(event, now_ms))
    }
}

// ─── JSON shapes ─────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MarkerDto {
    id: String,
    name: String,
    x: f64,
    y: f64,
    state: String,
    fill: String,
    accent: String,
    scale: f64,
    pulse: bool,
    glow: bool,
    label_visible: bool,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum EventDto {
    Progress { value: f64 },
    Milestone { value: f64 },
    Completed { id: String },
    ExitFocus,
    Focus { id: Option<String> },
    Visited { id: String },
    Transform,
}

impl From<&MapEvent> for EventDto {
    fn from(event: &MapEvent) -> Self {
        match event {
            MapEvent::Scratch(ScratchSessionEvent::Progress(value)) => EventDto::Progress { value: *value },
            MapEvent::Scratch(ScratchSessionEvent::Milestone(value)) => {
                EventDto::Milestone { value: *value }
            }
            MapEvent::Scratch(ScratchSessionEvent::Completed(id)) => EventDto::Completed {
                id: id.as_str().to_string(),
            },
            MapEvent::Scratch(ScratchSessionEvent::ExitFocus) => EventDto::ExitFocus,
            MapEvent::FocusChanged(id) => EventDto::Focus {
                id: id.map(|id| id.as_str().to_string()),
            },
            MapEvent::Visited(id) => EventDto::Visited {
                id: id.as_str().to_string(),
            },
            MapEvent::TransformChanged => EventDto::Transform,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResponseDto {
    events: Vec<EventDto>,
    prevent_default: bool,
}

fn events_json(events: &[MapEvent]) -> String {
    let dto: Vec<EventDto> = events.iter().map(EventDto::from).collect();
    serde_json::to_string(&dto).unwrap_or_else(|_| "[]".to_string())
}

fn response_json(response: &ControllerResponse) -> String {
    let dto = ResponseDto {
        events: response.events.iter().map(EventDto::from).collect(),
        prevent_default: response.prevent_default,
    };
    serde_json::to_string(&dto)
        .unwrap_or_else(|_| r#"{"events":[],"preventDefault":false}"#.to_string())
}

fn to_js(err: CoreError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

// ─── Runtime setup ───────────────────────────────────────────────────────

/// Routes `log` records to the browser console.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
struct ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let msg = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            log::Level::Error => web_sys::console::error_1(&msg),
            log::Level::Warn => web_sys::console::warn_1(&msg),
            log::Level::Info => web_sys::console::info_1(&msg),
            log::Level::Debug | log::Level::Trace => web_sys::console::debug_1(&msg),
        }
    }

    fn flush(&self) {}
}

#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
static LOGGER: ConsoleLogger = ConsoleLogger;

fn init_runtime() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Scratch Map WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
            if log::set_logger(&LOGGER).is_ok() {
                log::set_max_level(log::LevelFilter::Info);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn events_serialize_with_type_tags() {
        let id = LocationId::intern("wasm-json");
        let json = events_json(&[
            MapEvent::Scratch(ScratchSessionEvent::Progress(0.5)),
            MapEvent::Scratch(ScratchSessionEvent::Completed(id)),
            MapEvent::FocusChanged(None),
            MapEvent::TransformChanged,
        ]);
        assert_eq!(
            json,
            r#"[{"type":"progress","value":0.5},{"type":"completed","id":"wasm-json"},{"type":"focus","id":null},{"type":"transform"}]"#
        );
    }

    #[test]
    fn response_carries_prevent_default() {
        let json = response_json(&ControllerResponse {
            events: vec![MapEvent::Scratch(ScratchSessionEvent::ExitFocus)],
            prevent_default: true,
        });
        assert_eq!(json, r#"{"events":[{"type":"exitFocus"}],"preventDefault":true}"#);
    }
}
