//! Gesture state machine: pointer/wheel input → pan, zoom, scratch, tap.
//!
//! The mode is decided when the first contact lands and held until every
//! contact is released. The only mid-gesture transition is the one- vs
//! two-pointer boundary: a second contact switches to `Zoom`, lifting back
//! to one contact resumes `Pan`.
//!
//! Pan deltas are accumulated and handed out once per frame by
//! [`GestureController::flush_frame`]; they are also flushed whenever the
//! gesture changes shape so no movement is ever lost. Scratch points are
//! forwarded on every move without batching.

use crate::input::{InputEvent, PointerId};
use crate::session::FocusSession;
use smallvec::SmallVec;
use sm_core::{GestureConfig, Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureMode {
    #[default]
    Idle,
    Pan,
    Zoom,
    Scratch,
}

/// Normalized output of the controller. Points are client-space.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureEvent {
    /// Accumulated translation since the last flush.
    Pan(Point),
    /// Incremental scale factor around `center`.
    Zoom { factor: f64, center: Point },
    /// A raw contact point while scratching.
    Scratch(Point),
    /// The scratch stroke ended; the next point starts a new line.
    StrokeEnd,
    /// A short single-pointer press without focus.
    Tap(Point),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GestureResponse {
    pub events: SmallVec<[GestureEvent; 2]>,
    /// Suppress the browser's own scroll / pinch handling for this event.
    pub prevent_default: bool,
}

impl GestureResponse {
    fn handled() -> Self {
        Self {
            events: SmallVec::new(),
            prevent_default: true,
        }
    }

    fn push(&mut self, event: GestureEvent) {
        self.events.push(event);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ActivePointer {
    id: PointerId,
    point: Point,
}

#[derive(Debug, Clone, Default)]
pub struct GestureController {
    config: GestureConfig,
    mode: GestureMode,
    pointers: SmallVec<[ActivePointer; 2]>,
    last_point: Option<Point>,
    pinch_distance: Option<f64>,
    pending_pan: Option<Point>,
    /// Total travel of the current single-pointer gesture.
    travel: f64,
    tap_candidate: bool,
}

impl GestureController {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn mode(&self) -> GestureMode {
        self.mode
    }

    pub fn pointer_count(&self) -> usize {
        self.pointers.len()
    }

    /// Feed one input event. `focus` decides between pan and scratch when the
    /// first contact lands.
    pub fn handle(&mut self, event: &InputEvent, focus: Option<&FocusSession>) -> GestureResponse {
        match *event {
            InputEvent::PointerDown { id, point, .. } => self.pointer_down(id, point, focus),
            InputEvent::PointerMove { id, point } => self.pointer_move(id, point),
            InputEvent::PointerUp { id, point } => self.pointer_up(id, Some(point)),
            InputEvent::PointerCancel { id } => self.pointer_up(id, None),
            InputEvent::Wheel { point, delta_y } => self.wheel(point, delta_y),
        }
    }

    /// Take the pan delta accumulated since the last frame.
    pub fn flush_frame(&mut self) -> Option<GestureEvent> {
        self.pending_pan.take().map(GestureEvent::Pan)
    }

    fn flush_into(&mut self, response: &mut GestureResponse) {
        if let Some(event) = self.flush_frame() {
            response.push(event);
        }
    }

    fn index_of(&self, id: PointerId) -> Option<usize> {
        self.pointers.iter().position(|p| p.id == id)
    }

    // ─── Pointer down ────────────────────────────────────────────────────

    fn pointer_down(
        &mut self,
        id: PointerId,
        point: Point,
        focus: Option<&FocusSession>,
    ) -> GestureResponse {
        let mut response = GestureResponse::handled();
        if let Some(i) = self.index_of(id) {
            self.pointers[i].point = point;
            return response;
        }
        if self.pointers.len() >= 2 {
            log::trace!("gesture: ignoring extra pointer {id}");
            return response;
        }
        self.pointers.push(ActivePointer { id, point });

        match self.pointers.len() {
            1 => {
                self.last_point = Some(point);
                self.travel = 0.0;
                if focus.is_some() {
                    self.mode = GestureMode::Scratch;
                    self.tap_candidate = false;
                    response.push(GestureEvent::Scratch(point));
                } else {
                    self.mode = GestureMode::Pan;
                    self.tap_candidate = true;
                }
            }
            _ => {
                self.flush_into(&mut response);
                if self.mode == GestureMode::Scratch {
                    response.push(GestureEvent::StrokeEnd);
                }
                self.mode = GestureMode::Zoom;
                self.tap_candidate = false;
                self.pinch_distance = Some(self.pointers[0].point.distance(self.pointers[1].point));
                log::debug!("gesture: pinch start");
            }
        }
        response
    }

    // ─── Pointer move ────────────────────────────────────────────────────

    fn pointer_move(&mut self, id: PointerId, point: Point) -> GestureResponse {
        let Some(i) = self.index_of(id) else {
            // Hover without a pressed button.
            return GestureResponse::default();
        };
        self.pointers[i].point = point;
        let mut response = GestureResponse::handled();

        match self.mode {
            GestureMode::Idle => {}
            GestureMode::Pan | GestureMode::Scratch => {
                if let Some(last) = self.last_point
                    && self.mode == GestureMode::Pan
                {
                    self.travel += last.distance(point);
                    if self.travel >= self.config.tap_slop {
                        self.tap_candidate = false;
                    }
                    let delta = point - last;
                    match self.pending_pan.as_mut() {
                        Some(pending) => *pending += delta,
                        None => self.pending_pan = Some(delta),
                    }
                }
                if self.mode == GestureMode::Scratch {
                    response.push(GestureEvent::Scratch(point));
                }
                self.last_point = Some(point);
            }
            GestureMode::Zoom => {
                if self.pointers.len() < 2 {
                    return response;
                }
                let (a, b) = (self.pointers[0].point, self.pointers[1].point);
                let distance = a.distance(b);
                match self.pinch_distance {
                    Some(previous) if previous > 0.0 && distance > 0.0 => {
                        response.push(GestureEvent::Zoom {
                            factor: distance / previous,
                            center: a.midpoint(b),
                        });
                    }
                    _ => log::trace!("gesture: skipping degenerate pinch distance"),
                }
                self.pinch_distance = Some(distance);
            }
        }
        response
    }

    // ─── Pointer up / cancel ─────────────────────────────────────────────

    fn pointer_up(&mut self, id: PointerId, point: Option<Point>) -> GestureResponse {
        let Some(i) = self.index_of(id) else {
            return GestureResponse::default();
        };
        self.pointers.remove(i);
        let mut response = GestureResponse::handled();

        match self.pointers.len() {
            0 => {
                self.flush_into(&mut response);
                match self.mode {
                    GestureMode::Scratch => response.push(GestureEvent::StrokeEnd),
                    GestureMode::Pan if self.tap_candidate => {
                        if let Some(p) = point {
                            response.push(GestureEvent::Tap(p));
                        }
                    }
                    _ => {}
                }
                self.mode = GestureMode::Idle;
                self.last_point = None;
                self.pinch_distance = None;
                self.travel = 0.0;
                self.tap_candidate = false;
            }
            _ => {
                if self.mode == GestureMode::Zoom {
                    // Resume panning with the remaining finger; reset the
                    // reference point so the lift does not read as a jump.
                    self.mode = GestureMode::Pan;
                    self.pinch_distance = None;
                    self.last_point = Some(self.pointers[0].point);
                    log::debug!("gesture: pinch end, resuming pan");
                }
            }
        }
        response
    }

    // ─── Wheel ───────────────────────────────────────────────────────────

    fn wheel(&mut self, point: Point, delta_y: f64) -> GestureResponse {
        let mut response = GestureResponse::handled();
        let factor = if delta_y < 0.0 {
            self.config.wheel_zoom_in
        } else if delta_y > 0.0 {
            self.config.wheel_zoom_out
        } else {
            return response;
        };
        response.push(GestureEvent::Zoom {
            factor,
            center: point,
        });
        response
    }
}
