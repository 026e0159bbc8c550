//! Scratch engine: erase the cover and track reveal progress.
//!
//! Progress is grid-cell occupancy. An `N × N` grid is laid over the square
//! bounding the reveal circle; only cells whose centre lies inside the circle
//! are *active* and count toward progress. A cell is scratched when an
//! (interpolated) stroke point lands in it, and stays scratched for the rest
//! of the session, so progress never decreases.

use crate::session::{FocusSession, ScratchSessionEvent};
use smallvec::SmallVec;
use sm_core::{CoordinateTransform, LocationId, Point, ScratchConfig, ViewportRect};
use sm_render::cover::paint_cover;
use sm_render::surface::ScratchSurface;

// ─── Mask ────────────────────────────────────────────────────────────────

/// Erasure bookkeeping for one reveal region.
pub trait ScratchMask {
    /// Mark the cell under `logical`. Returns `true` if it was newly scratched.
    fn mark_at(&mut self, logical: Point) -> bool;

    fn scratched_count(&self) -> usize;

    fn active_count(&self) -> usize;

    /// Mark every active cell.
    fn fill(&mut self);

    /// `scratched / active`, or 0 for a mask without active cells.
    fn progress(&self) -> f64 {
        match self.active_count() {
            0 => 0.0,
            n => self.scratched_count() as f64 / n as f64,
        }
    }

    fn is_complete(&self, threshold: f64) -> bool {
        self.progress() >= threshold
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cell {
    Outside,
    Covered,
    Scratched,
}

#[derive(Debug, Clone)]
pub struct GridMask {
    center: Point,
    radius: f64,
    grid_size: usize,
    cells: Vec<Cell>,
    active: usize,
    scratched: usize,
}

impl GridMask {
    pub fn new(center: Point, radius: f64, grid_size: usize) -> Self {
        let grid_size = grid_size.max(1);
        let cell = radius * 2.0 / grid_size as f64;
        let mut cells = Vec::with_capacity(grid_size * grid_size);
        let mut active = 0;
        for row in 0..grid_size {
            for col in 0..grid_size {
                let dx = (col as f64 + 0.5) * cell - radius;
                let dy = (row as f64 + 0.5) * cell - radius;
                if dx.hypot(dy) <= radius {
                    cells.push(Cell::Covered);
                    active += 1;
                } else {
                    cells.push(Cell::Outside);
                }
            }
        }
        Self {
            center,
            radius,
            grid_size,
            cells,
            active,
            scratched: 0,
        }
    }

    pub fn center(&self) -> Point {
        self.center
    }

    /// Grid index of `logical`, if it falls inside the reveal circle.
    pub fn cell_index(&self, logical: Point) -> Option<usize> {
        let rel = logical - self.center;
        if rel.x.hypot(rel.y) > self.radius {
            return None;
        }
        let n = self.grid_size as f64;
        let gx = ((rel.x + self.radius) / (self.radius * 2.0) * n).floor();
        let gy = ((rel.y + self.radius) / (self.radius * 2.0) * n).floor();
        if gx < 0.0 || gy < 0.0 || gx >= n || gy >= n {
            return None;
        }
        Some(gy as usize * self.grid_size + gx as usize)
    }

    /// Whether the cell at `(col, row)` counts toward progress.
    pub fn is_active(&self, col: usize, row: usize) -> bool {
        self.cells
            .get(row * self.grid_size + col)
            .is_some_and(|c| *c != Cell::Outside)
    }

    /// Logical centre of the cell at `(col, row)`.
    pub fn cell_center(&self, col: usize, row: usize) -> Point {
        let cell = self.radius * 2.0 / self.grid_size as f64;
        Point::new(
            self.center.x - self.radius + (col as f64 + 0.5) * cell,
            self.center.y - self.radius + (row as f64 + 0.5) * cell,
        )
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }
}

impl ScratchMask for GridMask {
    fn mark_at(&mut self, logical: Point) -> bool {
        let Some(i) = self.cell_index(logical) else {
            return false;
        };
        if self.cells[i] != Cell::Covered {
            return false;
        }
        self.cells[i] = Cell::Scratched;
        self.scratched += 1;
        true
    }

    fn scratched_count(&self) -> usize {
        self.scratched
    }

    fn active_count(&self) -> usize {
        self.active
    }

    fn fill(&mut self) {
        for cell in &mut self.cells {
            if *cell == Cell::Covered {
                *cell = Cell::Scratched;
            }
        }
        self.scratched = self.active;
    }
}

// ─── Line interpolation ──────────────────────────────────────────────────

/// Integer points on the line from `from` to `to` (both floored), inclusive.
pub fn bresenham(from: Point, to: Point) -> Vec<Point> {
    if !(from.is_finite() && to.is_finite()) {
        return Vec::new();
    }
    let (mut x0, mut y0) = (from.x.floor() as i64, from.y.floor() as i64);
    let (x1, y1) = (to.x.floor() as i64, to.y.floor() as i64);
    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx - dy;

    let mut points = Vec::with_capacity((dx.max(dy) + 1) as usize);
    loop {
        points.push(Point::new(x0 as f64, y0 as f64));
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x0 += sx;
        }
        if e2 < dx {
            err += dx;
            y0 += sy;
        }
    }
    points
}

// ─── Engine ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct SessionState {
    target: LocationId,
    mask: GridMask,
    /// Last progress value reported through an event.
    reported: f64,
    completed: bool,
    started: bool,
    milestones_fired: SmallVec<[f64; 4]>,
    last_point: Option<Point>,
    stroke_count: u32,
}

/// Owns the scratch mask and the raster cover for the focused target.
#[derive(Debug)]
pub struct ScratchEngine<S> {
    config: ScratchConfig,
    coords: CoordinateTransform,
    surface: Option<S>,
    session: Option<SessionState>,
}

impl<S: ScratchSurface> ScratchEngine<S> {
    pub fn new(config: ScratchConfig, logical_size: f64) -> Self {
        Self {
            config,
            coords: CoordinateTransform::new(logical_size),
            surface: None,
            session: None,
        }
    }

    pub fn with_surface(mut self, surface: S) -> Self {
        self.surface = Some(surface);
        self
    }

    pub fn attach_surface(&mut self, surface: S) {
        self.surface = Some(surface);
    }

    pub fn detach_surface(&mut self) -> Option<S> {
        self.surface.take()
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn config(&self) -> &ScratchConfig {
        &self.config
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Exact `scratched / active` of the current session (0 without one).
    pub fn progress(&self) -> f64 {
        self.session.as_ref().map_or(0.0, |s| s.mask.progress())
    }

    pub fn is_completed(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.completed)
    }

    pub fn mask(&self) -> Option<&GridMask> {
        self.session.as_ref().map(|s| &s.mask)
    }

    /// Start a fresh session for `focus`, discarding any previous one.
    pub fn initialize(&mut self, focus: &FocusSession) -> Vec<ScratchSessionEvent> {
        let events = self.start(focus.id(), focus.target.logical_position, focus.already_completed);
        log::debug!(
            "scratch: session for {} ({} active cells, visited: {})",
            focus.id(),
            self.mask().map_or(0, |m| m.active_count()),
            focus.already_completed
        );
        events
    }

    /// Restart the current session. `already_completed` is the caller's
    /// current visited flag for the target; when set, the session comes back
    /// complete with a clear surface.
    pub fn reset(&mut self, already_completed: bool) -> Vec<ScratchSessionEvent> {
        let Some(state) = self.session.as_ref() else {
            return Vec::new();
        };
        let (target, center) = (state.target, state.mask.center());
        self.start(target, center, already_completed)
    }

    fn start(&mut self, target: LocationId, center: Point, done: bool) -> Vec<ScratchSessionEvent> {
        let mut mask = GridMask::new(center, self.config.area_radius, self.config.grid_size);
        let mut milestones_fired = SmallVec::new();
        if done {
            mask.fill();
            milestones_fired.extend(self.config.milestones.iter().copied());
        }
        self.session = Some(SessionState {
            target,
            mask,
            reported: if done { 1.0 } else { 0.0 },
            completed: done,
            started: false,
            milestones_fired,
            last_point: None,
            stroke_count: 0,
        });
        self.paint_initial(center, done);
        vec![ScratchSessionEvent::Progress(if done { 1.0 } else { 0.0 })]
    }

    /// Drop the session and wipe the surface.
    pub fn clear(&mut self) {
        self.session = None;
        if let Some(surface) = self.surface.as_mut()
            && let Err(e) = surface.clear()
        {
            log::warn!("scratch: clearing surface failed: {e}");
        }
    }

    /// The pointer lifted; the next point starts a new line.
    pub fn end_stroke(&mut self) {
        if let Some(state) = self.session.as_mut() {
            state.last_point = None;
        }
    }

    fn paint_initial(&mut self, center: Point, done: bool) {
        match self.surface.as_mut() {
            Some(surface) => {
                if let Err(e) = paint_cover(surface, center, self.config.area_radius, done) {
                    log::warn!("scratch: painting cover failed: {e}");
                }
            }
            None => log::warn!("scratch: no surface attached, cover not painted"),
        }
    }

    /// Scratch at client-space `screen`, where `canvas_rect` is the cover
    /// canvas's client rect.
    pub fn scratch(&mut self, screen: Point, canvas_rect: &ViewportRect) -> Vec<ScratchSessionEvent> {
        let mut events = Vec::new();
        let Some(state) = self.session.as_mut() else {
            return events;
        };
        if state.completed {
            return events;
        }
        let Some(surface) = self.surface.as_mut() else {
            log::warn!("scratch: no surface attached, ignoring stroke");
            return events;
        };
        let logical = match self.coords.screen_to_logical(screen, canvas_rect) {
            Ok(p) if p.is_finite() => p,
            Ok(_) => return events,
            Err(e) => {
                log::debug!("scratch: {e}");
                return events;
            }
        };

        let center = state.mask.center();
        let distance = logical.distance(center);
        if !state.started && distance > self.config.abandon_radius {
            log::debug!("scratch: first contact {distance:.0} from target, leaving focus");
            events.push(ScratchSessionEvent::ExitFocus);
            return events;
        }
        if distance < self.config.area_radius {
            state.started = true;
        }

        let points = match state.last_point {
            Some(last) => bresenham(last, logical),
            None => vec![logical],
        };
        let mut erase_failed = false;
        for p in &points {
            if !erase_failed && let Err(e) = surface.erase_circle(*p, self.config.brush_radius) {
                log::warn!("scratch: erase failed: {e}");
                erase_failed = true;
            }
            state.mask.mark_at(*p);
        }
        state.last_point = Some(logical);
        state.stroke_count = state.stroke_count.wrapping_add(1);

        let progress = state.mask.progress();
        let threshold = self.config.complete_threshold;
        let milestone_due = self
            .config
            .milestones
            .iter()
            .any(|m| *m <= progress && !state.milestones_fired.contains(m));
        let due = state.stroke_count % self.config.check_every.max(1) == 0
            || milestone_due
            || progress >= threshold;
        if !due || progress <= state.reported {
            return events;
        }

        if progress >= threshold {
            state.completed = true;
            state.mask.fill();
            state.reported = 1.0;
            for &m in &self.config.milestones {
                if !state.milestones_fired.contains(&m) {
                    state.milestones_fired.push(m);
                    events.push(ScratchSessionEvent::Milestone(m));
                }
            }
            events.push(ScratchSessionEvent::Progress(1.0));
            events.push(ScratchSessionEvent::Completed(state.target));
            if let Err(e) = surface.clear() {
                log::warn!("scratch: clearing surface on completion failed: {e}");
            }
            log::info!("scratch: {} completed at {:.0}%", state.target, progress * 100.0);
            return events;
        }

        state.reported = progress;
        events.push(ScratchSessionEvent::Progress(progress));
        for &m in &self.config.milestones {
            if m <= progress && !state.milestones_fired.contains(&m) {
                state.milestones_fired.push(m);
                events.push(ScratchSessionEvent::Milestone(m));
            }
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sm_render::surface::RasterSurface;

    const RECT: ViewportRect = ViewportRect::new(0.0, 0.0, 1000.0, 1000.0);

    fn session(x: f64, y: f64, visited: bool) -> FocusSession {
        FocusSession::new(
            sm_core::Target {
                id: LocationId::intern("scratch-unit"),
                logical_position: Point::new(x, y),
                display_name: "Unit".into(),
                region: sm_core::Region::Chubu,
            },
            visited,
        )
    }

    fn engine() -> ScratchEngine<RasterSurface> {
        ScratchEngine::new(ScratchConfig::default(), 1000.0)
            .with_surface(RasterSurface::new(1000.0, 100))
    }

    #[test]
    fn grid_has_eighty_active_cells() {
        let mask = GridMask::new(Point::new(500.0, 500.0), 200.0, 10);
        assert_eq!(mask.active_count(), 80);
        assert!(!mask.is_active(0, 0));
        assert!(mask.is_active(4, 4));
    }

    #[test]
    fn marking_is_idempotent() {
        let mut mask = GridMask::new(Point::new(500.0, 500.0), 200.0, 10);
        assert!(mask.mark_at(Point::new(500.0, 500.0)));
        assert!(!mask.mark_at(Point::new(505.0, 505.0)));
        assert_eq!(mask.scratched_count(), 1);
        // Corner of the square but outside the circle.
        assert!(!mask.mark_at(Point::new(310.0, 310.0)));
        assert!((mask.progress() - 1.0 / 80.0).abs() < 1e-12);
    }

    #[test]
    fn bresenham_is_gap_free() {
        let line = bresenham(Point::new(0.2, 0.9), Point::new(5.7, 2.1));
        assert_eq!(line.first(), Some(&Point::new(0.0, 0.0)));
        assert_eq!(line.last(), Some(&Point::new(5.0, 2.0)));
        for pair in line.windows(2) {
            let d = pair[1] - pair[0];
            assert!(d.x.abs() <= 1.0 && d.y.abs() <= 1.0);
        }
        assert_eq!(bresenham(Point::new(3.0, 3.0), Point::new(3.0, 3.0)).len(), 1);
        let steep = bresenham(Point::new(0.0, 10.0), Point::new(0.0, 0.0));
        assert_eq!(steep.len(), 11);
    }

    #[test]
    fn first_far_contact_exits_focus() {
        let mut e = engine();
        e.initialize(&session(500.0, 500.0, false));
        let events = e.scratch(Point::new(900.0, 900.0), &RECT);
        assert_eq!(events, vec![ScratchSessionEvent::ExitFocus]);
        assert_eq!(e.mask().unwrap().scratched_count(), 0);
    }

    #[test]
    fn scratching_erases_the_cover() {
        let mut e = engine();
        e.initialize(&session(500.0, 500.0, false));
        let surface = e.surface().unwrap();
        assert_eq!(surface.alpha_at(Point::new(500.0, 500.0)).unwrap(), 255);
        e.scratch(Point::new(500.0, 500.0), &RECT);
        let surface = e.surface().unwrap();
        assert_eq!(surface.alpha_at(Point::new(500.0, 500.0)).unwrap(), 0);
        assert_eq!(surface.alpha_at(Point::new(500.0, 560.0)).unwrap(), 255);
    }

    #[test]
    fn progress_events_are_throttled() {
        let mut e = engine();
        e.initialize(&session(500.0, 500.0, false));
        let mask = e.mask().unwrap().clone();
        // Four separate taps on distinct cells: progress moves but no event
        // until the fifth stroke.
        let cells = [(4, 4), (5, 4), (4, 5), (5, 5), (3, 4)];
        let mut emitted = Vec::new();
        for (col, row) in cells {
            emitted.push(e.scratch(mask.cell_center(col, row), &RECT));
            e.end_stroke();
        }
        assert!(emitted[..4].iter().all(|ev| ev.is_empty()));
        assert_eq!(emitted[4], vec![ScratchSessionEvent::Progress(5.0 / 80.0)]);
        assert!((e.progress() - 5.0 / 80.0).abs() < 1e-12);
    }

    #[test]
    fn already_visited_session_is_complete_and_inert() {
        let mut e = engine();
        let events = e.initialize(&session(500.0, 500.0, true));
        assert_eq!(events, vec![ScratchSessionEvent::Progress(1.0)]);
        assert!(e.is_completed());
        assert_eq!(e.progress(), 1.0);
        assert!(e.surface().unwrap().is_clear());
        assert!(e.scratch(Point::new(500.0, 500.0), &RECT).is_empty());
    }

    #[test]
    fn missing_surface_is_a_noop() {
        let mut e: ScratchEngine<RasterSurface> = ScratchEngine::new(ScratchConfig::default(), 1000.0);
        e.initialize(&session(500.0, 500.0, false));
        assert!(e.scratch(Point::new(500.0, 500.0), &RECT).is_empty());
        assert_eq!(e.progress(), 0.0);
    }

    #[test]
    fn degenerate_canvas_rect_is_a_noop() {
        let mut e = engine();
        e.initialize(&session(500.0, 500.0, false));
        let events = e.scratch(Point::new(500.0, 500.0), &ViewportRect::sized(0.0, 0.0));
        assert!(events.is_empty());
        assert_eq!(e.progress(), 0.0);
    }

    #[test]
    fn reset_restores_cover_and_latches() {
        let mut e = engine();
        e.initialize(&session(500.0, 500.0, false));
        e.scratch(Point::new(500.0, 500.0), &RECT);
        assert!(e.progress() > 0.0);
        let events = e.reset(false);
        assert_eq!(events, vec![ScratchSessionEvent::Progress(0.0)]);
        assert_eq!(e.progress(), 0.0);
        assert_eq!(
            e.surface().unwrap().alpha_at(Point::new(500.0, 500.0)).unwrap(),
            255
        );
        // `started` was cleared too: a far first contact exits again.
        assert_eq!(
            e.scratch(Point::new(950.0, 950.0), &RECT),
            vec![ScratchSessionEvent::ExitFocus]
        );
    }

    #[test]
    fn reset_of_a_visited_target_stays_complete() {
        let mut e = engine();
        e.initialize(&session(500.0, 500.0, false));
        let cells: Vec<Point> = {
            let mask = e.mask().unwrap();
            (0..10)
                .flat_map(|row| (0..10).map(move |col| (col, row)))
                .filter(|&(col, row)| mask.is_active(col, row))
                .map(|(col, row)| mask.cell_center(col, row))
                .collect()
        };
        for cell in cells {
            e.scratch(cell, &RECT);
            e.end_stroke();
        }
        assert!(e.is_completed());

        let events = e.reset(true);
        assert_eq!(events, vec![ScratchSessionEvent::Progress(1.0)]);
        assert!(e.is_completed());
        assert_eq!(e.progress(), 1.0);
        assert!(e.surface().unwrap().is_clear());
        // Completion is latched: scratching again reports nothing.
        assert!(e.scratch(Point::new(500.0, 500.0), &RECT).is_empty());
    }
}
