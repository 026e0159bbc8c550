//! Pan / zoom / focus state for the map container.
//!
//! The transform is applied to the map content with its origin at the
//! container's top-left corner:
//!
//! ```text
//! screen = content * scale + translate
//! content = logical / L * container_size
//! ```
//!
//! `screen` is container-relative. Client-space points (as delivered by
//! pointer events) are converted with [`ViewportRect::to_local`] first.

use crate::config::MapConfig;
use crate::error::CoreError;
use crate::geometry::{Point, ViewportRect};
use serde::Serialize;

// ─── Transform ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transform {
    pub scale: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        scale: 1.0,
        translate_x: 0.0,
        translate_y: 0.0,
    };

    pub fn new(scale: f64, translate_x: f64, translate_y: f64) -> Self {
        Self {
            scale,
            translate_x,
            translate_y,
        }
    }

    /// Content-pixel point to container-relative screen point.
    pub fn apply(&self, content: Point) -> Point {
        Point::new(
            content.x * self.scale + self.translate_x,
            content.y * self.scale + self.translate_y,
        )
    }

    /// Inverse of [`Self::apply`].
    pub fn invert(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.translate_x) / self.scale,
            (screen.y - self.translate_y) / self.scale,
        )
    }

    /// Logical point to container-relative screen point.
    pub fn project(&self, logical: Point, rect: &ViewportRect, logical_size: f64) -> Point {
        self.apply(Point::new(
            logical.x / logical_size * rect.width,
            logical.y / logical_size * rect.height,
        ))
    }

    /// Container-relative screen point back to logical space.
    pub fn unproject(&self, screen: Point, rect: &ViewportRect, logical_size: f64) -> Point {
        let content = self.invert(screen);
        Point::new(
            content.x / rect.width * logical_size,
            content.y / rect.height * logical_size,
        )
    }

    /// CSS `transform` value for a top-left transform origin.
    pub fn to_css(&self) -> String {
        format!(
            "translate({}px, {}px) scale({})",
            self.translate_x, self.translate_y, self.scale
        )
    }

    fn lerp(&self, to: &Transform, t: f64) -> Transform {
        Transform {
            scale: self.scale + (to.scale - self.scale) * t,
            translate_x: self.translate_x + (to.translate_x - self.translate_x) * t,
            translate_y: self.translate_y + (to.translate_y - self.translate_y) * t,
        }
    }
}

// ─── Transitions ─────────────────────────────────────────────────────────

/// An in-flight animated change of transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub from: Transform,
    pub to: Transform,
    pub start_ms: f64,
    pub duration_ms: f64,
}

impl Transition {
    /// The transform displayed at `now_ms`, and whether the transition is over.
    pub fn sample(&self, now_ms: f64) -> (Transform, bool) {
        if self.duration_ms <= 0.0 {
            return (self.to, true);
        }
        let t = ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0);
        if t >= 1.0 {
            return (self.to, true);
        }
        (self.from.lerp(&self.to, ease_out_cubic(t)), false)
    }
}

pub fn ease_out_cubic(t: f64) -> f64 {
    let inv = 1.0 - t;
    1.0 - inv * inv * inv
}

// ─── ViewportTransform ───────────────────────────────────────────────────

/// Sole owner of the map transform. Everything else requests changes
/// through `pan`, `zoom`, `focus_on` and `reset`.
#[derive(Debug, Clone)]
pub struct ViewportTransform {
    config: MapConfig,
    rect: ViewportRect,
    current: Transform,
    transition: Option<Transition>,
}

impl ViewportTransform {
    pub fn new(config: MapConfig) -> Self {
        Self {
            config,
            rect: ViewportRect::default(),
            current: Transform::IDENTITY,
            transition: None,
        }
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn transform(&self) -> Transform {
        self.current
    }

    pub fn viewport(&self) -> ViewportRect {
        self.rect
    }

    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    /// Where the transform will settle once the running transition finishes.
    pub fn settled(&self) -> Transform {
        self.transition.map_or(self.current, |t| t.to)
    }

    /// Record the container's client rect (after layout or resize).
    pub fn set_viewport(&mut self, rect: ViewportRect) {
        self.rect = rect;
        if !rect.is_degenerate() {
            self.current = self.clamped(self.current);
        }
    }

    pub fn clamp_scale(&self, scale: f64) -> f64 {
        scale.clamp(self.config.min_scale, self.config.max_scale)
    }

    /// Clamp one translation axis to `±dimension * pan_limit_factor * scale`.
    pub fn clamp_translate(&self, value: f64, dimension: f64, scale: f64) -> f64 {
        let limit = dimension * self.config.pan_limit_factor * scale;
        value.clamp(-limit, limit)
    }

    fn clamped(&self, t: Transform) -> Transform {
        let scale = self.clamp_scale(t.scale);
        Transform {
            scale,
            translate_x: self.clamp_translate(t.translate_x, self.rect.width, scale),
            translate_y: self.clamp_translate(t.translate_y, self.rect.height, scale),
        }
    }

    /// Translate by a screen-space delta. Cancels any running animation.
    pub fn pan(&mut self, delta: Point) -> Result<(), CoreError> {
        self.rect.ensure_usable()?;
        if !delta.is_finite() {
            log::debug!("viewport: ignoring non-finite pan delta {delta:?}");
            return Ok(());
        }
        self.transition = None;
        let t = self.current;
        self.current = self.clamped(Transform {
            translate_x: t.translate_x + delta.x,
            translate_y: t.translate_y + delta.y,
            ..t
        });
        Ok(())
    }

    /// Scale by `factor` around `client_center`, keeping the content point
    /// under the cursor fixed. Only the scale is clamped; translation is
    /// brought back into range by the next `pan`. Cancels any running
    /// animation.
    pub fn zoom(&mut self, factor: f64, client_center: Point) -> Result<(), CoreError> {
        if !(factor.is_finite() && factor > 0.0) {
            return Err(CoreError::InvalidZoomFactor(factor));
        }
        self.rect.ensure_usable()?;
        if !client_center.is_finite() {
            log::debug!("viewport: ignoring zoom around non-finite center");
            return Ok(());
        }
        self.transition = None;

        let center = self.rect.to_local(client_center);
        let old = self.current;
        let scale = self.clamp_scale(old.scale * factor);
        let content = old.invert(center);
        self.current = Transform {
            scale,
            translate_x: center.x - content.x * scale,
            translate_y: center.y - content.y * scale,
        };
        Ok(())
    }

    /// Animate to the focus scale with `logical` centred in the container.
    pub fn focus_on(&mut self, logical: Point, now_ms: f64) -> Result<(), CoreError> {
        self.rect.ensure_usable()?;
        let scale = self.clamp_scale(self.config.focus_scale);
        let center = self.rect.center();
        let content = Point::new(
            logical.x / self.config.logical_size * self.rect.width,
            logical.y / self.config.logical_size * self.rect.height,
        );
        let to = self.clamped(Transform {
            scale,
            translate_x: center.x - content.x * scale,
            translate_y: center.y - content.y * scale,
        });
        self.animate_to(to, now_ms, self.config.focus_duration_ms);
        Ok(())
    }

    /// Animate back to the identity transform.
    pub fn reset(&mut self, now_ms: f64) {
        self.animate_to(Transform::IDENTITY, now_ms, self.config.reset_duration_ms);
    }

    /// Jump straight to `transform` (clamped), dropping any animation.
    pub fn set_transform(&mut self, transform: Transform) {
        self.transition = None;
        self.current = if self.rect.is_degenerate() {
            Transform {
                scale: self.clamp_scale(transform.scale),
                ..transform
            }
        } else {
            self.clamped(transform)
        };
    }

    fn animate_to(&mut self, to: Transform, now_ms: f64, duration_ms: f64) {
        if let Some(previous) = self.transition {
            log::trace!("viewport: superseding transition to {:?}", previous.to);
        }
        self.transition = Some(Transition {
            from: self.current,
            to,
            start_ms: now_ms,
            duration_ms,
        });
        self.tick(now_ms);
    }

    /// Advance the running transition. Returns whether the transform changed.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        let Some(transition) = self.transition else {
            return false;
        };
        let (next, finished) = transition.sample(now_ms);
        if finished {
            self.transition = None;
        }
        let changed = next != self.current;
        self.current = next;
        changed
    }

    /// Client-space rect covered by the transformed content.
    pub fn content_rect(&self) -> ViewportRect {
        let t = self.current;
        ViewportRect::new(
            self.rect.left + t.translate_x,
            self.rect.top + t.translate_y,
            self.rect.width * t.scale,
            self.rect.height * t.scale,
        )
    }

    /// Logical point to container-relative screen point under the current transform.
    pub fn project(&self, logical: Point) -> Point {
        self.current
            .project(logical, &self.rect, self.config.logical_size)
    }
}
