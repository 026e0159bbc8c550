//! Points, rects, and screen ↔ logical coordinate conversion.
//!
//! Two coordinate spaces flow through the system:
//!
//! - **Screen space**: CSS pixels as reported by pointer events.
//! - **Logical space**: the fixed `0..L` canvas all domain geometry lives in
//!   (marker positions, scratch regions, brush radii).
//!
//! A `Point` does not carry its space in the type; every conversion between
//! the two goes through [`CoordinateTransform`] or
//! [`crate::viewport::Transform`].

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Sub};

/// Default extent of the logical coordinate space.
pub const LOGICAL_SIZE: f64 = 1000.0;

/// A point in either screen or logical space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    a.distance(b)
}

/// An element's on-screen rectangle (the equivalent of a DOM bounding rect).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewportRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewportRect {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// A rect anchored at the origin.
    pub const fn sized(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Zero-area or non-finite rects cannot be divided by.
    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
            || !self.left.is_finite()
            || !self.top.is_finite()
    }

    /// Fail with [`CoreError::DegenerateViewport`] unless the rect has area.
    pub fn ensure_usable(&self) -> Result<(), CoreError> {
        if self.is_degenerate() {
            return Err(CoreError::DegenerateViewport {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Convert a client-space point to a point relative to this rect's origin.
    pub fn to_local(&self, client: Point) -> Point {
        Point::new(client.x - self.left, client.y - self.top)
    }
}

/// Axis-aligned box in screen space (label footprints, hit areas).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Whether the two boxes overlap once separated by less than `margin`.
    ///
    /// Boxes whose gap is exactly `margin` or less still collide.
    pub fn collides_with(&self, other: &Bounds, margin: f64) -> bool {
        !(self.right() + margin < other.x
            || other.right() + margin < self.x
            || self.bottom() + margin < other.y
            || other.bottom() + margin < self.y)
    }
}

/// Stateless conversion between screen pixels and the logical canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateTransform {
    logical_size: f64,
}

impl Default for CoordinateTransform {
    fn default() -> Self {
        Self::new(LOGICAL_SIZE)
    }
}

impl CoordinateTransform {
    pub fn new(logical_size: f64) -> Self {
        Self { logical_size }
    }

    pub fn logical_size(&self) -> f64 {
        self.logical_size
    }

    /// `x' = (p.x - rect.left) / rect.width * L`, same for y.
    ///
    /// Returns [`CoreError::DegenerateViewport`] instead of dividing by zero.
    pub fn screen_to_logical(&self, p: Point, rect: &ViewportRect) -> Result<Point, CoreError> {
        rect.ensure_usable()?;
        Ok(Point::new(
            (p.x - rect.left) / rect.width * self.logical_size,
            (p.y - rect.top) / rect.height * self.logical_size,
        ))
    }

    /// Exact inverse of [`Self::screen_to_logical`].
    pub fn logical_to_screen(&self, p: Point, rect: &ViewportRect) -> Result<Point, CoreError> {
        rect.ensure_usable()?;
        Ok(Point::new(
            p.x / self.logical_size * rect.width + rect.left,
            p.y / self.logical_size * rect.height + rect.top,
        ))
    }

    pub fn distance(&self, a: Point, b: Point) -> f64 {
        a.distance(b)
    }
}
