//! Raster scratch surface contract and a CPU implementation.
//!
//! A `ScratchSurface` is addressed in logical coordinates (`0..L` on both
//! axes); the backend maps them to its own pixel grid. The browser backend
//! lives in `sm-wasm`. [`RasterSurface`] keeps an RGBA buffer in memory and
//! is what tests and headless callers draw on.

use kurbo::{Circle, Shape};
use peniko::Color;
use sm_core::Point;

#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    /// The drawing backend rejected a call (e.g. a tainted canvas on readback).
    #[error("surface backend error: {0}")]
    Backend(String),

    #[error("point ({x}, {y}) is outside the surface")]
    OutOfBounds { x: f64, y: f64 },
}

// ─── Gradients ───────────────────────────────────────────────────────────

/// `(offset in 0..=1, colour)`, offsets ascending.
pub type ColorStop = (f32, Color);

#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub start: Point,
    pub end: Point,
    pub stops: Vec<ColorStop>,
}

/// Two-circle radial gradient with canvas semantics.
#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradient {
    pub start_center: Point,
    pub start_radius: f64,
    pub end_center: Point,
    pub end_radius: f64,
    pub stops: Vec<ColorStop>,
}

/// Colour at gradient parameter `t`, padding past either end.
pub fn sample_stops(stops: &[ColorStop], t: f64) -> Color {
    let Some(&(first_offset, first)) = stops.first() else {
        return Color::from_rgba8(0, 0, 0, 0);
    };
    let t = t as f32;
    if t <= first_offset {
        return first;
    }
    for pair in stops.windows(2) {
        let (o0, c0) = pair[0];
        let (o1, c1) = pair[1];
        if t <= o1 {
            let span = o1 - o0;
            let f = if span > 0.0 { (t - o0) / span } else { 1.0 };
            return mix(c0, c1, f);
        }
    }
    stops.last().map_or(first, |&(_, c)| c)
}

fn mix(a: Color, b: Color, f: f32) -> Color {
    let a = a.to_rgba8();
    let b = b.to_rgba8();
    let lerp = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * f).round() as u8;
    Color::from_rgba8(lerp(a.r, b.r), lerp(a.g, b.g), lerp(a.b, b.b), lerp(a.a, b.a))
}

impl LinearGradient {
    /// Projection of `p` onto the gradient axis.
    pub fn parameter(&self, p: Point) -> f64 {
        let axis = self.end - self.start;
        let len2 = axis.x * axis.x + axis.y * axis.y;
        if len2 == 0.0 {
            return 0.0;
        }
        let rel = p - self.start;
        (rel.x * axis.x + rel.y * axis.y) / len2
    }
}

impl RadialGradient {
    /// Largest `t` whose interpolated circle passes through `p` with a
    /// non-negative radius, or `None` if no circle does.
    pub fn parameter(&self, p: Point) -> Option<f64> {
        let dc = self.end_center - self.start_center;
        let dr = self.end_radius - self.start_radius;
        let pd = p - self.start_center;
        let a = dc.x * dc.x + dc.y * dc.y - dr * dr;
        let b = pd.x * dc.x + pd.y * dc.y + self.start_radius * dr;
        let c = pd.x * pd.x + pd.y * pd.y - self.start_radius * self.start_radius;

        let radius_ok = |t: f64| self.start_radius + t * dr >= 0.0;
        if a.abs() < 1e-12 {
            if b.abs() < 1e-12 {
                return None;
            }
            let t = c / (2.0 * b);
            return radius_ok(t).then_some(t);
        }
        let disc = b * b - a * c;
        if disc < 0.0 {
            return None;
        }
        let root = disc.sqrt();
        let (t1, t2) = ((b + root) / a, (b - root) / a);
        let (hi, lo) = if t1 >= t2 { (t1, t2) } else { (t2, t1) };
        if radius_ok(hi) {
            Some(hi)
        } else if radius_ok(lo) {
            Some(lo)
        } else {
            None
        }
    }
}

// ─── Surface trait ───────────────────────────────────────────────────────

/// Canvas-like raster target for the scratch-off cover.
pub trait ScratchSurface {
    /// Logical extent of the surface on each axis.
    fn logical_size(&self) -> f64;

    /// Paint `gradient` over the whole surface (source-over).
    fn fill_linear(&mut self, gradient: &LinearGradient) -> Result<(), SurfaceError>;

    /// Paint `gradient` over the whole surface at `alpha` global opacity.
    fn fill_radial(&mut self, gradient: &RadialGradient, alpha: f64) -> Result<(), SurfaceError>;

    /// Erase (destination-out) a filled disc.
    fn erase_circle(&mut self, center: Point, radius: f64) -> Result<(), SurfaceError>;

    /// Make every pixel fully transparent.
    fn clear(&mut self) -> Result<(), SurfaceError>;

    /// Alpha of the pixel under `p`.
    fn alpha_at(&self, p: Point) -> Result<u8, SurfaceError>;
}

// ─── RasterSurface ───────────────────────────────────────────────────────

/// In-memory RGBA surface of `resolution × resolution` pixels.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    logical_size: f64,
    resolution: usize,
    pixels: Vec<[u8; 4]>,
}

impl RasterSurface {
    pub fn new(logical_size: f64, resolution: usize) -> Self {
        let resolution = resolution.max(1);
        Self {
            logical_size,
            resolution,
            pixels: vec![[0, 0, 0, 0]; resolution * resolution],
        }
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    fn pixel_size(&self) -> f64 {
        self.logical_size / self.resolution as f64
    }

    fn pixel_center(&self, col: usize, row: usize) -> Point {
        let px = self.pixel_size();
        Point::new((col as f64 + 0.5) * px, (row as f64 + 0.5) * px)
    }

    /// Number of pixels with non-zero alpha.
    pub fn opaque_pixels(&self) -> usize {
        self.pixels.iter().filter(|p| p[3] > 0).count()
    }

    /// Whether every pixel is fully transparent.
    pub fn is_clear(&self) -> bool {
        self.opaque_pixels() == 0
    }

    fn paint_each(&mut self, alpha: f64, mut color_at: impl FnMut(Point) -> Option<Color>) {
        for row in 0..self.resolution {
            for col in 0..self.resolution {
                let Some(color) = color_at(self.pixel_center(col, row)) else {
                    continue;
                };
                let idx = row * self.resolution + col;
                self.pixels[idx] = source_over(self.pixels[idx], color, alpha);
            }
        }
    }
}

/// Composite `color` (scaled by `alpha`) over `dst`.
fn source_over(dst: [u8; 4], color: Color, alpha: f64) -> [u8; 4] {
    let src = color.to_rgba8();
    let sa = src.a as f64 / 255.0 * alpha.clamp(0.0, 1.0);
    let da = dst[3] as f64 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return [0, 0, 0, 0];
    }
    let channel = |s: u8, d: u8| {
        let v = (s as f64 * sa + d as f64 * da * (1.0 - sa)) / out_a;
        v.round().clamp(0.0, 255.0) as u8
    };
    [
        channel(src.r, dst[0]),
        channel(src.g, dst[1]),
        channel(src.b, dst[2]),
        (out_a * 255.0).round() as u8,
    ]
}

impl ScratchSurface for RasterSurface {
    fn logical_size(&self) -> f64 {
        self.logical_size
    }

    fn fill_linear(&mut self, gradient: &LinearGradient) -> Result<(), SurfaceError> {
        self.paint_each(1.0, |p| Some(sample_stops(&gradient.stops, gradient.parameter(p))));
        Ok(())
    }

    fn fill_radial(&mut self, gradient: &RadialGradient, alpha: f64) -> Result<(), SurfaceError> {
        self.paint_each(alpha, |p| {
            gradient
                .parameter(p)
                .map(|t| sample_stops(&gradient.stops, t))
        });
        Ok(())
    }

    fn erase_circle(&mut self, center: Point, radius: f64) -> Result<(), SurfaceError> {
        if !(center.is_finite() && radius.is_finite()) || radius <= 0.0 {
            return Ok(());
        }
        let circle = Circle::new((center.x, center.y), radius);
        let bbox = circle.bounding_box();
        let px = self.pixel_size();
        let max = self.resolution as f64 - 1.0;
        let col0 = (bbox.x0 / px).floor().clamp(0.0, max) as usize;
        let col1 = (bbox.x1 / px).floor().clamp(0.0, max) as usize;
        let row0 = (bbox.y0 / px).floor().clamp(0.0, max) as usize;
        let row1 = (bbox.y1 / px).floor().clamp(0.0, max) as usize;
        for row in row0..=row1 {
            for col in col0..=col1 {
                let c = self.pixel_center(col, row);
                if circle.contains(kurbo::Point::new(c.x, c.y)) {
                    self.pixels[row * self.resolution + col] = [0, 0, 0, 0];
                }
            }
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<(), SurfaceError> {
        self.pixels.fill([0, 0, 0, 0]);
        Ok(())
    }

    fn alpha_at(&self, p: Point) -> Result<u8, SurfaceError> {
        if !(p.is_finite()
            && p.x >= 0.0
            && p.y >= 0.0
            && p.x < self.logical_size
            && p.y < self.logical_size)
        {
            return Err(SurfaceError::OutOfBounds { x: p.x, y: p.y });
        }
        let px = self.pixel_size();
        let col = ((p.x / px) as usize).min(self.resolution - 1);
        let row = ((p.y / px) as usize).min(self.resolution - 1);
        Ok(self.pixels[row * self.resolution + col][3])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opaque_fill(surface: &mut RasterSurface) {
        let gray = Color::from_rgb8(0xC0, 0xC0, 0xC0);
        surface
            .fill_linear(&LinearGradient {
                start: Point::ZERO,
                end: Point::new(100.0, 100.0),
                stops: vec![(0.0, gray), (1.0, gray)],
            })
            .unwrap();
    }

    #[test]
    fn linear_fill_covers_everything() {
        let mut s = RasterSurface::new(100.0, 20);
        assert!(s.is_clear());
        opaque_fill(&mut s);
        assert_eq!(s.opaque_pixels(), 400);
        assert_eq!(s.alpha_at(Point::new(99.0, 0.0)).unwrap(), 255);
    }

    #[test]
    fn erase_circle_cuts_a_hole() {
        let mut s = RasterSurface::new(100.0, 100);
        opaque_fill(&mut s);
        s.erase_circle(Point::new(50.0, 50.0), 10.0).unwrap();
        assert_eq!(s.alpha_at(Point::new(50.0, 50.0)).unwrap(), 0);
        assert_eq!(s.alpha_at(Point::new(50.0, 58.0)).unwrap(), 0);
        assert_eq!(s.alpha_at(Point::new(50.0, 62.0)).unwrap(), 255);
        assert_eq!(s.alpha_at(Point::new(5.0, 5.0)).unwrap(), 255);
    }

    #[test]
    fn erase_near_edge_is_clipped() {
        let mut s = RasterSurface::new(100.0, 50);
        opaque_fill(&mut s);
        s.erase_circle(Point::new(-5.0, -5.0), 12.0).unwrap();
        assert_eq!(s.alpha_at(Point::new(0.5, 0.5)).unwrap(), 0);
        s.erase_circle(Point::new(500.0, 500.0), 10.0).unwrap();
    }

    #[test]
    fn clear_and_out_of_bounds() {
        let mut s = RasterSurface::new(100.0, 10);
        opaque_fill(&mut s);
        s.clear().unwrap();
        assert!(s.is_clear());
        assert!(matches!(
            s.alpha_at(Point::new(100.0, 5.0)),
            Err(SurfaceError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn gradient_stops_interpolate_and_pad() {
        let black = Color::from_rgb8(0, 0, 0);
        let white = Color::from_rgb8(255, 255, 255);
        let stops = vec![(0.0, black), (1.0, white)];
        assert_eq!(sample_stops(&stops, -1.0).to_rgba8().r, 0);
        assert_eq!(sample_stops(&stops, 0.5).to_rgba8().r, 128);
        assert_eq!(sample_stops(&stops, 3.0).to_rgba8().r, 255);
        assert_eq!(sample_stops(&[], 0.5).to_rgba8().a, 0);
    }

    #[test]
    fn radial_parameter_matches_concentric_case() {
        let g = RadialGradient {
            start_center: Point::new(50.0, 50.0),
            start_radius: 0.0,
            end_center: Point::new(50.0, 50.0),
            end_radius: 20.0,
            stops: Vec::new(),
        };
        let t = g.parameter(Point::new(60.0, 50.0)).unwrap();
        assert!((t - 0.5).abs() < 1e-9);
        let t = g.parameter(Point::new(50.0, 90.0)).unwrap();
        assert!((t - 2.0).abs() < 1e-9);
    }

    #[test]
    fn translucent_radial_fill_blends() {
        let mut s = RasterSurface::new(10.0, 1);
        let white = Color::from_rgb8(255, 255, 255);
        s.fill_radial(
            &RadialGradient {
                start_center: Point::new(5.0, 5.0),
                start_radius: 0.0,
                end_center: Point::new(5.0, 5.0),
                end_radius: 10.0,
                stops: vec![(0.0, white), (1.0, white)],
            },
            0.4,
        )
        .unwrap();
        assert_eq!(s.alpha_at(Point::new(5.0, 5.0)).unwrap(), 102);
    }
}
