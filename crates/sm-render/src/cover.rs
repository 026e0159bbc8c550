//! The opaque silver layer the user scratches away.

use crate::palette::{COVER_DARK, COVER_LIGHT};
use crate::surface::{LinearGradient, RadialGradient, ScratchSurface, SurfaceError};
use peniko::Color;
use sm_core::Point;

/// Global opacity of the shimmer highlight.
const SHIMMER_ALPHA: f64 = 0.4;

/// Paint a fresh cover centred on `center` (logical units).
///
/// The metal gradient runs diagonally across the reveal square and covers the
/// whole surface; a soft highlight sits up and left of the centre. An
/// already-visited target starts fully revealed.
pub fn paint_cover<S: ScratchSurface + ?Sized>(
    surface: &mut S,
    center: Point,
    area_radius: f64,
    already_visited: bool,
) -> Result<(), SurfaceError> {
    surface.clear()?;
    surface.fill_linear(&LinearGradient {
        start: Point::new(center.x - area_radius, center.y - area_radius),
        end: Point::new(center.x + area_radius, center.y + area_radius),
        stops: vec![(0.0, COVER_LIGHT), (0.5, COVER_DARK), (1.0, COVER_LIGHT)],
    })?;
    surface.fill_radial(
        &RadialGradient {
            start_center: Point::new(center.x - area_radius * 0.3, center.y - area_radius * 0.3),
            start_radius: 0.0,
            end_center: center,
            end_radius: area_radius,
            stops: vec![
                (0.0, Color::from_rgba8(255, 255, 255, 230)),
                (0.5, Color::from_rgba8(255, 255, 255, 77)),
                (1.0, Color::from_rgba8(255, 255, 255, 0)),
            ],
        },
        SHIMMER_ALPHA,
    )?;
    if already_visited {
        surface.clear()?;
    }
    log::debug!("cover: painted at {center:?} (visited: {already_visited})");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RasterSurface;

    #[test]
    fn fresh_cover_is_fully_opaque() {
        let mut s = RasterSurface::new(1000.0, 50);
        paint_cover(&mut s, Point::new(750.0, 180.0), 200.0, false).unwrap();
        assert_eq!(s.opaque_pixels(), 50 * 50);
        assert_eq!(s.alpha_at(Point::new(750.0, 180.0)).unwrap(), 255);
        assert_eq!(s.alpha_at(Point::new(10.0, 990.0)).unwrap(), 255);
    }

    #[test]
    fn visited_cover_starts_clear() {
        let mut s = RasterSurface::new(1000.0, 20);
        paint_cover(&mut s, Point::new(500.0, 500.0), 200.0, true).unwrap();
        assert!(s.is_clear());
    }

    #[test]
    fn repainting_restores_erased_area() {
        let mut s = RasterSurface::new(1000.0, 100);
        let c = Point::new(500.0, 500.0);
        paint_cover(&mut s, c, 200.0, false).unwrap();
        s.erase_circle(c, 40.0).unwrap();
        assert_eq!(s.alpha_at(c).unwrap(), 0);
        paint_cover(&mut s, c, 200.0, false).unwrap();
        assert_eq!(s.alpha_at(c).unwrap(), 255);
    }
}
