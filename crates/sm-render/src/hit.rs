//! Hit testing: screen point → marker lookup.

use kurbo::{Circle, Shape};
use sm_core::{Catalog, LocationId, Point, Transform, ViewportRect};

/// Find the marker whose hit circle contains `screen`.
///
/// `screen` is container-relative. `radius` is in logical units and scales
/// with the map, like the marker's transparent hit area. When circles
/// overlap the nearest centre wins; ties go to the later (topmost) marker.
pub fn hit_test_marker(
    catalog: &Catalog,
    transform: &Transform,
    rect: &ViewportRect,
    logical_size: f64,
    screen: Point,
    radius: f64,
) -> Option<LocationId> {
    if rect.is_degenerate() || !screen.is_finite() {
        return None;
    }
    let screen_radius = radius / logical_size * rect.width * transform.scale;
    let probe = kurbo::Point::new(screen.x, screen.y);

    let mut best: Option<(f64, LocationId)> = None;
    for loc in catalog {
        let center = transform.project(loc.position, rect, logical_size);
        let circle = Circle::new((center.x, center.y), screen_radius);
        if !circle.contains(probe) {
            continue;
        }
        let d = probe.distance(circle.center);
        if best.is_none_or(|(bd, _)| d <= bd) {
            best = Some((d, loc.id));
        }
    }
    best.map(|(_, id)| id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sm_core::{Location, Region};

    fn catalog() -> Catalog {
        let loc = |id: &str, x: f64, y: f64| Location {
            id: LocationId::intern(id),
            display_name: id.into(),
            region: Region::Tohoku,
            position: Point::new(x, y),
        };
        Catalog::new(vec![
            loc("hit-a", 100.0, 100.0),
            loc("hit-b", 140.0, 100.0),
            loc("hit-c", 800.0, 800.0),
        ])
        .unwrap()
    }

    const RECT: ViewportRect = ViewportRect::new(0.0, 0.0, 500.0, 500.0);

    #[test]
    fn nearest_marker_wins() {
        let c = catalog();
        let t = Transform::IDENTITY;
        // Logical (100,100) sits at (50,50) in a 500px container.
        let hit = hit_test_marker(&c, &t, &RECT, 1000.0, Point::new(52.0, 50.0), 30.0);
        assert_eq!(hit, Some(LocationId::intern("hit-a")));
        let hit = hit_test_marker(&c, &t, &RECT, 1000.0, Point::new(68.0, 50.0), 30.0);
        assert_eq!(hit, Some(LocationId::intern("hit-b")));
    }

    #[test]
    fn miss_returns_none() {
        let c = catalog();
        let hit = hit_test_marker(
            &c,
            &Transform::IDENTITY,
            &RECT,
            1000.0,
            Point::new(250.0, 250.0),
            30.0,
        );
        assert_eq!(hit, None);
    }

    #[test]
    fn hit_area_follows_transform() {
        let c = catalog();
        let t = Transform::new(2.0, -100.0, -100.0);
        // (800,800) → content (400,400) → screen (700,700); radius 30 → 30px.
        let hit = hit_test_marker(&c, &t, &RECT, 1000.0, Point::new(725.0, 700.0), 30.0);
        assert_eq!(hit, Some(LocationId::intern("hit-c")));
        let miss = hit_test_marker(&c, &t, &RECT, 1000.0, Point::new(735.0, 700.0), 30.0);
        assert_eq!(miss, None);
    }

    #[test]
    fn degenerate_rect_never_hits() {
        let c = catalog();
        let hit = hit_test_marker(
            &c,
            &Transform::IDENTITY,
            &ViewportRect::sized(0.0, 0.0),
            1000.0,
            Point::ZERO,
            30.0,
        );
        assert_eq!(hit, None);
    }
}
