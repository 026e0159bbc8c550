//! SVG overlays: marker layer and the progress ring.
//!
//! Markers are emitted in logical coordinates (`viewBox="0 0 L L"`) so the
//! layer can sit inside the transformed map container. Sizes and label
//! offsets are given in screen pixels and divided by the on-screen pixels
//! per logical unit, so labels land on the boxes the declutter pass used.

use sm_core::LabelConfig;
use sm_render::markers::MarkerView;
use sm_render::palette::css_color;
use sm_render::progress::{RingGeometry, progress_hint, progress_percent, progress_tone};
use std::fmt::Write;

/// Marker dot radius in screen pixels at marker scale 1.
const MARKER_RADIUS: f64 = 6.0;
const LABEL_FONT_SIZE: f64 = 14.0;

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Screen pixels per logical unit for a container `container_width` px wide
/// at `zoom`; 1 when either is unusable.
fn pixels_per_logical(logical_size: f64, container_width: f64, zoom: f64) -> f64 {
    let k = container_width / logical_size * zoom;
    if k.is_finite() && k > 0.0 { k } else { 1.0 }
}

pub fn render_markers(
    markers: &[MarkerView],
    logical_size: f64,
    container_width: f64,
    zoom: f64,
    labels: &LabelConfig,
) -> String {
    let k = pixels_per_logical(logical_size, container_width, zoom);
    let mut out = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {l} {l}" width="100%" height="100%">"#,
        l = logical_size
    );

    for m in markers {
        let r = MARKER_RADIUS * m.style.scale / k;
        let (x, y) = (m.position.x, m.position.y);
        let accent = css_color(m.accent);
        let _ = write!(out, r#"<g data-id="{}">"#, escape(m.id.as_str()));
        if m.style.glow {
            let _ = write!(
                out,
                r#"<circle cx="{x}" cy="{y}" r="{}" fill="{accent}" opacity="0.3"/>"#,
                r * 2.0
            );
        }
        if m.style.pulse {
            let _ = write!(
                out,
                r#"<circle class="pulse" cx="{x}" cy="{y}" r="{}" fill="none" stroke="{accent}" stroke-width="{}"/>"#,
                r * 1.6,
                1.5 / k
            );
        }
        let _ = write!(
            out,
            r##"<circle cx="{x}" cy="{y}" r="{r}" fill="{}" stroke="#ffffff" stroke-width="{}"/>"##,
            css_color(m.style.fill),
            1.0 / k
        );
        if m.label_visible {
            let _ = write!(
                out,
                r##"<text x="{}" y="{}" font-size="{}" dominant-baseline="central" fill="#f8fafc" stroke="{accent}" stroke-width="{}" paint-order="stroke">{}</text>"##,
                x + (labels.offset_x + labels.padding) / k,
                y + (labels.offset_y + labels.height / 2.0) / k,
                LABEL_FONT_SIZE / k,
                3.0 / k,
                escape(&m.name)
            );
        }
        out.push_str("</g>");
    }

    out.push_str("</svg>");
    out
}

/// Ring with percentage and hint text for `progress` in `[0, 1]`.
pub fn render_progress_ring(progress: f64, ring: &RingGeometry) -> String {
    let c = ring.size / 2.0;
    let tone = css_color(progress_tone(progress).color());
    let mut out = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{s}" height="{s}" viewBox="0 0 {s} {s}">"#,
        s = ring.size
    );
    let _ = write!(
        out,
        r#"<circle cx="{c}" cy="{c}" r="{}" fill="none" stroke="rgba(255, 255, 255, 0.15)" stroke-width="{}"/>"#,
        ring.radius, ring.stroke_width
    );
    let _ = write!(
        out,
        r#"<circle cx="{c}" cy="{c}" r="{}" fill="none" stroke="{tone}" stroke-width="{}" stroke-linecap="round" stroke-dasharray="{:.3}" stroke-dashoffset="{:.3}" transform="rotate(-90 {c} {c})"/>"#,
        ring.radius,
        ring.stroke_width,
        ring.circumference,
        ring.dash_offset(progress)
    );
    let _ = write!(
        out,
        r#"<text x="{c}" y="{c}" text-anchor="middle" font-size="24" fill="{tone}">{}%</text>"#,
        progress_percent(progress)
    );
    let _ = write!(
        out,
        r##"<text x="{c}" y="{}" text-anchor="middle" font-size="11" fill="#cbd5e1">{}</text>"##,
        c + 20.0,
        progress_hint(progress).text()
    );
    out.push_str("</svg>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use sm_core::labels::{InteractionState, label_bounds};
    use sm_core::{Catalog, Location, LocationId, Point, Region};
    use sm_render::markers::build_markers;

    fn markers(label: bool) -> Vec<MarkerView> {
        let id = LocationId::intern("svg-a&b");
        let catalog = Catalog::new(vec![Location {
            id,
            display_name: "Zaō <Onsen>".into(),
            region: Region::Tohoku,
            position: Point::new(660.0, 480.0),
        }])
        .unwrap();
        let state = InteractionState {
            focused: Some(id),
            ..Default::default()
        };
        let labels = if label { vec![id] } else { Vec::new() };
        build_markers(&catalog, &state, &labels)
    }

    #[test]
    fn marker_layer_escapes_and_positions() {
        let svg = render_markers(&markers(true), 1000.0, 1000.0, 1.0, &LabelConfig::default());
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"viewBox="0 0 1000 1000""#));
        assert!(svg.contains(r#"data-id="svg-a&amp;b""#));
        assert!(svg.contains(r#"cx="660" cy="480""#));
        assert!(svg.contains("Zaō &lt;Onsen&gt;"));
        // Box at (660 + 12, 480 - 20); text inset by the padding and centred
        // on the 28 px box height.
        assert!(svg.contains(r#"<text x="680" y="474" font-size="14""#));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn label_offsets_follow_container_size() {
        let cfg = LabelConfig::default();
        // Half-size container: one logical unit is half a screen pixel.
        let svg = render_markers(&markers(true), 1000.0, 500.0, 1.0, &cfg);
        assert!(svg.contains(r#"<text x="700" y="468" font-size="28""#));
        // Zooming in by the same factor lands back on the full-size layout.
        let zoomed = render_markers(&markers(true), 1000.0, 500.0, 2.0, &cfg);
        assert!(zoomed.contains(r#"<text x="680" y="474" font-size="14""#));

        // The text anchor sits inside the screen-space box the declutter
        // pass reserved for this label.
        let k = 0.5;
        let bounds = label_bounds(Point::new(660.0 * k, 480.0 * k), "Zaō <Onsen>", &cfg);
        let (text_x, text_y) = (700.0 * k, 468.0 * k);
        assert!(text_x > bounds.x && text_x < bounds.x + bounds.width);
        assert!(text_y > bounds.y && text_y < bounds.y + bounds.height);
    }

    #[test]
    fn hidden_label_emits_no_text() {
        let svg = render_markers(&markers(false), 1000.0, 1000.0, 2.0, &LabelConfig::default());
        assert!(!svg.contains("<text"));
    }

    #[test]
    fn ring_shows_percent_and_hint() {
        let svg = render_progress_ring(0.72, &RingGeometry::default());
        assert!(svg.contains(">72%<"));
        assert!(svg.contains("Almost there!"));
        assert!(svg.contains("#a78bfa"));
    }
}
