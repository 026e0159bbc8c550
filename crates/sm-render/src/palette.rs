//! Region and progress colours.

use peniko::Color;
use sm_core::Region;

/// Fill for markers that are neither visited nor otherwise flagged.
pub const NEUTRAL: Color = Color::from_rgb8(0x64, 0x74, 0x8b);

pub const COVER_LIGHT: Color = Color::from_rgb8(0xC0, 0xC0, 0xC0);
pub const COVER_DARK: Color = Color::from_rgb8(0xA8, 0xA8, 0xA8);

pub fn region_color(region: Region) -> Color {
    match region {
        Region::Hokkaido => Color::from_rgb8(0x22, 0xd3, 0xee),
        Region::Tohoku => Color::from_rgb8(0x38, 0xbd, 0xf8),
        Region::Kanto => Color::from_rgb8(0x60, 0xa5, 0xfa),
        Region::Chubu => Color::from_rgb8(0x81, 0x8c, 0xf8),
        Region::Kansai => Color::from_rgb8(0xa7, 0x8b, 0xfa),
        Region::ChugokuShikoku => Color::from_rgb8(0xc0, 0x84, 0xfc),
        Region::Kyushu => Color::from_rgb8(0xe8, 0x79, 0xf9),
    }
}

/// `#rrggbb`, or `rgba(r, g, b, a)` when not fully opaque.
pub fn css_color(color: Color) -> String {
    let c = color.to_rgba8();
    if c.a == 255 {
        format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b)
    } else {
        let alpha = (c.a as f64 / 255.0 * 1000.0).round() / 1000.0;
        format!("rgba({}, {}, {}, {alpha})", c.r, c.g, c.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_hex_for_opaque() {
        assert_eq!(css_color(region_color(Region::Hokkaido)), "#22d3ee");
        assert_eq!(css_color(NEUTRAL), "#64748b");
    }

    #[test]
    fn css_rgba_for_translucent() {
        let c = Color::from_rgba8(255, 255, 255, 0);
        assert_eq!(css_color(c), "rgba(255, 255, 255, 0)");
    }

    #[test]
    fn every_region_has_a_distinct_colour() {
        let mut seen: Vec<String> = Region::ALL.iter().map(|&r| css_color(region_color(r))).collect();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), Region::ALL.len());
    }
}
