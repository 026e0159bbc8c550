//! Progress ring: colour tone, hint, and SVG geometry.

use peniko::Color;

/// Ring colour band for a progress fraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressTone {
    Cyan,
    Blue,
    Purple,
    Pink,
    Amber,
}

impl ProgressTone {
    pub fn color(self) -> Color {
        match self {
            ProgressTone::Cyan => Color::from_rgb8(0x22, 0xD3, 0xEE),
            ProgressTone::Blue => Color::from_rgb8(0x3B, 0x82, 0xF6),
            ProgressTone::Purple => Color::from_rgb8(0xA7, 0x8B, 0xFA),
            ProgressTone::Pink => Color::from_rgb8(0xF4, 0x72, 0xB6),
            ProgressTone::Amber => Color::from_rgb8(0xFB, 0xBF, 0x24),
        }
    }
}

pub fn progress_tone(progress: f64) -> ProgressTone {
    if progress < 0.25 {
        ProgressTone::Cyan
    } else if progress < 0.5 {
        ProgressTone::Blue
    } else if progress < 0.75 {
        ProgressTone::Purple
    } else if progress < 1.0 {
        ProgressTone::Pink
    } else {
        ProgressTone::Amber
    }
}

/// Short prompt shown under the percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressHint {
    Continue,
    Almost,
    Done,
}

impl ProgressHint {
    pub fn text(self) -> &'static str {
        match self {
            ProgressHint::Continue => "Keep scratching",
            ProgressHint::Almost => "Almost there!",
            ProgressHint::Done => "Done!",
        }
    }
}

/// Whole-percent value as displayed.
pub fn progress_percent(progress: f64) -> u32 {
    (progress.clamp(0.0, 1.0) * 100.0).round() as u32
}

/// Thresholds apply to the rounded percentage, so 69.6 % already reads "almost".
pub fn progress_hint(progress: f64) -> ProgressHint {
    match progress_percent(progress) {
        0..70 => ProgressHint::Continue,
        70..100 => ProgressHint::Almost,
        _ => ProgressHint::Done,
    }
}

/// Geometry of a circular progress stroke inside a `size × size` box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingGeometry {
    pub size: f64,
    pub stroke_width: f64,
    pub radius: f64,
    pub circumference: f64,
}

impl Default for RingGeometry {
    fn default() -> Self {
        Self::new(120.0, 8.0)
    }
}

impl RingGeometry {
    pub fn new(size: f64, stroke_width: f64) -> Self {
        let radius = ((size - stroke_width) / 2.0).max(0.0);
        Self {
            size,
            stroke_width,
            radius,
            circumference: 2.0 * std::f64::consts::PI * radius,
        }
    }

    /// `stroke-dashoffset` leaving `progress` of the ring drawn.
    pub fn dash_offset(&self, progress: f64) -> f64 {
        self.circumference - progress.clamp(0.0, 1.0) * self.circumference
    }
}
