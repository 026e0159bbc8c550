//! Tunable constants for the map, scratch, gesture, and label subsystems.
//!
//! Every struct deserializes from a partial camelCase JSON object; missing
//! fields keep their defaults. [`Config::validated`] repairs values that would
//! break an invariant downstream (inverted scale bounds, thresholds outside
//! `(0, 1]`) instead of rejecting the whole config.

use crate::error::CoreError;
use crate::geometry::LOGICAL_SIZE;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub map: MapConfig,
    pub scratch: ScratchConfig,
    pub gesture: GestureConfig,
    pub labels: LabelConfig,
}

impl Config {
    /// Parse a (possibly partial) JSON override of the defaults.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let config: Config = serde_json::from_str(json)?;
        Ok(config.validated())
    }

    /// Repair out-of-range values, logging each fix.
    pub fn validated(mut self) -> Self {
        let map = &mut self.map;
        if !(map.logical_size.is_finite() && map.logical_size > 0.0) {
            log::warn!("config: logical size {} replaced with {LOGICAL_SIZE}", map.logical_size);
            map.logical_size = LOGICAL_SIZE;
        }
        if !(map.min_scale > 0.0) {
            log::warn!("config: min scale {} replaced with 0.5", map.min_scale);
            map.min_scale = 0.5;
        }
        if map.max_scale < map.min_scale {
            log::warn!(
                "config: max scale {} below min scale {}, swapping",
                map.max_scale,
                map.min_scale
            );
            std::mem::swap(&mut map.min_scale, &mut map.max_scale);
        }
        map.focus_scale = map.focus_scale.clamp(map.min_scale, map.max_scale);

        let scratch = &mut self.scratch;
        if !(scratch.complete_threshold > 0.0 && scratch.complete_threshold <= 1.0) {
            log::warn!(
                "config: completion threshold {} replaced with 0.7",
                scratch.complete_threshold
            );
            scratch.complete_threshold = 0.7;
        }
        scratch.grid_size = scratch.grid_size.max(1);
        scratch.check_every = scratch.check_every.max(1);
        if scratch.abandon_radius < scratch.area_radius {
            scratch.abandon_radius = scratch.area_radius;
        }
        scratch
            .milestones
            .retain(|m| m.is_finite() && *m > 0.0 && *m <= 1.0);
        scratch.milestones.sort_by(f64::total_cmp);
        scratch.milestones.dedup();
        self
    }
}

/// Viewport limits and animation timings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MapConfig {
    /// Extent of the logical coordinate space (SVG viewBox size).
    pub logical_size: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    /// Scale applied when a location is focused.
    pub focus_scale: f64,
    /// Fraction of the viewport dimension translation may reach, per unit of scale.
    pub pan_limit_factor: f64,
    pub focus_duration_ms: f64,
    pub reset_duration_ms: f64,
    /// Delay between a completed scratch and leaving focus.
    pub auto_exit_delay_ms: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            logical_size: LOGICAL_SIZE,
            min_scale: 0.5,
            max_scale: 4.0,
            focus_scale: 1.35,
            pan_limit_factor: 0.8,
            focus_duration_ms: 800.0,
            reset_duration_ms: 500.0,
            auto_exit_delay_ms: 1200.0,
        }
    }
}

/// Scratch grid geometry and progress policy. Distances are logical units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScratchConfig {
    /// Cells per side of the square grid laid over the reveal circle.
    pub grid_size: usize,
    pub brush_radius: f64,
    /// Radius of the circular reveal region around the target.
    pub area_radius: f64,
    /// A first point farther than this from the target abandons focus.
    pub abandon_radius: f64,
    pub complete_threshold: f64,
    pub milestones: Vec<f64>,
    /// Progress events are emitted every Nth stroke (threshold crossings always are).
    pub check_every: u32,
}

impl Default for ScratchConfig {
    fn default() -> Self {
        Self {
            grid_size: 10,
            brush_radius: 40.0,
            area_radius: 200.0,
            abandon_radius: 300.0,
            complete_threshold: 0.7,
            milestones: vec![0.25, 0.5, 0.75, 1.0],
            check_every: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GestureConfig {
    pub wheel_zoom_in: f64,
    pub wheel_zoom_out: f64,
    /// Maximum travel (px) of a press that still counts as a tap.
    pub tap_slop: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            wheel_zoom_in: 1.1,
            wheel_zoom_out: 0.9,
            tap_slop: 8.0,
        }
    }
}

/// Label footprint estimation and declutter policy. Sizes are screen pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LabelConfig {
    /// Above this scale every label becomes a candidate.
    pub show_scale_threshold: f64,
    pub char_width: f64,
    pub padding: f64,
    pub height: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    pub margin: f64,
    pub neighbor_count: usize,
    /// Radius of the clickable area around a marker, in logical units.
    pub marker_hit_radius: f64,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            show_scale_threshold: 2.8,
            char_width: 14.0,
            padding: 8.0,
            height: 28.0,
            offset_x: 12.0,
            offset_y: -20.0,
            margin: 4.0,
            neighbor_count: 5,
            marker_hit_radius: 30.0,
        }
    }
}
