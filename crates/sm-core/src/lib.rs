pub mod catalog;
pub mod config;
pub mod error;
pub mod geometry;
pub mod id;
pub mod labels;
pub mod model;
pub mod viewport;

pub use catalog::{Catalog, RegionStats, VisitStats};
pub use config::{Config, GestureConfig, LabelConfig, MapConfig, ScratchConfig};
pub use error::CoreError;
pub use geometry::{Bounds, CoordinateTransform, LOGICAL_SIZE, Point, ViewportRect, distance};
pub use id::LocationId;
pub use labels::{InteractionState, LabelCandidate, LabelPriority, compute_visible_labels};
pub use model::{Location, Region, Target, VisitedSet, VisitedStore};
pub use viewport::{Transform, Transition, ViewportTransform};
