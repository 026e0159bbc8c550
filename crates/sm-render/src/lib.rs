pub mod cover;
pub mod hit;
pub mod markers;
pub mod palette;
pub mod progress;
pub mod surface;

pub use cover::paint_cover;
pub use hit::hit_test_marker;
pub use markers::{MarkerState, MarkerStyle, MarkerView, build_markers};
pub use progress::{ProgressHint, ProgressTone, RingGeometry, progress_hint, progress_tone};
pub use surface::{RasterSurface, ScratchSurface, SurfaceError};
