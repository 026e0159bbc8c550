//! Error type shared by the core crate.
//!
//! None of these are meant to reach the user. Callers on the gesture path log
//! them and carry on with a no-op.

use crate::id::LocationId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A viewport or element rect with zero (or non-finite) width or height.
    #[error("degenerate viewport rect {width}x{height}")]
    DegenerateViewport { width: f64, height: f64 },

    /// A zoom factor that is zero, negative, or not finite.
    #[error("invalid zoom factor {0}")]
    InvalidZoomFactor(f64),

    #[error("duplicate location id `{0}` in catalog")]
    DuplicateLocation(LocationId),

    #[error("unknown location id `{0}`")]
    UnknownLocation(String),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}
