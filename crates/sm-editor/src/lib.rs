pub mod controller;
pub mod gesture;
pub mod input;
pub mod scratch;
pub mod session;

pub use controller::{ControllerResponse, MapController, MapEvent};
pub use gesture::{GestureController, GestureEvent, GestureMode, GestureResponse};
pub use input::{InputEvent, PointerId, PointerKind};
pub use scratch::{GridMask, ScratchEngine, ScratchMask, bresenham};
pub use session::{FocusSession, ScratchSessionEvent};
