//! Focus session value and the events a scratch session emits.

use sm_core::{LocationId, Target};

/// The location currently open for scratching.
///
/// Created when a location is focused and dropped when focus changes or
/// exits. Passed by reference through gesture → viewport → scratch.
#[derive(Debug, Clone, PartialEq)]
pub struct FocusSession {
    pub target: Target,
    /// Already in the visited set when focus began.
    pub already_completed: bool,
}

impl FocusSession {
    pub fn new(target: Target, already_completed: bool) -> Self {
        Self {
            target,
            already_completed,
        }
    }

    pub fn id(&self) -> LocationId {
        self.target.id
    }
}

/// Everything a scratch session reports, in emission order.
#[derive(Debug, Clone, PartialEq)]
pub enum ScratchSessionEvent {
    /// New progress value in `[0, 1]`.
    Progress(f64),
    /// A milestone fraction was reached for the first time this session.
    Milestone(f64),
    /// The completion threshold was crossed. Fires at most once per session.
    Completed(LocationId),
    /// The first contact landed too far from the target; leave focus.
    ExitFocus,
}
