//! Status returned by behavior nodes.

/// The result of evaluating a behavior node.
///
/// # Frame-based Semantics
///
/// The tree is ticked once per update frame. Most nodes settle within that
/// frame, but a node waiting on external work reports `Running` and is
/// resumed (not restarted) on the next tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// The behavior completed successfully.
    ///
    /// For conditions: The condition was met.
    /// For actions: The unit of work finished.
    Success,

    /// The behavior does not apply right now.
    ///
    /// For conditions: The condition was not met.
    /// For actions: The work could not be carried out this frame.
    ///
    /// Failure is an expected outcome, never a program error.
    Failure,

    /// The behavior is still in progress and keeps control across ticks.
    Running,
}

impl Status {
    /// Returns `true` if this status is `Success`.
    #[inline]
    pub fn is_success(self) -> bool {
        matches!(self, Status::Success)
    }

    /// Returns `true` if this status is `Failure`.
    #[inline]
    pub fn is_failure(self) -> bool {
        matches!(self, Status::Failure)
    }

    /// Returns `true` if this status is `Running`.
    #[inline]
    pub fn is_running(self) -> bool {
        matches!(self, Status::Running)
    }

    /// Swaps Success and Failure. `Running` is left untouched.
    #[inline]
    pub fn invert(self) -> Self {
        match self {
            Status::Success => Status::Failure,
            Status::Failure => Status::Success,
            Status::Running => Status::Running,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invert_keeps_running() {
        assert_eq!(Status::Success.invert(), Status::Failure);
        assert_eq!(Status::Failure.invert(), Status::Success);
        assert_eq!(Status::Running.invert(), Status::Running);
    }
}
