//! The node trait and the clock used by time-aware decorators.

use crate::Status;

/// A node ticked against a blackboard of type `C`.
///
/// Nodes may keep resumption state between ticks (hence `&mut self`), so a
/// tree has a single owner that drives it.
pub trait Behavior<C>: Send {
    /// Advances the node by one step.
    ///
    /// `Success` and `Failure` are final for this activation; `Running` means
    /// the same node must be ticked again to make progress.
    fn tick(&mut self, ctx: &mut C) -> Status;

    /// Drops any resumption memory so the next tick starts from scratch.
    ///
    /// Composites forward this to their children. Stateless leaves keep the
    /// default no-op.
    fn reset(&mut self) {}
}

/// Lets boxed nodes be nested and stored in child lists.
impl<C> Behavior<C> for Box<dyn Behavior<C>> {
    #[inline]
    fn tick(&mut self, ctx: &mut C) -> Status {
        (**self).tick(ctx)
    }

    #[inline]
    fn reset(&mut self) {
        (**self).reset()
    }
}

/// Source of the current time for time-aware nodes such as
/// [`Cooldown`](crate::Cooldown).
///
/// The unit is whatever the context counts in; the assistant uses update
/// ticks.
pub trait Clock {
    /// Returns the current time.
    fn now(&self) -> u64;
}
