//! Decorator behavior nodes.
//!
//! Decorators wrap a single child behavior and modify its result or execution.
//! This module provides [`Inverter`] (NOT logic), [`AlwaysSucceed`] (error
//! suppression), [`Guard`] (predicate gate) and [`Cooldown`] (time gate).

use crate::{Behavior, Clock, Status};

/// Predicate evaluated by a [`Guard`] against the context.
pub type Predicate<C> = Box<dyn Fn(&C) -> bool + Send + Sync>;

/// Inverts the result of its child behavior.
///
/// # Semantics
///
/// - If the child returns `Success`, the inverter returns `Failure`
/// - If the child returns `Failure`, the inverter returns `Success`
/// - `Running` passes through unchanged
///
/// This is analogous to a logical NOT (!) operation.
pub struct Inverter<C> {
    child: Box<dyn Behavior<C>>,
}

impl<C> Inverter<C> {
    /// Creates a new inverter that wraps the given child behavior.
    pub fn new(child: Box<dyn Behavior<C>>) -> Self {
        Self { child }
    }
}

impl<C> Behavior<C> for Inverter<C> {
    fn tick(&mut self, ctx: &mut C) -> Status {
        self.child.tick(ctx).invert()
    }

    fn reset(&mut self) {
        self.child.reset();
    }
}

/// Returns `Success` once its child settles, regardless of the outcome.
///
/// # Semantics
///
/// - If the child returns `Success`, returns `Success`
/// - If the child returns `Failure`, **still returns `Success`**
/// - If the child returns `Running`, returns `Running`
///
/// This is useful for:
/// - Optional behaviors that shouldn't cause a sequence to fail
/// - Fire-and-forget side effects
pub struct AlwaysSucceed<C> {
    child: Box<dyn Behavior<C>>,
}

impl<C> AlwaysSucceed<C> {
    /// Creates a new always-succeed wrapper around the given child behavior.
    pub fn new(child: Box<dyn Behavior<C>>) -> Self {
        Self { child }
    }
}

impl<C> Behavior<C> for AlwaysSucceed<C> {
    fn tick(&mut self, ctx: &mut C) -> Status {
        match self.child.tick(ctx) {
            Status::Running => Status::Running,
            Status::Success | Status::Failure => Status::Success,
        }
    }

    fn reset(&mut self) {
        self.child.reset();
    }
}

/// Only lets its child run while a predicate over the context holds.
///
/// # Semantics
///
/// - Predicate `false`: returns `Failure` **without ticking the child**, so no
///   child-internal state advances
/// - Predicate `true`: returns whatever the child returns
pub struct Guard<C> {
    predicate: Predicate<C>,
    child: Box<dyn Behavior<C>>,
}

impl<C> Guard<C> {
    /// Creates a guard around `child`.
    pub fn new(
        predicate: impl Fn(&C) -> bool + Send + Sync + 'static,
        child: Box<dyn Behavior<C>>,
    ) -> Self {
        Self {
            predicate: Box::new(predicate),
            child,
        }
    }
}

impl<C> Behavior<C> for Guard<C> {
    fn tick(&mut self, ctx: &mut C) -> Status {
        if !(self.predicate)(ctx) {
            return Status::Failure;
        }
        self.child.tick(ctx)
    }

    fn reset(&mut self) {
        self.child.reset();
    }
}

/// Closes its branch for `period` time units after the child succeeds.
///
/// While cooling down the decorator returns `Failure` without ticking the
/// child. Resetting the tree does not reopen the branch early.
pub struct Cooldown<C> {
    child: Box<dyn Behavior<C>>,
    period: u64,
    last_success: Option<u64>,
}

impl<C> Cooldown<C> {
    /// Creates a cooldown gate around `child`.
    pub fn new(period: u64, child: Box<dyn Behavior<C>>) -> Self {
        Self {
            child,
            period,
            last_success: None,
        }
    }
}

impl<C: Clock> Behavior<C> for Cooldown<C> {
    fn tick(&mut self, ctx: &mut C) -> Status {
        let now = ctx.now();
        if let Some(last) = self.last_success
            && now.saturating_sub(last) < self.period
        {
            return Status::Failure;
        }

        let status = self.child.tick(ctx);
        if status.is_success() {
            self.last_success = Some(now);
        }
        status
    }

    fn reset(&mut self) {
        self.child.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestContext {
        value: i32,
        now: u64,
    }

    impl Clock for TestContext {
        fn now(&self) -> u64 {
            self.now
        }
    }

    struct IsPositive;
    impl Behavior<TestContext> for IsPositive {
        fn tick(&mut self, ctx: &mut TestContext) -> Status {
            if ctx.value > 0 {
                Status::Success
            } else {
                Status::Failure
            }
        }
    }

    struct Increment;
    impl Behavior<TestContext> for Increment {
        fn tick(&mut self, ctx: &mut TestContext) -> Status {
            ctx.value += 1;
            Status::Success
        }
    }

    struct FailAndIncrement;
    impl Behavior<TestContext> for FailAndIncrement {
        fn tick(&mut self, ctx: &mut TestContext) -> Status {
            ctx.value += 1;
            Status::Failure
        }
    }

    struct Pending;
    impl Behavior<TestContext> for Pending {
        fn tick(&mut self, _ctx: &mut TestContext) -> Status {
            Status::Running
        }
    }

    fn ctx(value: i32) -> TestContext {
        TestContext { value, now: 0 }
    }

    #[test]
    fn inverter_inverts_success() {
        let mut inverter = Inverter::new(Box::new(IsPositive));
        assert_eq!(inverter.tick(&mut ctx(10)), Status::Failure);
    }

    #[test]
    fn inverter_inverts_failure() {
        let mut inverter = Inverter::new(Box::new(IsPositive));
        assert_eq!(inverter.tick(&mut ctx(-10)), Status::Success);
    }

    #[test]
    fn always_succeed_on_failure() {
        let mut always = AlwaysSucceed::new(Box::new(FailAndIncrement));

        let mut ctx = ctx(0);
        assert_eq!(always.tick(&mut ctx), Status::Success);
        assert_eq!(ctx.value, 1); // Child still executed
    }

    #[test]
    fn always_succeed_passes_running_through() {
        let mut always = AlwaysSucceed::new(Box::new(Pending));
        assert_eq!(always.tick(&mut ctx(0)), Status::Running);
    }

    #[test]
    fn guard_blocks_child_when_predicate_false() {
        let mut guard = Guard::new(|c: &TestContext| c.value > 5, Box::new(Increment));

        let mut ctx = ctx(0);
        assert_eq!(guard.tick(&mut ctx), Status::Failure);
        assert_eq!(ctx.value, 0); // Child never ticked

        ctx.value = 6;
        assert_eq!(guard.tick(&mut ctx), Status::Success);
        assert_eq!(ctx.value, 7);
    }

    #[test]
    fn cooldown_closes_branch_after_success() {
        let mut cooldown = Cooldown::new(3, Box::new(Increment));

        let mut ctx = ctx(0);
        assert_eq!(cooldown.tick(&mut ctx), Status::Success);

        ctx.now = 2;
        assert_eq!(cooldown.tick(&mut ctx), Status::Failure);
        assert_eq!(ctx.value, 1);

        ctx.now = 3;
        assert_eq!(cooldown.tick(&mut ctx), Status::Success);
        assert_eq!(ctx.value, 2);
    }

    #[test]
    fn cooldown_ignores_child_failures() {
        let mut cooldown = Cooldown::new(10, Box::new(FailAndIncrement));

        let mut ctx = ctx(0);
        assert_eq!(cooldown.tick(&mut ctx), Status::Failure);
        ctx.now = 1;
        assert_eq!(cooldown.tick(&mut ctx), Status::Failure);
        assert_eq!(ctx.value, 2); // Still ticked: no success opened a cooldown
    }
}
