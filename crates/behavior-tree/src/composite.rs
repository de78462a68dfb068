//! Composite behavior nodes.
//!
//! Composite nodes control the execution flow of multiple child behaviors.
//! This module provides the fundamental building blocks for creating complex
//! decision trees: [`Sequence`] (AND logic) and [`Selector`] (OR logic).
//!
//! Both composites remember which child returned `Running` and resume there
//! on the next tick. Any settled outcome rewinds them to the first child.

use crate::{Behavior, Status};

/// Executes child behaviors in sequence until one fails.
///
/// # Semantics
///
/// A `Sequence` node evaluates its children from left to right:
/// - If a child returns `Failure`, the sequence **stops immediately**, rewinds
///   its cursor and returns `Failure`
/// - If a child returns `Running`, the sequence returns `Running` and the
///   next tick resumes at that same child
/// - If a child returns `Success`, the sequence **continues** to the next child
/// - If all children return `Success`, the sequence rewinds and returns `Success`
///
/// This is analogous to a short-circuited logical AND (&&) operation.
pub struct Sequence<C> {
    children: Vec<Box<dyn Behavior<C>>>,
    cursor: usize,
}

impl<C> Sequence<C> {
    /// Creates a new sequence with the given child behaviors.
    ///
    /// # Panics
    ///
    /// Panics if `children` is empty. A sequence with no children is
    /// meaningless and likely indicates a programming error.
    pub fn new(children: Vec<Box<dyn Behavior<C>>>) -> Self {
        assert!(
            !children.is_empty(),
            "Sequence must have at least one child"
        );
        Self {
            children,
            cursor: 0,
        }
    }

    /// Index of the child the next tick starts at.
    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

impl<C> Behavior<C> for Sequence<C> {
    fn tick(&mut self, ctx: &mut C) -> Status {
        while self.cursor < self.children.len() {
            match self.children[self.cursor].tick(ctx) {
                Status::Success => self.cursor += 1,
                Status::Running => return Status::Running,
                Status::Failure => {
                    self.reset();
                    return Status::Failure;
                }
            }
        }
        self.cursor = 0;
        Status::Success
    }

    fn reset(&mut self) {
        self.cursor = 0;
        for child in &mut self.children {
            child.reset();
        }
    }
}

/// Executes child behaviors in sequence until one succeeds.
///
/// # Semantics
///
/// A `Selector` node evaluates its children from left to right:
/// - If a child returns `Success`, the selector **stops immediately**, rewinds
///   and returns `Success`
/// - If a child returns `Running`, the selector returns `Running` and the next
///   tick resumes at that same child
/// - If a child returns `Failure`, the selector **continues** to the next child
/// - If all children return `Failure`, the selector rewinds and returns `Failure`
///
/// This is analogous to a short-circuited logical OR (||) operation.
pub struct Selector<C> {
    children: Vec<Box<dyn Behavior<C>>>,
    cursor: usize,
}

impl<C> Selector<C> {
    /// Creates a new selector with the given child behaviors.
    ///
    /// # Panics
    ///
    /// Panics if `children` is empty. A selector with no children is
    /// meaningless and likely indicates a programming error.
    pub fn new(children: Vec<Box<dyn Behavior<C>>>) -> Self {
        assert!(
            !children.is_empty(),
            "Selector must have at least one child"
        );
        Self {
            children,
            cursor: 0,
        }
    }

    /// Index of the child the next tick starts at.
    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

impl<C> Behavior<C> for Selector<C> {
    fn tick(&mut self, ctx: &mut C) -> Status {
        while self.cursor < self.children.len() {
            match self.children[self.cursor].tick(ctx) {
                Status::Failure => self.cursor += 1,
                Status::Running => return Status::Running,
                Status::Success => {
                    self.reset();
                    return Status::Success;
                }
            }
        }
        self.reset();
        Status::Failure
    }

    fn reset(&mut self) {
        self.cursor = 0;
        for child in &mut self.children {
            child.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct TestContext {
        value: i32,
        trace: Vec<&'static str>,
        starts: u32,
    }

    struct Increment;
    impl Behavior<TestContext> for Increment {
        fn tick(&mut self, ctx: &mut TestContext) -> Status {
            ctx.value += 1;
            ctx.trace.push("inc");
            Status::Success
        }
    }

    struct Decrement;
    impl Behavior<TestContext> for Decrement {
        fn tick(&mut self, ctx: &mut TestContext) -> Status {
            ctx.value -= 1;
            ctx.trace.push("dec");
            Status::Success
        }
    }

    struct FailAlways;
    impl Behavior<TestContext> for FailAlways {
        fn tick(&mut self, ctx: &mut TestContext) -> Status {
            ctx.trace.push("fail");
            Status::Failure
        }
    }

    /// Returns Running `ticks` times, then Success. Counts fresh starts.
    struct Countdown {
        ticks: u32,
        left: Option<u32>,
    }

    impl Countdown {
        fn new(ticks: u32) -> Self {
            Self { ticks, left: None }
        }
    }

    impl Behavior<TestContext> for Countdown {
        fn tick(&mut self, ctx: &mut TestContext) -> Status {
            let left = match self.left {
                Some(left) => left,
                None => {
                    ctx.starts += 1;
                    self.ticks
                }
            };
            ctx.trace.push("countdown");
            if left == 0 {
                self.left = None;
                Status::Success
            } else {
                self.left = Some(left - 1);
                Status::Running
            }
        }

        fn reset(&mut self) {
            self.left = None;
        }
    }

    #[test]
    fn sequence_all_success() {
        let mut seq = Sequence::new(vec![Box::new(Increment), Box::new(Increment)]);

        let mut ctx = TestContext::default();
        assert_eq!(seq.tick(&mut ctx), Status::Success);
        assert_eq!(ctx.value, 2);
        assert_eq!(seq.cursor(), 0);
    }

    #[test]
    fn sequence_fails_on_first_failure() {
        let mut seq = Sequence::new(vec![
            Box::new(Increment),
            Box::new(FailAlways),
            Box::new(Increment), // Should not execute
        ]);

        let mut ctx = TestContext::default();
        assert_eq!(seq.tick(&mut ctx), Status::Failure);
        assert_eq!(ctx.value, 1); // Only first increment executed
        assert_eq!(ctx.trace, vec!["inc", "fail"]);
        assert_eq!(seq.cursor(), 0);
    }

    #[test]
    fn sequence_resumes_running_child() {
        let mut seq = Sequence::new(vec![
            Box::new(Increment),
            Box::new(Countdown::new(2)),
            Box::new(Decrement),
        ]);

        let mut ctx = TestContext::default();
        assert_eq!(seq.tick(&mut ctx), Status::Running);
        assert_eq!(seq.cursor(), 1);
        assert_eq!(seq.tick(&mut ctx), Status::Running);
        assert_eq!(seq.tick(&mut ctx), Status::Success);

        // The leading Increment ran once: later ticks resumed at the countdown.
        assert_eq!(ctx.value, 0);
        assert_eq!(ctx.starts, 1);
        assert_eq!(
            ctx.trace,
            vec!["inc", "countdown", "countdown", "countdown", "dec"]
        );
    }

    #[test]
    fn sequence_reset_restarts_running_child() {
        let mut seq = Sequence::new(vec![Box::new(Countdown::new(3))]);

        let mut ctx = TestContext::default();
        assert_eq!(seq.tick(&mut ctx), Status::Running);
        seq.reset();
        assert_eq!(seq.tick(&mut ctx), Status::Running);
        assert_eq!(ctx.starts, 2);
    }

    #[test]
    fn selector_succeeds_on_first_success() {
        let mut sel = Selector::new(vec![
            Box::new(FailAlways),
            Box::new(Increment),
            Box::new(Decrement), // Should not execute
        ]);

        let mut ctx = TestContext::default();
        assert_eq!(sel.tick(&mut ctx), Status::Success);
        assert_eq!(ctx.value, 1); // Only Increment executed
        assert_eq!(ctx.trace, vec!["fail", "inc"]);
    }

    #[test]
    fn selector_fails_when_all_fail() {
        let mut sel = Selector::new(vec![Box::new(FailAlways), Box::new(FailAlways)]);

        let mut ctx = TestContext::default();
        assert_eq!(sel.tick(&mut ctx), Status::Failure);
        assert_eq!(sel.cursor(), 0);
    }

    #[test]
    fn selector_resumes_running_child_without_retrying_earlier_ones() {
        let mut sel = Selector::new(vec![
            Box::new(FailAlways),
            Box::new(Countdown::new(1)),
            Box::new(Increment),
        ]);

        let mut ctx = TestContext::default();
        assert_eq!(sel.tick(&mut ctx), Status::Running);
        assert_eq!(sel.tick(&mut ctx), Status::Success);

        assert_eq!(ctx.trace, vec!["fail", "countdown", "countdown"]);
        assert_eq!(ctx.starts, 1);
        assert_eq!(ctx.value, 0);
    }

    #[test]
    #[should_panic(expected = "Selector must have at least one child")]
    fn empty_selector_panics() {
        let _ = Selector::<TestContext>::new(Vec::new());
    }
}
