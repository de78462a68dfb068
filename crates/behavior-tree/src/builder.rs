//! Free functions for assembling trees without `Box::new` noise.
//!
//! ```rust,ignore
//! use behavior_tree::builder::{guard, selector, sequence};
//!
//! let tree = selector(vec![
//!     guard(|ctx: &Ctx| ctx.busy, sequence(vec![Box::new(Work), Box::new(Report)])),
//!     Box::new(Rest),
//! ]);
//! ```

use crate::{AlwaysSucceed, Behavior, Clock, Cooldown, Guard, Inverter, Selector, Sequence};

/// Boxed [`Sequence`] over `children`.
#[inline]
pub fn sequence<C: 'static>(children: Vec<Box<dyn Behavior<C>>>) -> Box<dyn Behavior<C>> {
    Box::new(Sequence::new(children))
}

/// Boxed [`Selector`] over `children`.
#[inline]
pub fn selector<C: 'static>(children: Vec<Box<dyn Behavior<C>>>) -> Box<dyn Behavior<C>> {
    Box::new(Selector::new(children))
}

#[inline]
pub fn inverter<C: 'static>(child: Box<dyn Behavior<C>>) -> Box<dyn Behavior<C>> {
    Box::new(Inverter::new(child))
}

/// Boxed [`AlwaysSucceed`]; use for optional steps inside a sequence.
#[inline]
pub fn always_succeed<C: 'static>(child: Box<dyn Behavior<C>>) -> Box<dyn Behavior<C>> {
    Box::new(AlwaysSucceed::new(child))
}

/// Boxed [`Guard`] that only ticks `child` while `predicate` holds.
#[inline]
pub fn guard<C: 'static>(
    predicate: impl Fn(&C) -> bool + Send + Sync + 'static,
    child: Box<dyn Behavior<C>>,
) -> Box<dyn Behavior<C>> {
    Box::new(Guard::new(predicate, child))
}

/// Boxed [`Cooldown`] closing `child` for `period` clock units after each
/// success.
#[inline]
pub fn cooldown<C: Clock + 'static>(
    period: u64,
    child: Box<dyn Behavior<C>>,
) -> Box<dyn Behavior<C>> {
    Box::new(Cooldown::new(period, child))
}
