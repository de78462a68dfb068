//! Small behavior tree library for loops that tick once per update.
//!
//! Composites remember which child returned [`Status::Running`] and resume
//! there on the next tick. Children run left to right and the crate has no
//! dependencies.
//!
//! Composites are [`Sequence`] and [`Selector`]; decorators are [`Inverter`],
//! [`AlwaysSucceed`], [`Guard`] and [`Cooldown`]. The [`builder`] module
//! wraps each in a box.

pub mod behavior;
pub mod builder;
pub mod composite;
pub mod decorator;
pub mod status;

pub use behavior::{Behavior, Clock};
pub use composite::{Selector, Sequence};
pub use decorator::{AlwaysSucceed, Cooldown, Guard, Inverter, Predicate};
pub use status::Status;
