//! Assistant behavior tree nodes.
//!
//! - `conditions`: read the blackboard and return Success or Failure
//! - `actions`: dispatch to a component and request state changes

pub mod actions;
pub mod conditions;

pub use actions::*;
pub use conditions::*;
