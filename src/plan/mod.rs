//! Choosing what to do with a diffed resource.
//!
//! Diffs are grouped by the operation that reconciles them and checked
//! against the caller's lifecycle restrictions before anything is applied.

mod lifecycle;
mod planner;

pub use lifecycle::*;
pub use planner::*;
