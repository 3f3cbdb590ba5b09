//! Update masks for partial-update calls.
//!
//! A diff list is turned into the comma-separated field mask a partial-update
//! API expects, and the masked fields can be copied out of the desired state
//! into a request body.

mod body;
mod casing;
mod mask;

#[cfg(test)]
mod mask_test;

pub use body::*;
pub use casing::*;
pub use mask::*;
