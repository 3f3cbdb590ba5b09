//! Value module - In-memory representation of decoded resource state.
//!
//! Desired and actual resource trees arrive here already decoded from the
//! wire; nothing in the diff engine parses JSON itself.

mod value;

pub use value::*;
