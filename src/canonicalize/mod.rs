//! Canonicalize module - Equivalence predicates for primitive field values.
//!
//! Every predicate takes both sides as `Option`s: two absent values are
//! equal and an absent value never equals a present one, except where a
//! type treats its default as absent (see [`bool_canonicalize`]).

mod selflink;
mod semver;
mod strings;

pub use selflink::*;
pub use semver::*;
pub use strings::*;
