//! Field path module - Addresses a field inside a resource tree.
//!
//! Paths are built in schema casing (`Spec.Items[2].Name`) while diffing and
//! rendered to strings on [`crate::diff::FieldDiff`].

mod path;

pub use path::*;
