//! Diff module - Desired-versus-actual comparison of resource trees.
//!
//! A caller describes each field with a [`DiffInfo`] and walks both trees
//! through [`diff`]. Leaves are compared with the predicates in
//! [`crate::canonicalize`]; nested objects recurse through their
//! [`ObjectDiffer`]; each difference is tagged with the operations chosen by
//! the field's [`OperationSelector`].

mod differ;
mod error;
mod field_diff;
mod info;
mod resource;
mod schema;


pub use differ::diff;
pub use error::*;
pub use field_diff::*;
pub use info::*;
pub use resource::*;
pub use schema::*;
