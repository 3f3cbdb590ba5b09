//! Lifecycle restrictions and planning errors.

use crate::diff::FieldDiff;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// LifecycleParam restricts what an apply may do to a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleParam {
    /// The resource must already exist.
    BlockCreation,
    /// The resource must not already exist.
    BlockAcquire,
    /// The resource must not be deleted, including to recreate it.
    BlockDestruction,
    /// An existing resource must not be changed.
    BlockModification,
}

/// PlanError reports an apply that the lifecycle forbids, or one that did
/// not converge.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    #[error("creation blocked: the resource does not exist")]
    CreationBlocked,

    #[error("acquire blocked: the resource already exists")]
    AcquireBlocked,

    #[error("destruction blocked: {field} can only change by recreating the resource")]
    DestructionBlocked { field: String },

    #[error("modification blocked: {field} differs")]
    ModificationBlocked { field: String },

    #[error("diffs remain after apply: {}", field_names(.diffs))]
    DiffAfterApply { diffs: Vec<FieldDiff> },
}

fn field_names(diffs: &[FieldDiff]) -> String {
    diffs
        .iter()
        .map(|d| d.field_name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
