//! Apply planning.

use super::lifecycle::{LifecycleParam, PlanError};
use crate::diff::FieldDiff;
use crate::update::update_mask;
use std::fmt;
use tracing::info;

/// OperationPlan is one remote operation and the diffs it reconciles.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationPlan {
    pub operation: String,
    pub diffs: Vec<FieldDiff>,
}

impl OperationPlan {
    /// Field mask for this operation's partial update.
    pub fn update_mask(&self) -> String {
        update_mask(&self.diffs)
    }
}

/// Plan is what an apply has to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Plan {
    /// The resource does not exist.
    Create,
    /// Nothing differs.
    Noop,
    /// At least one diff needs the resource deleted and rebuilt.
    Recreate { diffs: Vec<FieldDiff> },
    /// Operations in order of first appearance in the diff list. A diff
    /// with several resulting operations is listed under each.
    Update { operations: Vec<OperationPlan> },
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Plan::Create => f.write_str("create"),
            Plan::Noop => f.write_str("noop"),
            Plan::Recreate { .. } => f.write_str("recreate"),
            Plan::Update { operations } => {
                let names: Vec<&str> = operations.iter().map(|o| o.operation.as_str()).collect();
                write!(f, "update [{}]", names.join(", "))
            }
        }
    }
}

/// Plans an apply from the diffs between desired and actual state.
pub fn plan(exists: bool, diffs: &[FieldDiff], lifecycle: &[LifecycleParam]) -> Result<Plan, PlanError> {
    let blocked = |p: LifecycleParam| lifecycle.contains(&p);

    let plan = if !exists {
        if blocked(LifecycleParam::BlockCreation) {
            return Err(PlanError::CreationBlocked);
        }
        Plan::Create
    } else if blocked(LifecycleParam::BlockAcquire) {
        return Err(PlanError::AcquireBlocked);
    } else if diffs.is_empty() {
        Plan::Noop
    } else if let Some(d) = diffs.iter().find(|d| d.requires_recreate()) {
        if blocked(LifecycleParam::BlockDestruction) {
            return Err(PlanError::DestructionBlocked {
                field: d.field_name.clone(),
            });
        }
        Plan::Recreate {
            diffs: diffs.to_vec(),
        }
    } else if blocked(LifecycleParam::BlockModification) {
        return Err(PlanError::ModificationBlocked {
            field: diffs[0].field_name.clone(),
        });
    } else {
        Plan::Update {
            operations: group_by_operation(diffs),
        }
    };

    info!(plan = %plan, diffs = diffs.len(), "planned apply");
    Ok(plan)
}

fn group_by_operation(diffs: &[FieldDiff]) -> Vec<OperationPlan> {
    let mut operations: Vec<OperationPlan> = Vec::new();
    for d in diffs {
        for op in &d.resulting_operation {
            match operations.iter_mut().find(|o| &o.operation == op) {
                Some(existing) => existing.diffs.push(d.clone()),
                None => operations.push(OperationPlan {
                    operation: op.clone(),
                    diffs: vec![d.clone()],
                }),
            }
        }
    }
    operations
}

/// Fails when diffs remain after an apply.
pub fn check_converged(diffs: &[FieldDiff]) -> Result<(), PlanError> {
    if diffs.is_empty() {
        return Ok(());
    }
    Err(PlanError::DiffAfterApply {
        diffs: diffs.to_vec(),
    })
}
