//! # Declarative Reconcile
//!
//! Desired-versus-actual reconciliation for declaratively described REST
//! resources.
//!
//! A desired and an actual resource, both decoded into [`Value`] trees, are
//! compared field by field under a per-field diff policy. Values that the
//! server returns in a canonical form (self-links, case, quoting, versions)
//! are compared for equivalence rather than byte equality. Every difference
//! names the remote operation that reconciles it, and the diff list is turned
//! into an update mask for partial updates. Long-running remote calls are
//! driven by a cancellable retry loop with exponential backoff.
//!
//! ## Modules
//!
//! - [`value`] - Decoded resource values and dotted-path lookup
//! - [`fieldpath`] - Field paths as they appear in diffs
//! - [`canonicalize`] - Equivalence predicates for server-canonicalized values
//! - [`diff`] - Field diff policies and the recursive differ
//! - [`update`] - Update masks and partial-update request bodies
//! - [`retry`] - Backoff policies, retryability and the retry loop
//! - [`plan`] - Lifecycle-checked apply planning
//! - [`config`] - Loadable reconciler configuration

pub mod canonicalize;
pub mod config;
pub mod diff;
pub mod fieldpath;
pub mod plan;
pub mod retry;
pub mod update;
pub mod value;

pub use config::{ConfigError, ReconcilerConfig};
pub use diff::{
    diff, diff_resource, DiffError, DiffInfo, FieldDiff, FieldKind, ObjectSchema,
    ServiceTypeVersion, StringMatch,
};
pub use fieldpath::FieldName;
pub use plan::{check_converged, plan, LifecycleParam, Plan, PlanError};
pub use retry::{run, OperationError, RetryContext, RetryError, RetryabilityTable};
pub use update::{masked_request_body, update_mask};
pub use value::{Map, Value};
