//! Resource identity and whole-resource diffs.

use super::error::DiffError;
use super::field_diff::FieldDiff;
use super::schema::{ObjectDiffer, ObjectSchema};
use crate::fieldpath::FieldName;
use crate::value::{Map, Value};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// ServiceTypeVersion identifies a resource kind for logging and dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceTypeVersion {
    pub service: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub version: String,
}

impl ServiceTypeVersion {
    pub fn new(
        service: impl Into<String>,
        type_name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        ServiceTypeVersion {
            service: service.into(),
            type_name: type_name.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for ServiceTypeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.service, self.version, self.type_name)
    }
}

/// Diffs a whole resource against its top-level schema.
///
/// `actual` may be null when the resource does not exist yet; it is then
/// compared as an empty object.
pub fn diff_resource(
    resource: &ServiceTypeVersion,
    desired: &Value,
    actual: &Value,
    schema: &ObjectSchema,
) -> Result<Vec<FieldDiff>, DiffError> {
    let root = FieldName::new();
    let desired = desired
        .as_map()
        .ok_or_else(|| DiffError::shape_mismatch(&root, "object", desired.kind_name()))?;
    let empty = Map::new();
    let actual = match actual {
        Value::Null => &empty,
        Value::Map(m) => m,
        other => return Err(DiffError::shape_mismatch(&root, "object", other.kind_name())),
    };

    let diffs = schema.diff(desired, actual, &root)?;
    debug!(resource = %resource, diffs = diffs.len(), "computed resource diff");
    Ok(diffs)
}
