//! Nested object schemas.

use super::differ::diff;
use super::error::DiffError;
use super::field_diff::FieldDiff;
use super::info::{DiffInfo, FieldKind};
use crate::fieldpath::FieldName;
use crate::update::title_to_camel_case;
use crate::value::{Map, Value};
use std::sync::Arc;

/// ObjectDiffer diffs the fields of one nested object type.
///
/// The differ does not know any nested schema; each object field carries a
/// strategy for its own type. Implementations usually call
/// [`diff`](super::diff) once per field with `path.add_nest(..)`.
pub trait ObjectDiffer: Send + Sync {
    fn diff(&self, desired: &Map, actual: &Map, path: &FieldName) -> Result<Vec<FieldDiff>, DiffError>;
}

impl<F> ObjectDiffer for F
where
    F: Fn(&Map, &Map, &FieldName) -> Result<Vec<FieldDiff>, DiffError> + Send + Sync,
{
    fn diff(&self, desired: &Map, actual: &Map, path: &FieldName) -> Result<Vec<FieldDiff>, DiffError> {
        self(desired, actual, path)
    }
}

/// ObjectField is one field of an [`ObjectSchema`].
#[derive(Debug, Clone)]
pub struct ObjectField {
    /// Name in schema casing, used in diff paths.
    pub name: String,
    /// Key in the decoded wire value.
    pub json_name: String,
    pub info: DiffInfo,
}

/// ObjectSchema is an ordered field list that diffs an object declaratively.
#[derive(Debug, Clone, Default)]
pub struct ObjectSchema {
    fields: Vec<ObjectField>,
}

impl ObjectSchema {
    pub fn new() -> Self {
        ObjectSchema { fields: Vec::new() }
    }

    /// Adds a field whose wire key is the camelCase form of `name`.
    pub fn field(self, name: impl Into<String>, info: DiffInfo) -> Self {
        let name = name.into();
        let json_name = title_to_camel_case(&name);
        self.field_with_json_name(name, json_name, info)
    }

    pub fn field_with_json_name(
        mut self,
        name: impl Into<String>,
        json_name: impl Into<String>,
        info: DiffInfo,
    ) -> Self {
        self.fields.push(ObjectField {
            name: name.into(),
            json_name: json_name.into(),
            info,
        });
        self
    }

    pub fn fields(&self) -> &[ObjectField] {
        &self.fields
    }

    /// Wraps this schema as a nested object kind with an empty prototype.
    pub fn into_kind(self) -> FieldKind {
        FieldKind::object(Arc::new(self), Map::new())
    }
}

impl ObjectDiffer for ObjectSchema {
    fn diff(&self, desired: &Map, actual: &Map, path: &FieldName) -> Result<Vec<FieldDiff>, DiffError> {
        let mut diffs = Vec::new();
        for field in &self.fields {
            let d = desired.get(&field.json_name).unwrap_or(&Value::Null);
            let a = actual.get(&field.json_name).unwrap_or(&Value::Null);
            diffs.extend(diff(d, a, &field.info, &path.add_nest(field.name.as_str()))?);
        }
        Ok(diffs)
    }
}
