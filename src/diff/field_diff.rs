//! Field differences and operation selection.

use crate::fieldpath::FieldName;
use crate::value::Value;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Operation name meaning the resource must be destroyed and rebuilt.
pub const RECREATE: &str = "Recreate";

/// FieldDiff is one difference between desired and actual state.
///
/// Length mismatches and missing map keys carry a `message` instead of a
/// desired/actual pair. Unordered collections carry `to_add`/`to_remove`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDiff {
    pub field_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desired: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub to_add: Vec<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub to_remove: Vec<Value>,
    pub resulting_operation: Vec<String>,
}

impl FieldDiff {
    /// A value difference.
    pub fn values(path: &FieldName, desired: &Value, actual: &Value) -> Self {
        FieldDiff {
            field_name: path.to_string(),
            message: None,
            desired: Some(desired.clone()),
            actual: Some(actual.clone()),
            to_add: Vec::new(),
            to_remove: Vec::new(),
            resulting_operation: Vec::new(),
        }
    }

    /// A difference described in words.
    pub fn message(path: &FieldName, message: impl Into<String>) -> Self {
        FieldDiff {
            field_name: path.to_string(),
            message: Some(message.into()),
            desired: None,
            actual: None,
            to_add: Vec::new(),
            to_remove: Vec::new(),
            resulting_operation: Vec::new(),
        }
    }

    /// An unordered-collection difference.
    pub fn set(
        path: &FieldName,
        desired: &Value,
        actual: &Value,
        to_add: Vec<Value>,
        to_remove: Vec<Value>,
    ) -> Self {
        FieldDiff {
            to_add,
            to_remove,
            ..FieldDiff::values(path, desired, actual)
        }
    }

    /// Returns true if reconciling this diff needs a delete and recreate.
    pub fn requires_recreate(&self) -> bool {
        self.resulting_operation.iter().any(|op| op == RECREATE)
    }
}

impl fmt::Display for FieldDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.field_name)?;
        if let Some(message) = &self.message {
            write!(f, "{}", message)?;
        } else if !self.to_add.is_empty() || !self.to_remove.is_empty() {
            write!(f, "add {:?}, remove {:?}", self.to_add, self.to_remove)?;
        } else {
            write!(f, "desired {:?}, actual {:?}", self.desired, self.actual)?;
        }
        if !self.resulting_operation.is_empty() {
            write!(f, " -> [{}]", self.resulting_operation.join(", "))?;
        }
        Ok(())
    }
}

/// OperationSelector maps a difference to the remote operations that
/// reconcile it. It must return at least one name.
pub trait OperationSelector: Send + Sync {
    fn select(&self, diff: &FieldDiff) -> Vec<String>;
}

impl<F> OperationSelector for F
where
    F: Fn(&FieldDiff) -> Vec<String> + Send + Sync,
{
    fn select(&self, diff: &FieldDiff) -> Vec<String> {
        self(diff)
    }
}

/// Selector for fields that cannot be changed in place.
pub fn requires_recreate() -> Arc<dyn OperationSelector> {
    Arc::new(|_: &FieldDiff| vec![RECREATE.to_string()])
}

/// Selector for fields updated by the named operation.
pub fn triggers_operation(name: impl Into<String>) -> Arc<dyn OperationSelector> {
    let name = name.into();
    Arc::new(move |_: &FieldDiff| vec![name.clone()])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selectors() {
        let d = FieldDiff::values(&FieldName::new().add_nest("Name"), &"a".into(), &"b".into());
        assert_eq!(requires_recreate().select(&d), vec![RECREATE.to_string()]);
        assert_eq!(
            triggers_operation("updateNetwork").select(&d),
            vec!["updateNetwork".to_string()]
        );
    }

    #[test]
    fn test_requires_recreate() {
        let mut d = FieldDiff::message(&FieldName::new().add_nest("Items"), "different lengths");
        assert!(!d.requires_recreate());
        d.resulting_operation = vec!["update".into(), RECREATE.into()];
        assert!(d.requires_recreate());
    }

    #[test]
    fn test_display() {
        let mut d = FieldDiff::values(&FieldName::new().add_nest("Size"), &Value::Int(2), &Value::Int(1));
        d.resulting_operation = vec!["resize".into()];
        assert_eq!(d.to_string(), "Size: desired Some(Int(2)), actual Some(Int(1)) -> [resize]");
    }
}
