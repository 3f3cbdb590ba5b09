//! Per-field diff policy.

use super::field_diff::OperationSelector;
use super::schema::ObjectDiffer;
use crate::value::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Escape hatch for fields whose equivalence is not structural. Returns true
/// when desired and actual are equivalent.
pub type CustomDiff = Arc<dyn Fn(&Value, &Value) -> bool + Send + Sync>;

/// StringMatch selects the canonicalizer used for a string field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StringMatch {
    #[default]
    Exact,
    CaseInsensitive,
    QuoteAndCaseInsensitive,
    WithoutTrailingDot,
    Semver,
    SelfLink,
    PartialSelfLink,
}

/// FieldKind is the shape of a field, fixed when the policy tree is built.
#[derive(Clone)]
pub enum FieldKind {
    String(StringMatch),
    /// A string naming another resource; compared as a self-link.
    Reference,
    Int,
    Float,
    Bool,
    /// Compared by plain equality.
    Enum,
    /// String-keyed map; the box holds the value kind.
    Map(Box<FieldKind>),
    /// Ordered collection; the box holds the element kind.
    Array(Box<FieldKind>),
    /// Unordered collection; the box holds the element kind.
    Set(Box<FieldKind>),
    Object(ObjectKind),
}

impl Default for FieldKind {
    fn default() -> Self {
        FieldKind::String(StringMatch::Exact)
    }
}

impl FieldKind {
    pub fn map_of(value: FieldKind) -> Self {
        FieldKind::Map(Box::new(value))
    }

    pub fn array_of(element: FieldKind) -> Self {
        FieldKind::Array(Box::new(element))
    }

    pub fn set_of(element: FieldKind) -> Self {
        FieldKind::Set(Box::new(element))
    }

    /// A nested object diffed by `differ`, with `empty` substituted when the
    /// actual side is absent.
    pub fn object(differ: Arc<dyn ObjectDiffer>, empty: Map) -> Self {
        FieldKind::Object(ObjectKind {
            object_function: Some(differ),
            empty_object: Some(empty),
        })
    }

    pub(crate) fn name(&self) -> &'static str {
        match self {
            FieldKind::String(_) => "string",
            FieldKind::Reference => "reference",
            FieldKind::Int => "int",
            FieldKind::Float => "float",
            FieldKind::Bool => "bool",
            FieldKind::Enum => "enum",
            FieldKind::Map(_) => "map",
            FieldKind::Array(_) => "array",
            FieldKind::Set(_) => "set",
            FieldKind::Object(_) => "object",
        }
    }
}

impl fmt::Debug for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::String(m) => write!(f, "String({:?})", m),
            FieldKind::Map(v) => write!(f, "Map({:?})", v),
            FieldKind::Array(e) => write!(f, "Array({:?})", e),
            FieldKind::Set(e) => write!(f, "Set({:?})", e),
            FieldKind::Object(o) => write!(f, "{:?}", o),
            other => f.write_str(other.name()),
        }
    }
}

/// ObjectKind carries what the differ needs to recurse into a nested object.
#[derive(Clone, Default)]
pub struct ObjectKind {
    pub object_function: Option<Arc<dyn ObjectDiffer>>,
    pub empty_object: Option<Map>,
}

impl fmt::Debug for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("object_function", &self.object_function.is_some())
            .field("empty_object", &self.empty_object)
            .finish()
    }
}

/// DiffInfo is the diff policy of one schema field.
#[derive(Clone, Default)]
pub struct DiffInfo {
    /// Never diffed.
    pub ignore: bool,
    /// Set by the server only; never diffed.
    pub output_only: bool,
    /// The server may inject structure the caller did not ask for.
    pub server_default: bool,
    /// Collapse nested diffs into one parent diff when any needs a recreate.
    pub merge_nested_diffs: bool,
    /// Map keys starting with any of these are skipped.
    pub ignored_prefixes: Vec<String>,
    pub kind: FieldKind,
    pub custom_diff: Option<CustomDiff>,
    pub operation_selector: Option<Arc<dyn OperationSelector>>,
}

impl DiffInfo {
    pub fn new(kind: FieldKind) -> Self {
        DiffInfo {
            kind,
            ..DiffInfo::default()
        }
    }

    pub fn operation(mut self, selector: Arc<dyn OperationSelector>) -> Self {
        self.operation_selector = Some(selector);
        self
    }

    pub fn ignore(mut self) -> Self {
        self.ignore = true;
        self
    }

    pub fn output_only(mut self) -> Self {
        self.output_only = true;
        self
    }

    pub fn server_default(mut self) -> Self {
        self.server_default = true;
        self
    }

    pub fn merge_nested_diffs(mut self) -> Self {
        self.merge_nested_diffs = true;
        self
    }

    pub fn ignored_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.ignored_prefixes.push(prefix.into());
        self
    }

    pub fn custom_diff<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value, &Value) -> bool + Send + Sync + 'static,
    {
        self.custom_diff = Some(Arc::new(f));
        self
    }

    pub(crate) fn is_ignored_key(&self, key: &str) -> bool {
        self.ignored_prefixes.iter().any(|p| key.starts_with(p.as_str()))
    }
}

impl fmt::Debug for DiffInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiffInfo")
            .field("ignore", &self.ignore)
            .field("output_only", &self.output_only)
            .field("server_default", &self.server_default)
            .field("merge_nested_diffs", &self.merge_nested_diffs)
            .field("ignored_prefixes", &self.ignored_prefixes)
            .field("kind", &self.kind)
            .field("custom_diff", &self.custom_diff.is_some())
            .field("operation_selector", &self.operation_selector.is_some())
            .finish()
    }
}
