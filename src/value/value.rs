//! Core value types and operations.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

/// Value is a resource field value decoded from the wire.
///
/// Nested objects have three states: absent ([`Value::Null`]), present with
/// some or all fields unset ([`Value::Map`]), and explicitly set to the empty
/// object ([`Value::Empty`]). The last one is never produced by decoding; it
/// is set by callers that want to clear a nested object on the server.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Map(Map),
    #[serde(skip_deserializing)]
    Empty,
}

/// Map is a JSON object keyed by wire field names.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Map {
    pub fields: std::collections::BTreeMap<String, Value>,
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&Vec<Value>> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Short name of the variant, used in shape-mismatch messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Empty => "empty object",
        }
    }

    /// Looks up a dotted wire path such as `spec.items[2].name`.
    ///
    /// A missing key is [`LookupError::MissingKey`]; a key that is missing (or
    /// null) while being indexed is [`LookupError::MissingArrayRoot`], so an
    /// absent array can be told apart from an empty one.
    pub fn lookup(&self, path: &str) -> Result<&Value, LookupError> {
        let mut current = self;
        let mut walked = String::new();

        for segment in path.split('.').filter(|s| !s.is_empty()) {
            let (name, index) = split_index(segment, path)?;
            if !walked.is_empty() {
                walked.push('.');
            }
            walked.push_str(name);

            let map = match current {
                Value::Map(m) => m,
                other => {
                    return Err(LookupError::NotAnObject {
                        path: walked,
                        actual: other.kind_name(),
                    })
                }
            };

            let child = map.get(name);
            current = match (child, index) {
                (None, None) => return Err(LookupError::MissingKey { path: walked }),
                (Some(v), None) => v,
                (None, Some(_)) | (Some(Value::Null), Some(_)) => {
                    return Err(LookupError::MissingArrayRoot { path: walked })
                }
                (Some(Value::List(items)), Some(i)) => {
                    walked.push_str(&format!("[{}]", i));
                    items.get(i).ok_or(LookupError::IndexOutOfRange {
                        path: walked.clone(),
                        len: items.len(),
                    })?
                }
                (Some(other), Some(_)) => {
                    return Err(LookupError::NotAnArray {
                        path: walked,
                        actual: other.kind_name(),
                    })
                }
            };
        }

        Ok(current)
    }
}

fn split_index<'a>(segment: &'a str, path: &str) -> Result<(&'a str, Option<usize>), LookupError> {
    let Some(open) = segment.find('[') else {
        return Ok((segment, None));
    };
    let index = segment[open + 1..]
        .strip_suffix(']')
        .and_then(|i| i.parse::<usize>().ok())
        .ok_or_else(|| LookupError::InvalidPath {
            path: path.to_string(),
        })?;
    Ok((&segment[..open], Some(index)))
}

/// LookupError describes why a dotted path could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("{path}: key not present")]
    MissingKey { path: String },

    #[error("{path}: array is absent and cannot be indexed")]
    MissingArrayRoot { path: String },

    #[error("{path}: index out of range for array of length {len}")]
    IndexOutOfRange { path: String, len: usize },

    #[error("{path}: expected an array, got {actual}")]
    NotAnArray { path: String, actual: &'static str },

    #[error("{path}: expected an object, got {actual}")]
    NotAnObject { path: String, actual: &'static str },

    #[error("malformed path {path:?}")]
    InvalidPath { path: String },
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Empty, Value::Empty) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => *a as f64 == *b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(m) => m.serialize(serializer),
            // An explicitly empty object goes on the wire as `{}`.
            Value::Empty => serializer.serialize_map(Some(0))?.end(),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<Map> for Value {
    fn from(m: Map) -> Self {
        Value::Map(m)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl Map {
    pub fn new() -> Self {
        Map {
            fields: std::collections::BTreeMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Builder-style [`Map::set`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn has(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn delete(&mut self, key: &str) -> Option<Value> {
        self.fields.remove(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.fields.keys()
    }
}

/// Parse a value from JSON.
pub fn from_json(json: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(json)
}

/// Serialize a value to JSON.
pub fn to_json(value: &Value) -> Result<String, serde_json::Error> {
    serde_json::to_string(value)
}

/// Parse a value from YAML.
pub fn from_yaml(yaml: &str) -> Result<Value, serde_yaml::Error> {
    serde_yaml::from_str(yaml)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Value {
        from_json(r#"{"spec":{"items":[{"name":"a"},{"name":"b"}],"tags":null},"name":"x"}"#)
            .unwrap()
    }

    #[test]
    fn test_json_decoding_kinds() {
        let v = from_json(r#"{"b":true,"i":3,"f":1.5,"s":"x","l":[1],"n":null}"#).unwrap();
        let m = v.as_map().unwrap();
        assert_eq!(m.get("b"), Some(&Value::Bool(true)));
        assert_eq!(m.get("i"), Some(&Value::Int(3)));
        assert_eq!(m.get("f"), Some(&Value::Float(1.5)));
        assert_eq!(m.get("s"), Some(&Value::from("x")));
        assert_eq!(m.get("l"), Some(&Value::List(vec![Value::Int(1)])));
        assert_eq!(m.get("n"), Some(&Value::Null));
    }

    #[test]
    fn test_numeric_equality_across_kinds() {
        assert_eq!(Value::Int(2), Value::Float(2.0));
        assert_ne!(Value::Int(2), Value::Float(2.5));
    }

    #[test]
    fn test_empty_marker_serializes_as_object() {
        assert_eq!(to_json(&Value::Empty).unwrap(), "{}");
        assert_ne!(Value::Empty, Value::Map(Map::new()));
        assert_ne!(Value::Empty, Value::Null);
    }

    #[test]
    fn test_yaml_decoding() {
        let v = from_yaml("name: x\nsize: 3\n").unwrap();
        assert_eq!(v.lookup("size"), Ok(&Value::Int(3)));
    }

    #[test]
    fn test_lookup_nested_and_indexed() {
        let v = sample();
        assert_eq!(v.lookup("name"), Ok(&Value::from("x")));
        assert_eq!(v.lookup("spec.items[1].name"), Ok(&Value::from("b")));
    }

    #[test]
    fn test_lookup_errors() {
        let v = sample();
        assert!(matches!(
            v.lookup("spec.missing"),
            Err(LookupError::MissingKey { .. })
        ));
        assert!(matches!(
            v.lookup("spec.tags[0]"),
            Err(LookupError::MissingArrayRoot { .. })
        ));
        assert!(matches!(
            v.lookup("spec.absent[0]"),
            Err(LookupError::MissingArrayRoot { .. })
        ));
        assert_eq!(
            v.lookup("spec.items[5]"),
            Err(LookupError::IndexOutOfRange {
                path: "spec.items[5]".to_string(),
                len: 2
            })
        );
        assert!(matches!(
            v.lookup("name[0]"),
            Err(LookupError::NotAnArray { .. })
        ));
        assert!(matches!(
            v.lookup("name.first"),
            Err(LookupError::NotAnObject { .. })
        ));
        assert!(matches!(
            v.lookup("spec.items[x]"),
            Err(LookupError::InvalidPath { .. })
        ));
    }

    #[test]
    fn test_map_builder() {
        let m = Map::new().with("a", 1i64).with("b", "two");
        assert_eq!(m.len(), 2);
        assert!(m.has("a"));
        assert_eq!(m.get("b"), Some(&Value::from("two")));
    }
}
