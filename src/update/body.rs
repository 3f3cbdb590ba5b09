//! Partial-update request bodies.

use super::casing::title_to_camel_case;
use super::mask::mask_paths;
use crate::diff::FieldDiff;
use crate::value::{LookupError, Map, Value};

/// Copies the masked fields of `desired` into a new request body.
///
/// Every path of the update mask is looked up in `desired` and written to
/// the same place in the body. Paths absent from `desired` are skipped,
/// which clears the field on the server; other lookup failures propagate.
pub fn masked_request_body(desired: &Value, diffs: &[FieldDiff]) -> Result<Map, LookupError> {
    let mut body = Map::new();
    for path in mask_paths(diffs, title_to_camel_case, usize::MAX) {
        let value = match desired.lookup(&path) {
            Ok(v) => v,
            Err(LookupError::MissingKey { .. }) => continue,
            Err(e) => return Err(e),
        };
        insert_path(&mut body, &path, value.clone());
    }
    Ok(body)
}

fn insert_path(body: &mut Map, path: &str, value: Value) {
    let mut segments: Vec<&str> = path.split('.').collect();
    let Some(leaf) = segments.pop() else {
        return;
    };

    let mut current = body;
    for segment in segments {
        let slot = current
            .fields
            .entry(segment.to_string())
            .or_insert_with(|| Value::Map(Map::new()));
        if !matches!(slot, Value::Map(_)) {
            *slot = Value::Map(Map::new());
        }
        current = match slot {
            Value::Map(m) => m,
            _ => return,
        };
    }
    current.set(leaf, value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fieldpath::FieldName;
    use crate::value::from_json;
    use pretty_assertions::assert_eq;

    fn diff_at(path: &[&str]) -> FieldDiff {
        let name = path.iter().fold(FieldName::new(), |n, s| n.add_nest(*s));
        FieldDiff::message(&name, "changed")
    }

    #[test]
    fn test_masked_request_body() {
        let desired = from_json(
            r#"{"name": "i", "http": {"path": "/", "authInfo": {"user": "u", "password": "p"}}, "spec": {"items": [1, 2]}}"#,
        )
        .unwrap();
        let diffs = vec![
            diff_at(&["Http", "AuthInfo", "Password"]),
            FieldDiff::message(&FieldName::new().add_nest("Spec").add_nest("Items").add_index(1), "x"),
        ];
        let body = masked_request_body(&desired, &diffs).unwrap();
        let expected = from_json(r#"{"http": {"authInfo": {"password": "p"}}, "spec": {"items": [1, 2]}}"#).unwrap();
        assert_eq!(Value::Map(body), expected);
    }

    #[test]
    fn test_absent_fields_are_skipped() {
        let desired = from_json(r#"{"name": "i"}"#).unwrap();
        let body = masked_request_body(&desired, &[diff_at(&["Labels"]), diff_at(&["Name"])]).unwrap();
        assert_eq!(Value::Map(body), from_json(r#"{"name": "i"}"#).unwrap());
    }

    #[test]
    fn test_lookup_through_scalar_fails() {
        let desired = from_json(r#"{"http": "plain"}"#).unwrap();
        let err = masked_request_body(&desired, &[diff_at(&["Http", "Path"])]).unwrap_err();
        assert!(matches!(err, LookupError::NotAnObject { .. }));
    }
}
