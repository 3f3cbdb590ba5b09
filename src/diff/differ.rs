//! Recursive desired-versus-actual comparison.

use super::error::DiffError;
use super::field_diff::{FieldDiff, RECREATE};
use super::info::{DiffInfo, FieldKind, ObjectKind, StringMatch};
use crate::canonicalize::{
    bool_canonicalize, case_insensitive_equals, matching_semver, name_to_self_link_equals,
    partial_self_link_equals, quote_and_case_insensitive_equals, self_link_equals, string_equals,
    without_trailing_dot_equals,
};
use crate::fieldpath::FieldName;
use crate::value::{Map, Value};
use std::borrow::Cow;
use std::collections::BTreeSet;
use tracing::trace;

/// Diffs one field.
///
/// Returns no diffs when the field is ignored, output only, or when the
/// desired value is empty: an empty desired value expresses no opinion.
/// Every returned diff carries at least one resulting operation; operations
/// chosen by nested fields are kept over this field's selector.
pub fn diff(
    desired: &Value,
    actual: &Value,
    info: &DiffInfo,
    path: &FieldName,
) -> Result<Vec<FieldDiff>, DiffError> {
    if info.ignore || info.output_only {
        return Ok(Vec::new());
    }
    let selector = info
        .operation_selector
        .as_deref()
        .ok_or_else(|| DiffError::configuration(path, "an operation selector is required"))?;
    if is_zero(desired, &info.kind) {
        return Ok(Vec::new());
    }

    let mut diffs = match &info.custom_diff {
        Some(equivalent) if equivalent(desired, actual) => Vec::new(),
        Some(_) => vec![FieldDiff::values(path, desired, actual)],
        None => compare(desired, actual, &info.kind, info, path)?,
    };

    if info.merge_nested_diffs && diffs.iter().any(FieldDiff::requires_recreate) {
        let mut merged = FieldDiff::values(path, desired, actual);
        merged.resulting_operation = vec![RECREATE.to_string()];
        diffs = vec![merged];
    }

    for d in &mut diffs {
        if d.resulting_operation.is_empty() {
            let operations = selector.select(d);
            if operations.is_empty() {
                return Err(DiffError::configuration(
                    path,
                    "operation selector returned no operations",
                ));
            }
            d.resulting_operation = operations;
        }
        trace!(field = %d.field_name, operations = ?d.resulting_operation, "field differs");
    }
    Ok(diffs)
}

/// Kind dispatch. Produces diffs without operations of their own.
fn compare(
    desired: &Value,
    actual: &Value,
    kind: &FieldKind,
    info: &DiffInfo,
    path: &FieldName,
) -> Result<Vec<FieldDiff>, DiffError> {
    if is_zero(desired, kind) {
        return Ok(Vec::new());
    }

    let differs = match kind {
        FieldKind::String(matcher) => {
            let d = required(desired, kind, path, Value::as_str)?;
            let a = optional(actual, kind, path, Value::as_str)?;
            !string_matches(*matcher, d, a)
        }
        FieldKind::Reference => {
            let d = required(desired, kind, path, Value::as_str)?;
            let a = optional(actual, kind, path, Value::as_str)?;
            !name_to_self_link_equals(Some(d), a)
        }
        FieldKind::Int => {
            let d = required(desired, kind, path, Value::as_int)?;
            Some(d) != optional(actual, kind, path, Value::as_int)?
        }
        FieldKind::Float => {
            let d = required(desired, kind, path, Value::as_float)?;
            Some(d) != optional(actual, kind, path, Value::as_float)?
        }
        FieldKind::Bool => {
            let d = required(desired, kind, path, Value::as_bool)?;
            !bool_canonicalize(Some(d), optional(actual, kind, path, Value::as_bool)?)
        }
        FieldKind::Enum => desired != actual,
        FieldKind::Array(element) => return compare_array(desired, actual, kind, element, info, path),
        FieldKind::Set(element) => return compare_set(desired, actual, kind, element, info, path),
        FieldKind::Map(value) => return compare_map(desired, actual, kind, value, info, path),
        FieldKind::Object(object) => return compare_object(desired, actual, object, info, path),
    };

    Ok(if differs {
        vec![FieldDiff::values(path, desired, actual)]
    } else {
        Vec::new()
    })
}

fn string_matches(matcher: StringMatch, desired: &str, actual: Option<&str>) -> bool {
    let desired = Some(desired);
    match matcher {
        StringMatch::Exact => string_equals(desired, actual),
        StringMatch::CaseInsensitive => case_insensitive_equals(desired, actual),
        StringMatch::QuoteAndCaseInsensitive => quote_and_case_insensitive_equals(desired, actual),
        StringMatch::WithoutTrailingDot => without_trailing_dot_equals(desired, actual),
        StringMatch::Semver => matching_semver(desired, actual),
        StringMatch::SelfLink => self_link_equals(desired, actual),
        StringMatch::PartialSelfLink => partial_self_link_equals(desired, actual),
    }
}

/// Ordered collections: an absent actual side is not evidence of a
/// difference; a length mismatch is reported once without element detail.
fn compare_array(
    desired: &Value,
    actual: &Value,
    kind: &FieldKind,
    element: &FieldKind,
    info: &DiffInfo,
    path: &FieldName,
) -> Result<Vec<FieldDiff>, DiffError> {
    let d = required(desired, kind, path, Value::as_list)?;
    let Some(a) = optional(actual, kind, path, Value::as_list)? else {
        return Ok(Vec::new());
    };
    if d.len() != a.len() {
        return Ok(vec![FieldDiff::message(
            path,
            format!("different lengths: desired {}, actual {}", d.len(), a.len()),
        )]);
    }

    let mut diffs = Vec::new();
    for (i, (dv, av)) in d.iter().zip(a).enumerate() {
        diffs.extend(compare(dv, av, element, info, &path.add_index(i))?);
    }
    Ok(diffs)
}

/// Unordered collections. Membership is decided by pairwise diffing, not by
/// hashing: elements may be objects or self-links with no canonical key.
fn compare_set(
    desired: &Value,
    actual: &Value,
    kind: &FieldKind,
    element: &FieldKind,
    info: &DiffInfo,
    path: &FieldName,
) -> Result<Vec<FieldDiff>, DiffError> {
    let d = required(desired, kind, path, Value::as_list)?;
    let (to_add, to_remove) = match optional(actual, kind, path, Value::as_list)? {
        None => (d.clone(), Vec::new()),
        Some(a) => {
            let mut to_remove = Vec::new();
            for av in a {
                if !any_equivalent(d.iter().map(|dv| (dv, av)), element, info, path)? {
                    to_remove.push(av.clone());
                }
            }
            let mut to_add = Vec::new();
            for dv in d {
                if !any_equivalent(a.iter().map(|av| (dv, av)), element, info, path)? {
                    to_add.push(dv.clone());
                }
            }
            (to_add, to_remove)
        }
    };

    if to_add.is_empty() && to_remove.is_empty() {
        return Ok(Vec::new());
    }
    Ok(vec![FieldDiff::set(path, desired, actual, to_add, to_remove)])
}

fn any_equivalent<'a>(
    pairs: impl Iterator<Item = (&'a Value, &'a Value)>,
    element: &FieldKind,
    info: &DiffInfo,
    path: &FieldName,
) -> Result<bool, DiffError> {
    for (dv, av) in pairs {
        if compare(dv, av, element, info, path)?.is_empty() {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Maps: keys missing from either side are reported by message; shared keys
/// recurse with the value kind.
fn compare_map(
    desired: &Value,
    actual: &Value,
    kind: &FieldKind,
    value: &FieldKind,
    info: &DiffInfo,
    path: &FieldName,
) -> Result<Vec<FieldDiff>, DiffError> {
    let d = required(desired, kind, path, Value::as_map)?;
    let empty = Map::new();
    let a = optional(actual, kind, path, Value::as_map)?.unwrap_or(&empty);

    let keys: BTreeSet<&String> = d.keys().chain(a.keys()).collect();
    let mut diffs = Vec::new();
    for key in keys {
        if info.is_ignored_key(key) {
            continue;
        }
        let child = path.add_key(key.as_str());
        match (d.get(key), a.get(key)) {
            (Some(dv), Some(av)) if !av.is_null() => {
                diffs.extend(compare(dv, av, value, info, &child)?);
            }
            (Some(dv), _) if !is_zero(dv, value) => {
                diffs.push(FieldDiff::message(
                    &child,
                    format!("key {:?} is missing from actual", key),
                ));
            }
            (None, Some(av)) if !av.is_null() => {
                diffs.push(FieldDiff::message(
                    &child,
                    format!("key {:?} is not in desired", key),
                ));
            }
            _ => {}
        }
    }
    Ok(diffs)
}

/// Nested objects. Absent actual state is compared as the configured empty
/// object; an explicitly empty desired object differs from any non-empty
/// actual object unless the server fills in defaults.
fn compare_object(
    desired: &Value,
    actual: &Value,
    object: &ObjectKind,
    info: &DiffInfo,
    path: &FieldName,
) -> Result<Vec<FieldDiff>, DiffError> {
    let differ = object
        .object_function
        .as_deref()
        .ok_or_else(|| DiffError::configuration(path, "an object function is required"))?;
    let empty_object = object
        .empty_object
        .as_ref()
        .ok_or_else(|| DiffError::configuration(path, "an empty object is required"))?;

    let actual_map: Cow<'_, Map> = match actual {
        Value::Null => Cow::Borrowed(empty_object),
        Value::Empty => Cow::Owned(Map::new()),
        Value::Map(m) => Cow::Borrowed(m),
        other => return Err(DiffError::shape_mismatch(path, "object", other.kind_name())),
    };

    match desired {
        Value::Empty => {
            if info.server_default || actual_map.iter().all(|(_, v)| is_empty_value(v)) {
                Ok(Vec::new())
            } else {
                Ok(vec![FieldDiff::values(path, desired, actual)])
            }
        }
        Value::Map(d) => differ.diff(d, &actual_map, path),
        other => Err(DiffError::shape_mismatch(path, "object", other.kind_name())),
    }
}

fn required<'a, T>(
    value: &'a Value,
    kind: &FieldKind,
    path: &FieldName,
    get: impl Fn(&'a Value) -> Option<T>,
) -> Result<T, DiffError> {
    get(value).ok_or_else(|| DiffError::shape_mismatch(path, kind.name(), value.kind_name()))
}

fn optional<'a, T>(
    value: &'a Value,
    kind: &FieldKind,
    path: &FieldName,
    get: impl Fn(&'a Value) -> Option<T>,
) -> Result<Option<T>, DiffError> {
    if value.is_null() {
        return Ok(None);
    }
    required(value, kind, path, get).map(Some)
}

/// Reports whether `value` is the empty value for `kind`.
///
/// A present object is never empty: only absence (null) is. The explicit
/// empty marker is a value in its own right.
pub(crate) fn is_zero(value: &Value, kind: &FieldKind) -> bool {
    match (value, kind) {
        (Value::Null, _) => true,
        (Value::Empty, _) => false,
        (Value::Map(_), FieldKind::Object(_)) => false,
        (Value::Map(m), _) => m.is_empty(),
        (other, _) => is_empty_value(other),
    }
}

/// Recursive emptiness: every leaf unset or zero.
fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null | Value::Empty => true,
        Value::Bool(b) => !b,
        Value::Int(i) => *i == 0,
        Value::Float(f) => *f == 0.0,
        Value::String(s) => s.is_empty(),
        Value::List(l) => l.is_empty(),
        Value::Map(m) => m.iter().all(|(_, v)| is_empty_value(v)),
    }
}
