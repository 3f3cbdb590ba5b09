//! Field-mask construction.

use super::casing::{title_to_camel_case, title_to_snake_case};
use crate::diff::FieldDiff;
use std::collections::BTreeSet;

/// Segment that addresses every element of a collection.
const WILDCARD: &str = "*";

/// Builds the dotted camelCase mask for `diffs`.
///
/// Paths stop at the first indexed or keyed segment (`Items[2]`,
/// `Labels["env"]`): repeated and map fields are replaced as a whole, and
/// map keys are data, not schema names to re-case. A trailing `*` is
/// dropped. The result is
/// deduplicated and sorted.
pub fn update_mask(diffs: &[FieldDiff]) -> String {
    join(mask_paths(diffs, title_to_camel_case, usize::MAX))
}

/// Like [`update_mask`], keeping only the first segment of every path.
pub fn top_level_update_mask(diffs: &[FieldDiff]) -> String {
    join(mask_paths(diffs, title_to_camel_case, 1))
}

/// Like [`update_mask`], with snake_case segments.
pub fn snake_case_update_mask(diffs: &[FieldDiff]) -> String {
    join(mask_paths(diffs, title_to_snake_case, usize::MAX))
}

/// Like [`update_mask`], with `prefix` prepended to every path. Used when
/// the changed fields live under a wrapper message in the request.
pub fn update_mask_with_prefix(diffs: &[FieldDiff], prefix: &str) -> String {
    let paths = mask_paths(diffs, title_to_camel_case, usize::MAX);
    if prefix.is_empty() {
        return join(paths);
    }
    let prefix = prefix.trim_end_matches('.');
    join(paths.into_iter().map(|p| format!("{}.{}", prefix, p)).collect())
}

/// Returns the sorted, deduplicated wire paths of `diffs` with at most
/// `depth` segments each.
pub(crate) fn mask_paths(
    diffs: &[FieldDiff],
    convert: fn(&str) -> String,
    depth: usize,
) -> BTreeSet<String> {
    diffs
        .iter()
        .filter_map(|d| mask_path(&d.field_name, convert, depth))
        .collect()
}

fn mask_path(field_name: &str, convert: fn(&str) -> String, depth: usize) -> Option<String> {
    let segments: Vec<&str> = field_name.split('.').collect();
    let mut out: Vec<String> = Vec::new();
    for (i, segment) in segments.iter().enumerate() {
        if out.len() == depth {
            break;
        }
        if *segment == WILDCARD && i == segments.len() - 1 {
            break;
        }
        if let Some(open) = segment.find('[') {
            let name = &segment[..open];
            if !name.is_empty() {
                out.push(convert(name));
            }
            break;
        }
        if !segment.is_empty() {
            out.push(convert(segment));
        }
    }
    if out.is_empty() {
        None
    } else {
        Some(out.join("."))
    }
}

fn join(paths: BTreeSet<String>) -> String {
    paths.into_iter().collect::<Vec<_>>().join(",")
}
