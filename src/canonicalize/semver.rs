//! Version string equivalence.

/// Version values that stand for "whatever the server's default is".
const DEFAULT_VERSION_SENTINELS: &[&str] = &["latest", "-"];

/// Reports whether two version strings denote the same version.
///
/// Either side being a default sentinel matches anything. A pre-release
/// qualifier (after the first `-`) must match when both sides carry one.
/// Dot-separated components are compared only as far as the less precise
/// side goes, so `1.16` matches `1.16.4`.
pub fn matching_semver(a: Option<&str>, b: Option<&str>) -> bool {
    let (a, b) = match (a, b) {
        (None, None) => return true,
        (Some(a), Some(b)) => (a, b),
        _ => return false,
    };
    if DEFAULT_VERSION_SENTINELS.contains(&a) || DEFAULT_VERSION_SENTINELS.contains(&b) {
        return true;
    }

    let (a_version, a_qualifier) = split_qualifier(a);
    let (b_version, b_qualifier) = split_qualifier(b);
    if let (Some(aq), Some(bq)) = (a_qualifier, b_qualifier) {
        if aq != bq {
            return false;
        }
    }

    a_version
        .split('.')
        .zip(b_version.split('.'))
        .all(|(l, r)| component_equals(l, r))
}

fn split_qualifier(version: &str) -> (&str, Option<&str>) {
    match version.split_once('-') {
        Some((v, q)) => (v, Some(q)),
        None => (version, None),
    }
}

fn component_equals(l: &str, r: &str) -> bool {
    match (l.parse::<u64>(), r.parse::<u64>()) {
        (Ok(l), Ok(r)) => l == r,
        _ => l == r,
    }
}
