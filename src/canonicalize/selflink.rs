//! Self-link equivalence.
//!
//! Remote APIs return fully qualified resource paths where users often write
//! short names or partially qualified paths. Two identifiers are compared
//! segment by segment after dropping the scheme and host; location and
//! collection keywords, API family names and version tokens may be skipped on
//! either side.

use once_cell::sync::Lazy;
use regex::Regex;

static IGNORABLE_SEGMENTS: &[&str] = &[
    "projects",
    "regions",
    "locations",
    "zones",
    "organizations",
    "global",
    // API families.
    "compute",
    "container",
    "storage",
    "cloudresourcemanager",
    "iam",
    "logging",
    "monitoring",
    "pubsub",
    "networkservices",
    "networksecurity",
];

/// API version path segments: `v1`, `v1beta1`, `v2p1alpha`, `beta`.
static VERSION_TOKEN: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^(v\d+((p\d+)?(alpha|beta)\d*)?|alpha|beta)$").ok());

fn is_ignorable(segment: &str) -> bool {
    IGNORABLE_SEGMENTS.contains(&segment)
        || (*VERSION_TOKEN).as_ref().is_some_and(|v| v.is_match(segment))
}

/// Splits an identifier into path segments, dropping any scheme and host.
fn segments(link: &str) -> Vec<&str> {
    let path = match link.split_once("://") {
        Some((_, rest)) => rest.split_once('/').map(|(_, p)| p).unwrap_or(""),
        None => link,
    };
    path.split('/').filter(|s| !s.is_empty()).collect()
}

fn is_path_suffix(short: &[&str], long: &[&str]) -> bool {
    !short.is_empty() && long.ends_with(short)
}

/// Compares two resource identifiers walking from the first segment.
///
/// Equal when either path is a suffix of the other, or when the segments
/// align after skipping ignorable segments and at most one resource-name
/// segment at the second-to-last position of the longer path.
pub fn self_link_equals(a: Option<&str>, b: Option<&str>) -> bool {
    let (a, b) = match (a, b) {
        (None, None) => return true,
        (Some(a), Some(b)) => (a, b),
        _ => return false,
    };
    if a == b {
        return true;
    }

    let l = segments(a);
    let r = segments(b);
    if is_path_suffix(&l, &r) || is_path_suffix(&r, &l) {
        return true;
    }

    let (mut i, mut j) = (0, 0);
    while i < l.len() && j < r.len() {
        let (ls, rs) = (l[i], r[j]);
        let (l_rest, r_rest) = (l.len() - i, r.len() - j);
        if ls == rs || (is_ignorable(ls) && is_ignorable(rs)) {
            i += 1;
            j += 1;
        } else if is_ignorable(ls) {
            i += 1;
        } else if is_ignorable(rs) {
            j += 1;
        } else if l_rest == 2 && r_rest == 1 {
            i += 1;
        } else if r_rest == 2 && l_rest == 1 {
            j += 1;
        } else {
            return false;
        }
    }

    l[i..].iter().chain(&r[j..]).all(|s| is_ignorable(s))
}

/// Like [`self_link_equals`], but also equal when either side is a single
/// unqualified name matching the final segment of the other.
pub fn name_to_self_link_equals(a: Option<&str>, b: Option<&str>) -> bool {
    if self_link_equals(a, b) {
        return true;
    }
    let (Some(a), Some(b)) = (a, b) else {
        return false;
    };
    let (l, r) = (segments(a), segments(b));
    match (l.as_slice(), r.as_slice()) {
        ([name], [.., last]) | ([.., last], [name]) => name == last,
        _ => false,
    }
}

/// Compares two possibly partial resource identifiers walking backward from
/// the last segment. The shorter side may run out first; the longer side may
/// carry one extra segment at its second-to-last position.
pub fn partial_self_link_equals(a: Option<&str>, b: Option<&str>) -> bool {
    let (a, b) = match (a, b) {
        (None, None) => return true,
        (Some(a), Some(b)) => (a, b),
        _ => return false,
    };
    if a == b {
        return true;
    }

    let l = segments(a);
    let r = segments(b);
    if l.is_empty() || r.is_empty() {
        return l.is_empty() && r.is_empty();
    }
    let (mut i, mut j) = (l.len(), r.len());
    while i > 0 && j > 0 {
        let (ls, rs) = (l[i - 1], r[j - 1]);
        if ls == rs || (is_ignorable(ls) && is_ignorable(rs)) {
            i -= 1;
            j -= 1;
        } else if is_ignorable(ls) {
            i -= 1;
        } else if is_ignorable(rs) {
            j -= 1;
        } else if l.len() > r.len() && i == l.len() - 1 {
            i -= 1;
        } else if r.len() > l.len() && j == r.len() - 1 {
            j -= 1;
        } else {
            return false;
        }
    }
    true
}
