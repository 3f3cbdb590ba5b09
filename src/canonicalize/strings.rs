//! String, boolean and string-collection predicates.

use super::selflink::name_to_self_link_equals;

/// Exact string equality.
pub fn string_equals(a: Option<&str>, b: Option<&str>) -> bool {
    a == b
}

/// Equality ignoring case.
pub fn case_insensitive_equals(a: Option<&str>, b: Option<&str>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.to_lowercase() == b.to_lowercase(),
        _ => false,
    }
}

/// Equality ignoring case, after unquoting either side if it is a quoted
/// string literal (`"x"`, `'x'` or `` `x` ``).
pub fn quote_and_case_insensitive_equals(a: Option<&str>, b: Option<&str>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => unquote(a).to_lowercase() == unquote(b).to_lowercase(),
        _ => false,
    }
}

/// Equality after removing one trailing `.` from each side, so an absolute
/// domain name matches its relative form.
pub fn without_trailing_dot_equals(a: Option<&str>, b: Option<&str>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.strip_suffix('.').unwrap_or(a) == b.strip_suffix('.').unwrap_or(b),
        _ => false,
    }
}

/// An explicit `false` is equivalent to an absent boolean.
pub fn bool_canonicalize(a: Option<bool>, b: Option<bool>) -> bool {
    a.unwrap_or(false) == b.unwrap_or(false)
}

/// Ordered string slices, element-wise exact.
pub fn string_slice_equals(a: Option<&[String]>, b: Option<&[String]>) -> bool {
    a == b
}

/// Ordered string slices, element-wise self-link equivalence.
pub fn string_slice_equals_with_self_link(a: Option<&[String]>, b: Option<&[String]>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => {
            a.len() == b.len()
                && a
                    .iter()
                    .zip(b)
                    .all(|(l, r)| name_to_self_link_equals(Some(l), Some(r)))
        }
        _ => false,
    }
}

/// Unordered string collections with multiplicity.
pub fn string_set_equals(a: Option<&[String]>, b: Option<&[String]>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => {
            let mut a: Vec<&String> = a.iter().collect();
            let mut b: Vec<&String> = b.iter().collect();
            a.sort();
            b.sort();
            a == b
        }
        _ => false,
    }
}

fn unquote(s: &str) -> std::borrow::Cow<'_, str> {
    if s.len() >= 2 {
        if s.starts_with('"') && s.ends_with('"') {
            if let Ok(unquoted) = serde_json::from_str::<String>(s) {
                return unquoted.into();
            }
        }
        for quote in ['\'', '`'] {
            if s.starts_with(quote) && s.ends_with(quote) {
                return s[1..s.len() - 1].into();
            }
        }
    }
    s.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_string_equals_nil_handling() {
        assert!(string_equals(None, None));
        assert!(!string_equals(None, Some("x")));
        assert!(!string_equals(Some("x"), None));
        assert!(!string_equals(None, Some("")));
        assert!(string_equals(Some("x"), Some("x")));
    }

    #[test]
    fn test_case_insensitive() {
        assert!(case_insensitive_equals(Some("ABC"), Some("abc")));
        assert!(!case_insensitive_equals(Some("abc"), Some("abd")));
        assert!(!case_insensitive_equals(Some("abc"), None));
    }

    #[test]
    fn test_quote_and_case_insensitive() {
        assert!(quote_and_case_insensitive_equals(Some("\"Hello\""), Some("hello")));
        assert!(quote_and_case_insensitive_equals(Some("'ABC'"), Some("\"abc\"")));
        assert!(quote_and_case_insensitive_equals(Some("\"a\\tb\""), Some("A\tB")));
        assert!(!quote_and_case_insensitive_equals(Some("\"abc"), Some("abc")));
        assert!(quote_and_case_insensitive_equals(None, None));
    }

    #[test]
    fn test_without_trailing_dot() {
        assert!(without_trailing_dot_equals(Some("example.com."), Some("example.com")));
        assert!(without_trailing_dot_equals(Some("example.com"), Some("example.com.")));
        assert!(!without_trailing_dot_equals(Some("example.com.."), Some("example.com")));
    }

    #[test]
    fn test_bool_canonicalize() {
        assert!(bool_canonicalize(None, Some(false)));
        assert!(bool_canonicalize(Some(false), None));
        assert!(bool_canonicalize(None, None));
        assert!(!bool_canonicalize(Some(true), None));
        assert!(bool_canonicalize(Some(true), Some(true)));
    }

    #[test]
    fn test_string_slices() {
        let a = strings(&["x", "y"]);
        let b = strings(&["y", "x"]);
        assert!(!string_slice_equals(Some(&a), Some(&b)));
        assert!(string_set_equals(Some(&a), Some(&b)));
        assert!(!string_set_equals(Some(&a), Some(&strings(&["x", "x"]))));
        assert!(!string_set_equals(Some(&a), None));
    }

    #[test]
    fn test_string_slice_with_self_link() {
        let a = strings(&["projects/p/global/networks/default", "sub"]);
        let b = strings(&["default", "regions/r/subnetworks/sub"]);
        assert!(string_slice_equals_with_self_link(Some(&a), Some(&b)));
        assert!(!string_slice_equals_with_self_link(Some(&a), Some(&b[..1])));
    }
}
