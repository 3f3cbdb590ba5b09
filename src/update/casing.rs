//! Schema-to-wire casing.

/// Converts a TitleCase schema name to its camelCase wire form by lowering
/// the first character.
pub fn title_to_camel_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Converts a TitleCase or camelCase name to snake_case. An acronym run is
/// kept together: `IPAddress` becomes `ip_address`.
pub fn title_to_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1);
            let starts_word = match prev {
                None => false,
                Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                Some(p) => p.is_uppercase() && next.is_some_and(|n| n.is_lowercase()),
            };
            if starts_word {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_to_camel_case() {
        assert_eq!(title_to_camel_case("AuthInfo"), "authInfo");
        assert_eq!(title_to_camel_case("Name"), "name");
        assert_eq!(title_to_camel_case("name"), "name");
        assert_eq!(title_to_camel_case(""), "");
    }

    #[test]
    fn test_title_to_snake_case() {
        assert_eq!(title_to_snake_case("AuthInfo"), "auth_info");
        assert_eq!(title_to_snake_case("authInfo"), "auth_info");
        assert_eq!(title_to_snake_case("IPAddress"), "ip_address");
        assert_eq!(title_to_snake_case("Ipv6Range"), "ipv6_range");
        assert_eq!(title_to_snake_case("Name"), "name");
    }
}
