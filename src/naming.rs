//! Case conversions between snake_case document keys and generated identifiers.
//!
//! `user_id` becomes the member `userId` and the type `UserId`. The backward
//! conversions recover the key from an identifier, which is how generated
//! deserializers find their JSON fields. A name is only ever manufactured
//! through [`checked_member_name`] / [`checked_type_name`], which refuse any
//! key whose round trip is lossy.

use crate::error::{GenError, Result};
use crate::ir::FieldPath;

/// Words a generated member or instance name may not use.
const CPP_KEYWORDS: &[&str] = &[
    "alignas", "alignof", "and", "and_eq", "asm", "auto", "bitand", "bitor", "bool", "break",
    "case", "catch", "char", "char8_t", "char16_t", "char32_t", "class", "compl", "concept",
    "const", "consteval", "constexpr", "constinit", "const_cast", "continue", "co_await",
    "co_return", "co_yield", "decltype", "default", "delete", "do", "double", "dynamic_cast",
    "else", "enum", "explicit", "export", "extern", "false", "float", "for", "friend", "goto",
    "if", "inline", "int", "long", "mutable", "namespace", "new", "noexcept", "not", "not_eq",
    "nullptr", "operator", "or", "or_eq", "private", "protected", "public", "register",
    "reinterpret_cast", "requires", "return", "short", "signed", "sizeof", "static",
    "static_assert", "static_cast", "struct", "switch", "template", "this", "thread_local",
    "throw", "true", "try", "typedef", "typeid", "typename", "union", "unsigned", "using",
    "virtual", "void", "volatile", "wchar_t", "while", "xor", "xor_eq",
];

/// Overload set of the generated deserializers; a struct with this name would be hidden by it.
pub const DESERIALIZER_FN: &str = "FromJson";

/// Type-ids the generated code already uses for something else.
pub const RESERVED_TYPE_IDS: &[&str] = &[DESERIALIZER_FN];

pub fn is_reserved_word(ident: &str) -> bool {
    CPP_KEYWORDS.contains(&ident)
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `snake_case` → `camelCase`.
pub fn to_member_name(snake: &str) -> String {
    let mut segments = snake.split('_');
    let mut out = segments.next().unwrap_or_default().to_string();
    for segment in segments {
        out.push_str(&capitalize(segment));
    }
    out
}

/// `snake_case` → `PascalCase`.
pub fn to_type_name(snake: &str) -> String {
    snake.split('_').map(capitalize).collect()
}

/// `camelCase` → `snake_case`; `None` if `member` is not camelCase ASCII.
pub fn to_snake_from_member(member: &str) -> Option<String> {
    snake_from_cased(member, |c| c.is_ascii_lowercase())
}

/// `PascalCase` → `snake_case`; `None` if `type_name` is not PascalCase ASCII.
pub fn to_snake_from_type(type_name: &str) -> Option<String> {
    snake_from_cased(type_name, |c| c.is_ascii_uppercase())
}

fn snake_from_cased(ident: &str, leading: impl Fn(char) -> bool) -> Option<String> {
    let mut chars = ident.chars();
    let first = chars.next()?;
    if !leading(first) {
        return None;
    }
    let mut out = String::with_capacity(ident.len() + 4);
    out.push(first.to_ascii_lowercase());
    for c in chars {
        if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else if c.is_ascii_lowercase() || c.is_ascii_digit() {
            out.push(c);
        } else {
            return None;
        }
    }
    Some(out)
}

/// Lower-cases the first character: `WorkAddr` → `workAddr`.
pub fn lower_first(ident: &str) -> String {
    let mut chars = ident.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Member name for `key`, verified to convert back to `key` exactly.
pub fn checked_member_name(key: &str, path: &FieldPath) -> Result<String> {
    let member = to_member_name(key);
    let back = to_snake_from_member(&member);
    if back.as_deref() != Some(key) {
        return Err(round_trip_error(key, &member, back, "member", path));
    }
    if is_reserved_word(&member) {
        return Err(GenError::Naming {
            path: path.clone(),
            message: format!("member name `{member}` is a reserved word"),
        });
    }
    Ok(member)
}

/// Type name for `key`, verified to convert back to `key` exactly.
pub fn checked_type_name(key: &str, path: &FieldPath) -> Result<String> {
    let type_name = to_type_name(key);
    let back = to_snake_from_type(&type_name);
    if back.as_deref() != Some(key) {
        return Err(round_trip_error(key, &type_name, back, "type", path));
    }
    Ok(type_name)
}

/// Accepts a user-supplied type name only if it is a PascalCase identifier
/// that some snake_case key would have produced.
pub fn check_type_identifier(type_name: &str, path: &FieldPath) -> Result<()> {
    if RESERVED_TYPE_IDS.contains(&type_name) {
        return Err(GenError::Naming {
            path: path.clone(),
            message: format!("type name `{type_name}` is reserved by the generated code"),
        });
    }
    match to_snake_from_type(type_name) {
        Some(snake) if to_type_name(&snake) == type_name => Ok(()),
        _ => Err(GenError::Naming {
            path: path.clone(),
            message: format!("`{type_name}` is not a PascalCase ASCII type name"),
        }),
    }
}

fn round_trip_error(key: &str, name: &str, back: Option<String>, what: &str, path: &FieldPath) -> GenError {
    let message = match back {
        Some(back) => format!("key `{key}` does not round-trip through {what} casing (`{key}` -> `{name}` -> `{back}`)"),
        None => format!("key `{key}` produces `{name}`, which is not a valid {what} name"),
    };
    GenError::Naming { path: path.clone(), message }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &[&str] = &[
        "x", "id", "user_id", "home_address_line", "a1_b2", "ipv4", "scores_v2x",
    ];

    #[test]
    fn forward_conversions() {
        assert_eq!(to_member_name("user_id"), "userId");
        assert_eq!(to_type_name("user_id"), "UserId");
        assert_eq!(to_member_name("name"), "name");
        assert_eq!(to_type_name("name"), "Name");
    }

    #[test]
    fn round_trips_over_supported_alphabet() {
        for key in VALID {
            assert_eq!(to_snake_from_member(&to_member_name(key)).as_deref(), Some(*key), "{key}");
            assert_eq!(to_snake_from_type(&to_type_name(key)).as_deref(), Some(*key), "{key}");
            assert!(checked_member_name(key, &FieldPath::root()).is_ok(), "{key}");
            assert!(checked_type_name(key, &FieldPath::root()).is_ok(), "{key}");
        }
    }

    /// Every string up to length 5 over a small alphabet.
    fn all_keys(alphabet: &[char], max_len: usize) -> Vec<String> {
        let mut out = Vec::new();
        let mut frontier = vec![String::new()];
        for _ in 0..max_len {
            frontier = frontier
                .iter()
                .flat_map(|prefix| alphabet.iter().map(move |c| format!("{prefix}{c}")))
                .collect();
            out.extend(frontier.iter().cloned());
        }
        out
    }

    /// Each `_`-separated segment is a lowercase letter followed by lowercase letters or digits.
    fn is_field_name(key: &str) -> bool {
        key.split('_').all(|seg| {
            let mut chars = seg.chars();
            chars.next().is_some_and(|c| c.is_ascii_lowercase())
                && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        })
    }

    #[test]
    fn round_trip_holds_exactly_for_field_names() {
        let keys = all_keys(&['a', 'q', '7', '_', 'Z'], 5);
        assert_eq!(keys.len(), 5 + 25 + 125 + 625 + 3125);
        let mut accepted = 0;
        for key in &keys {
            let path = FieldPath::root();
            let member_ok = to_snake_from_member(&to_member_name(key)).as_deref() == Some(key.as_str());
            let type_ok = to_snake_from_type(&to_type_name(key)).as_deref() == Some(key.as_str());
            assert_eq!(member_ok, is_field_name(key), "member round trip for {key:?}");
            assert_eq!(type_ok, is_field_name(key), "type round trip for {key:?}");
            assert_eq!(checked_member_name(key, &path).is_ok(), is_field_name(key), "{key:?}");
            assert_eq!(checked_type_name(key, &path).is_ok(), is_field_name(key), "{key:?}");
            if member_ok {
                accepted += 1;
            }
        }
        assert!(accepted > 100, "sweep accepted only {accepted} keys");
    }

    #[test]
    fn rejects_keys_outside_the_alphabet() {
        let path = FieldPath::root().child("parent");
        for key in ["1abc", "a__b", "trailing_", "_leading", "tag_1", "Name", "userId", "kebab-case", "caf\u{e9}", ""] {
            let err = checked_member_name(key, &path).unwrap_err();
            assert!(matches!(err, GenError::Naming { .. }), "{key}: {err}");
            assert_eq!(err.path(), &path);
            assert!(checked_type_name(key, &path).is_err(), "{key}");
        }
    }

    #[test]
    fn rejects_reserved_member_names() {
        let err = checked_member_name("class", &FieldPath::root()).unwrap_err();
        assert!(err.to_string().contains("reserved word"), "{err}");
        // only the member is checked; `Class` is a fine type name
        assert_eq!(checked_type_name("class", &FieldPath::root()).unwrap(), "Class");
    }

    #[test]
    fn type_identifier_check() {
        assert!(check_type_identifier("Root", &FieldPath::root()).is_ok());
        assert!(check_type_identifier("RootV2", &FieldPath::root()).is_ok());
        assert!(check_type_identifier("root", &FieldPath::root()).is_err());
        assert!(check_type_identifier("My_Root", &FieldPath::root()).is_err());
        assert!(check_type_identifier("", &FieldPath::root()).is_err());
        let err = check_type_identifier("FromJson", &FieldPath::root()).unwrap_err();
        assert!(err.to_string().contains("reserved"), "{err}");
    }

    #[test]
    fn lower_first_keeps_the_tail() {
        assert_eq!(lower_first("WorkAddr"), "workAddr");
        assert_eq!(lower_first(""), "");
    }
}
