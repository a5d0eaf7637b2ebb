#![deny(missing_docs)]

//! # Naming Utilities
//!
//! Helpers for deriving Go-safe identifiers, file stems and package paths from
//! schema names, tags and import paths.

/// Converts a mixed-case string (CamelCase or camelCase) to snake_case.
/// Used for model file stems.
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    let mut prev_lower = false;
    for c in s.chars() {
        if c.is_uppercase() {
            if prev_lower {
                result.push('_');
            }
            for lc in c.to_lowercase() {
                result.push(lc);
            }
            prev_lower = false;
        } else if c == '-' || c == ' ' {
            result.push('_');
            prev_lower = false;
        } else {
            result.push(c);
            prev_lower = c.is_lowercase() || c.is_ascii_digit();
        }
    }
    result
}

/// Builds a lowerCamelCase Go identifier from words separated by any
/// non-alphanumeric character.
///
/// e.g. `X-Request-Id` -> `xRequestId`, `CreateUserRequest` -> `createUserRequest`
pub fn to_camel_identifier(s: &str) -> String {
    let mut result = String::new();
    for (i, part) in s
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|p| !p.is_empty())
        .enumerate()
    {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            if i == 0 {
                result.extend(first.to_lowercase());
            } else {
                result.extend(first.to_uppercase());
            }
            result.extend(chars);
        }
    }
    result
}

/// Derives an operation id from the HTTP Method and URL path when `operationId` is missing.
///
/// e.g. `GET /users/{id}` -> `getUsersId`
pub fn derive_operation_id(method: &str, path: &str) -> String {
    let clean_path = path.replace(['{', '}'], "");
    to_camel_identifier(&format!("{}/{}", method.to_lowercase(), clean_path))
}

/// Turns an arbitrary path or name into a Go identifier.
///
/// Separators, hyphens, dots, pipes, spaces and brackets become `_`;
/// any remaining non-word character is dropped.
///
/// e.g. `dto/user-profile` -> `dto_user_profile`
pub fn sanitize_name(name: &str) -> String {
    let replaced = name
        .replace("[]", "")
        .replace(['[', '('], "_")
        .replace([']', ')'], "")
        .replace(['.', '-', '|', ' ', '/', '\\'], "_");

    replaced
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

/// Joins path segments with `/`, skipping empty segments and stray separators.
///
/// Mirrors how nested package directories are composed: `join(["m", "", "dto/"])` is `m/dto`.
pub fn join_path<'a>(segments: impl IntoIterator<Item = &'a str>) -> String {
    segments
        .into_iter()
        .flat_map(|s| s.split('/'))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Returns the last `/`-separated segment of a path (the Go default package identifier).
pub fn last_segment(path: &str) -> &str {
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(path)
}

/// Replaces hyphens with underscores so a path is usable as a Go package directory.
pub fn underscore_hyphens(path: &str) -> String {
    path.replace('-', "_")
}
