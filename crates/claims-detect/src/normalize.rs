//! String normalization for header comparison.

/// Lowercases and drops every non-alphanumeric character.
///
/// `"Member ID"`, `"member_id"` and `"MEMBER-ID"` all become `"memberid"`.
pub fn normalize_key(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Order-insensitive containment on already normalized strings.
///
/// Empty strings never match anything.
pub fn contains_either(a: &str, b: &str) -> bool {
    !a.is_empty() && !b.is_empty() && (a.contains(b) || b.contains(a))
}

/// Normalizes both sides, then checks [`contains_either`].
pub fn loosely_matches(a: &str, b: &str) -> bool {
    contains_either(&normalize_key(a), &normalize_key(b))
}
