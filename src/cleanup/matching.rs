//! Case-insensitive comparisons used by the heuristics.
//!
//! Store names are case-insensitive, so every comparison folds both sides.

pub fn equals(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

pub fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

pub fn ends_with(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().ends_with(&needle.to_lowercase())
}

/// `name` is the identifier itself, or the identifier followed by `_` and
/// anything (install attempts are stored as `<id>_<n>`)
pub fn is_identifier_key(name: &str, identifier: &str) -> bool {
    let name = name.to_lowercase();
    let identifier = identifier.to_lowercase();
    name == identifier
        || name
            .strip_prefix(&identifier)
            .is_some_and(|rest| rest.starts_with('_'))
}
