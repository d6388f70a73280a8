//! Recognizes `"Id": "...", "Name": "..."` fragments embedded in log lines
//!
//! The management extension logs policy payloads as JSON inside free-form
//! lines, often truncated or escaped. Rather than parsing the JSON we match
//! the two adjacent keys directly, in either order.

use std::sync::LazyLock;

use regex::Regex;

static APP_FRAGMENT: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(concat!(
        r#"(?i)"Id"\s*:\s*"(?P<id_first>[a-f0-9\-]+)"\s*,\s*"Name"\s*:\s*"(?P<name_second>[^"]+)""#,
        r#"|"Name"\s*:\s*"(?P<name_first>[^"]+)"\s*,\s*"Id"\s*:\s*"(?P<id_second>[a-f0-9\-]+)""#,
    ))
    .expect("app fragment pattern is valid")
});

/// One `(identifier, name)` pair found in a piece of log text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppFragment<'t> {
    pub identifier: &'t str,
    pub name: &'t str,
}

/// All fragments in `text`, in match order. Pairs where either side is
/// blank are dropped.
pub fn find_fragments(text: &str) -> Vec<AppFragment<'_>> {
    APP_FRAGMENT
        .captures_iter(text)
        .filter_map(|caps| {
            let identifier = caps
                .name("id_first")
                .or_else(|| caps.name("id_second"))?
                .as_str();
            let name = caps
                .name("name_second")
                .or_else(|| caps.name("name_first"))?
                .as_str();
            if identifier.trim().is_empty() || name.trim().is_empty() {
                return None;
            }
            Some(AppFragment { identifier, name })
        })
        .collect()
}
