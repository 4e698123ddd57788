use std::sync::LazyLock;

use regex::Regex;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

/// Drops every `<...>` tag and trims the remaining text.
pub fn strip_tags(html: &str) -> String {
    TAG_RE.replace_all(html, "").trim().to_string()
}
