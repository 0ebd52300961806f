//! Backtick-quoted token scanning shared by the scope and reference checks.

use std::sync::LazyLock;

use regex::Regex;

static BACKTICK_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`]+)`").expect("backtick pattern is valid"));

/// Every backtick-quoted token in `text`, in order of appearance.
pub(crate) fn backtick_tokens(text: &str) -> impl Iterator<Item = &str> {
    BACKTICK_TOKEN
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// The first backtick-quoted token in `text`, if any.
pub(crate) fn first_backtick_token(text: &str) -> Option<&str> {
    backtick_tokens(text).next()
}
