use std::borrow::Cow;

use crate::static_regex;

/// Collapses every whitespace run (including `&nbsp;`) into one space and trims the ends.
pub fn remove_excess_whitespace(s: &str) -> Cow<'_, str> {
    static_regex!(RE <- r"\s+");
    let trimmed = s.trim();
    RE.replace_all(trimmed, " ")
}
