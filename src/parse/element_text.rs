use scraper::{ElementRef, Selector};

use super::{remove_excess_whitespace, Error};

/// Rendered text of an element: every text node joined, whitespace collapsed.
pub fn element_text(element: ElementRef<'_>) -> String {
    let joined = element.text().collect::<Vec<_>>().join(" ");
    remove_excess_whitespace(&joined).into_owned()
}

/// Text of the first descendant matching `selector`.
pub fn text_from_selection(
    selector: &Selector,
    element: ElementRef<'_>,
    parent_label: &str,
    child_label: &str,
) -> Result<String, Error> {
    let child = element.select(selector).next().ok_or_else(|| {
        Error::html_parse_error(&format!(
            "Every {parent_label} element should have a {child_label}."
        ))
    })?;
    let text = element_text(child);
    if text.is_empty() {
        return Err(Error::text_node_parse_error(&format!(
            "{child_label} should have text inside."
        )));
    }
    Ok(text)
}
