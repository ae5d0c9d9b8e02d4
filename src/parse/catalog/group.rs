use crate::{parse::element_text::element_text, static_regex};

/// One study group as listed in the catalog, e.g. `ПЗПІ-18-7`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    id: String,
    name: String,
}

impl Group {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Reads the `'<name>',<id>` descriptor out of a group link's `onclick`.
    /// Returns `None` for links that carry no descriptor.
    pub(super) fn from_html_element(element: scraper::ElementRef) -> Option<Self> {
        let onclick = element.attr("onclick")?;
        Self::from_descriptor(onclick).or_else(|| {
            log::debug!(
                "group link {:?} has no descriptor in onclick {onclick:?}",
                element_text(element)
            );
            None
        })
    }

    fn from_descriptor(onclick: &str) -> Option<Self> {
        static_regex!(DESCRIPTOR <- r"'([^']+)'\s*,\s*([0-9]+)");
        let caps = DESCRIPTOR.captures(onclick)?;
        Some(Self::new(&caps[2], &caps[1]))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_descriptor() {
        let group = Group::from_descriptor("IAS_ADD_Group_in_List('ПЗПІ-18-7',7396116)").unwrap();
        assert_eq!(group.name(), "ПЗПІ-18-7");
        assert_eq!(group.id(), "7396116");
    }

    #[test]
    fn test_from_descriptor_without_quotes() {
        assert_eq!(Group::from_descriptor("IAS_Change_Groups(95)"), None);
    }
}
