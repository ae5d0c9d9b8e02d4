use crate::{parse::element_text::element_text, static_regex, static_selector, Error};

/// An entry of the faculty selector shown above the group catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Faculty {
    id: String,
    name: String,
}

impl Faculty {
    /// Every faculty link on the page, in page order.
    pub fn list(element: scraper::ElementRef) -> Vec<Self> {
        static_selector!(FACULTY_LINK_SELECTOR <- r#"a[onclick*="IAS_Change_Groups"]"#);
        static_regex!(ID <- r"[0-9]+");
        element
            .select(&FACULTY_LINK_SELECTOR)
            .filter_map(|link| {
                let onclick = link.attr("onclick")?;
                let id = ID.find(onclick)?.as_str().to_owned();
                Some(Self {
                    id,
                    name: element_text(link),
                })
            })
            .collect()
    }

    /// First faculty whose display name equals `name` exactly.
    pub fn find<'f>(faculties: &'f [Self], name: &str) -> crate::Result<&'f Self> {
        faculties
            .iter()
            .find(|faculty| faculty.name == name)
            .ok_or_else(|| Error::FacultyNotFound(name.to_owned()))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
