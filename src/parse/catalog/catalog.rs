use std::slice::Iter;

use super::Group;
use crate::{
    parse::{element_text::text_from_selection, Error as ParseError},
    static_selector, Error,
};

/// The groups of one course heading on the group listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseGroupSet {
    course: String,
    groups: Vec<Group>,
}

impl CourseGroupSet {
    #[cfg(test)]
    pub fn new(course: impl Into<String>, groups: Vec<Group>) -> Self {
        Self {
            course: course.into(),
            groups,
        }
    }

    fn from_html_element(element: scraper::ElementRef) -> Result<Self, ParseError> {
        static_selector!(COURSE_TITLE_SELECTOR <- "thead th.t13RegionTitle");
        static_selector!(GROUP_LINK_SELECTOR <- "tbody td.t13RegionBody a");
        let course = text_from_selection(&COURSE_TITLE_SELECTOR, element, "course", "title")?;
        let groups = element
            .select(&GROUP_LINK_SELECTOR)
            .filter_map(Group::from_html_element)
            .collect();
        Ok(Self { course, groups })
    }

    pub fn course(&self) -> &str {
        &self.course
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }
}

/// Every course and its groups, in page order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    courses: Vec<CourseGroupSet>,
}

impl From<Vec<CourseGroupSet>> for Catalog {
    fn from(courses: Vec<CourseGroupSet>) -> Self {
        Self { courses }
    }
}

impl Catalog {
    pub fn from_html_element(element: scraper::ElementRef) -> Result<Self, ParseError> {
        static_selector!(COURSE_REGION_SELECTOR <- "div#GROUPS_AJAX table.t13FormRegion");
        let courses = element
            .select(&COURSE_REGION_SELECTOR)
            .map(CourseGroupSet::from_html_element)
            .collect::<Result<_, _>>()?;
        Ok(Self { courses })
    }

    /// Finds a group by exact name. The first course containing it wins, and the
    /// first match inside that course.
    pub fn resolve(&self, name: &str) -> crate::Result<&Group> {
        if self.courses.is_empty() {
            return Err(Error::EmptyCatalog);
        }
        self.courses
            .iter()
            .find_map(|set| set.groups.iter().find(|group| group.name() == name))
            .ok_or_else(|| Error::GroupNotFound(name.to_owned()))
    }

    pub fn iter(&self) -> Iter<'_, CourseGroupSet> {
        self.courses.iter()
    }

    pub fn group_count(&self) -> usize {
        self.courses.iter().map(|set| set.groups.len()).sum()
    }
}
