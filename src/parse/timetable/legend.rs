use std::collections::{btree_map::Entry, BTreeMap};

use super::TimeTable;
use crate::{
    parse::element_text::{element_text, text_from_selection},
    static_regex, static_selector,
};

/// The six kinds of sessions counted in the legend.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum SessionKind {
    #[serde(rename = "lecture")]
    Lecture,
    #[serde(rename = "laba")]
    Lab,
    #[serde(rename = "practice")]
    Practice,
    #[serde(rename = "consult")]
    Consultation,
    #[serde(rename = "exam")]
    Exam,
    #[serde(rename = "pass")]
    Pass,
}

impl SessionKind {
    pub const ALL: [Self; 6] = [
        Self::Lecture,
        Self::Lab,
        Self::Practice,
        Self::Consultation,
        Self::Exam,
        Self::Pass,
    ];

    /// Marker of this kind inside a legend segment, surrounding spaces included.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Lecture => " Лк ",
            Self::Lab => " Лб ",
            Self::Practice => " Пз ",
            Self::Consultation => " Конс ",
            Self::Exam => " ІспКомб ",
            Self::Pass => " Зал ",
        }
    }
}

/// Count and description of one session kind. Both are absent when the
/// legend does not mention the kind at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SessionCount {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

impl SessionCount {
    fn from_segments(segments: &[&str], kind: SessionKind) -> Self {
        static_regex!(DIGITS <- r"[0-9]+");
        let Some(segment) = segments.iter().find(|s| s.contains(kind.label())) else {
            return Self::default();
        };
        Self {
            info: segment.split(" - ").nth(1).map(str::to_owned),
            count: DIGITS.find(segment).and_then(|m| m.as_str().parse().ok()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonMetadata {
    pub short_name: String,
    pub full_name: String,
    pub counts_by_type: BTreeMap<SessionKind, SessionCount>,
}

impl LessonMetadata {
    /// `description` looks like `<full name>:<segment>:<segment>...`.
    pub fn from_description(short_name: &str, description: &str) -> Self {
        let mut parts = description.split(':');
        let full_name = parts.next().unwrap_or_default().to_owned();
        let segments: Vec<&str> = parts.collect();
        let counts_by_type = SessionKind::ALL
            .into_iter()
            .map(|kind| (kind, SessionCount::from_segments(&segments, kind)))
            .collect();
        Self {
            short_name: short_name.to_owned(),
            full_name,
            counts_by_type,
        }
    }

    fn from_html_element(element: scraper::ElementRef) -> Option<Self> {
        static_selector!(NAME_SELECTOR <- ".name");
        static_selector!(CELL_SELECTOR <- "td");
        let short_name = match text_from_selection(&NAME_SELECTOR, element, "legend row", "name") {
            Ok(name) => name,
            Err(e) => {
                log::trace!("skipping legend row: {e}");
                return None;
            }
        };
        let Some(description) = element.select(&CELL_SELECTOR).nth(1) else {
            log::trace!("skipping legend row {short_name:?}: no description cell");
            return None;
        };
        Some(Self::from_description(&short_name, &element_text(description)))
    }

    pub fn count(&self, kind: SessionKind) -> Option<&SessionCount> {
        self.counts_by_type.get(&kind)
    }
}

/// Per-lesson metadata from the table below the timetable grid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Legend {
    entries: Vec<LessonMetadata>,
}

impl From<Vec<LessonMetadata>> for Legend {
    fn from(entries: Vec<LessonMetadata>) -> Self {
        Self { entries }
    }
}

impl Legend {
    pub fn from_html_element(element: scraper::ElementRef) -> Self {
        static_selector!(ROW_SELECTOR <- "table.footer tr");
        let entries = element
            .select(&ROW_SELECTOR)
            .filter_map(LessonMetadata::from_html_element)
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    fn index(&self) -> BTreeMap<&str, &LessonMetadata> {
        let mut index = BTreeMap::new();
        for entry in &self.entries {
            match index.entry(entry.short_name.as_str()) {
                Entry::Vacant(slot) => {
                    slot.insert(entry);
                }
                Entry::Occupied(_) => log::warn!(
                    "legend lists {:?} more than once; keeping the first entry",
                    entry.short_name
                ),
            }
        }
        index
    }

    /// Attaches the matching legend entry to every lesson. Lessons without an
    /// entry keep `extra_info` unset. Returns how many slots were enriched.
    pub fn enrich(&self, timetable: &mut TimeTable) -> usize {
        let index = self.index();
        let mut enriched = 0;
        for slot in timetable.iter_mut().filter(|slot| !slot.is_free()) {
            if let Some(metadata) = index.get(slot.name.as_str()) {
                slot.extra_info = Some((*metadata).clone());
                enriched += 1;
            } else {
                log::debug!("no legend entry for lesson {:?}", slot.name);
            }
        }
        enriched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_from_description() {
        let metadata = LessonMetadata::from_description("Math", "Math:Mathematics: Лк - 10 years:...");
        assert_eq!(metadata.full_name, "Math");
        let lecture = metadata.count(SessionKind::Lecture).unwrap();
        assert_eq!(lecture.count, Some(10));
        assert_eq!(lecture.info.as_deref(), Some("10 years"));
    }

    #[test]
    fn test_missing_kind_is_absent_not_zero() {
        let metadata = LessonMetadata::from_description("Math", "Mathematics: 10 Лк - Іваненко");
        let lab = metadata.count(SessionKind::Lab).unwrap();
        assert_eq!(lab.count, None);
        assert_eq!(lab.info, None);
        assert_eq!(metadata.counts_by_type.len(), SessionKind::ALL.len());
    }

    #[test]
    fn test_first_matching_segment_wins() {
        let metadata = LessonMetadata::from_description(
            "ОПІ",
            "Основи програмної інженерії: 12 Пз - Петренко П.П.: 4 Пз - Сидоренко С.С.",
        );
        let practice = metadata.count(SessionKind::Practice).unwrap();
        assert_eq!(practice.count, Some(12));
        assert_eq!(practice.info.as_deref(), Some("Петренко П.П."));
    }

    #[test]
    fn test_from_html_element() {
        let html = fs::read_to_string("./src/parse/html_examples/timetable.html").unwrap();
        let document = scraper::Html::parse_document(&html);
        let legend = Legend::from_html_element(document.root_element());
        assert_eq!(legend.len(), 3);
        let opi = &legend.entries[0];
        assert_eq!(opi.short_name, "ОПІ");
        assert_eq!(opi.full_name, "Основи програмної інженерії ");
        assert_eq!(opi.count(SessionKind::Lecture).unwrap().count, Some(28));
        assert_eq!(opi.count(SessionKind::Lab).unwrap().count, Some(16));
        assert_eq!(opi.count(SessionKind::Exam).unwrap().count, Some(1));
        assert_eq!(opi.count(SessionKind::Pass).unwrap().count, None);
    }

    #[test]
    fn test_enrich() {
        let html = fs::read_to_string("./src/parse/html_examples/timetable.html").unwrap();
        let document = scraper::Html::parse_document(&html);
        let mut timetable = TimeTable::from_html_element(document.root_element());
        let legend = Legend::from_html_element(document.root_element());
        assert_eq!(legend.enrich(&mut timetable), 3);
        for slot in timetable.iter() {
            match slot.name.as_str() {
                "" | "ВМ" => assert_eq!(slot.extra_info, None),
                name => assert_eq!(slot.extra_info.as_ref().unwrap().short_name, name),
            }
        }
    }

    #[test]
    fn test_enrich_duplicate_short_name_keeps_first() {
        let legend = Legend::from(vec![
            LessonMetadata::from_description("ОПІ", "Перша: 2 Лк - А"),
            LessonMetadata::from_description("ОПІ", "Друга: 4 Лк - Б"),
        ]);
        let mut timetable = TimeTable::from_rows([["ОПІ Лк 285"]]);
        legend.enrich(&mut timetable);
        let slot = timetable.iter().next().unwrap();
        assert_eq!(slot.extra_info.as_ref().unwrap().full_name, "Перша");
    }
}
