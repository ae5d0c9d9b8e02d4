use std::{
    collections::BTreeMap,
    slice::{Iter, IterMut},
};

use chrono::NaiveDate;

use super::LessonMetadata;
use crate::{parse::element_text::element_text, static_regex, static_selector};

/// One cell of the timetable grid. An empty `name` is a free slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonSlot {
    pub name: String,
    pub time: String,
    pub date: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub cabinet: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_info: Option<LessonMetadata>,
}

impl LessonSlot {
    fn free(state: &ScanState) -> Self {
        Self {
            time: state.time.clone(),
            date: state.date.clone(),
            ..Self::default()
        }
    }

    /// `title type building room`; anything past the room is dropped and
    /// missing tokens are left out of the cabinet.
    fn lesson(text: &str, state: &ScanState) -> Self {
        let mut tokens = text.split_whitespace();
        let name = tokens.next().unwrap_or_default().to_owned();
        let kind = tokens.next().unwrap_or_default().to_owned();
        let cabinet = tokens.take(2).collect::<Vec<_>>().join(" ");
        Self {
            name,
            time: state.time.clone(),
            date: state.date.clone(),
            kind,
            cabinet,
            extra_info: None,
        }
    }

    pub fn is_free(&self) -> bool {
        self.name.is_empty()
    }
}

/// Date and time most recently seen while walking the grid.
///
/// The site renders date and time headers as cells of their own, so a lesson
/// cell only learns when it happens from the headers scanned before it.
/// Neither value is reset at row boundaries.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanState {
    date: String,
    time: String,
}

impl ScanState {
    /// Absorbs a header cell. Returns `false` when the text is not a header.
    fn observe_header(&mut self, text: &str) -> bool {
        static_regex!(DATE <- r"[0-9]{2}\.[0-9]{2}\.[0-9]{4}");
        static_regex!(TIME <- r"[0-9]{2}:[0-9]{2}");
        let date = DATE.find(text);
        let mut times = TIME.find_iter(text).map(|m| m.as_str()).peekable();
        if date.is_none() && times.peek().is_none() {
            return false;
        }
        if let Some(date) = date {
            self.date = date.as_str().to_owned();
        }
        if times.peek().is_some() {
            self.time = times.collect::<Vec<_>>().join(" - ");
        }
        true
    }

    fn slot(&mut self, text: &str) -> Option<LessonSlot> {
        if self.observe_header(text) {
            None
        } else if text.trim().is_empty() {
            Some(LessonSlot::free(self))
        } else {
            Some(LessonSlot::lesson(text, self))
        }
    }
}

/// Lesson slots in grid scan order: row by row, left to right, without the
/// header row and the label column.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct TimeTable {
    slots: Vec<LessonSlot>,
}

impl From<Vec<LessonSlot>> for TimeTable {
    fn from(slots: Vec<LessonSlot>) -> Self {
        Self { slots }
    }
}

impl TimeTable {
    pub fn from_html_element(element: scraper::ElementRef) -> Self {
        static_selector!(ROW_SELECTOR <- "table.MainTT tr");
        static_selector!(CELL_SELECTOR <- "td");
        Self::from_rows(
            element
                .select(&ROW_SELECTOR)
                .skip(1)
                .map(|row| row.select(&CELL_SELECTOR).skip(1).map(element_text)),
        )
    }

    /// Builds the grid from already extracted cell texts, rows first.
    pub fn from_rows<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: AsRef<str>,
    {
        let mut state = ScanState::default();
        let slots = rows
            .into_iter()
            .flat_map(IntoIterator::into_iter)
            .filter_map(|cell| state.slot(cell.as_ref()))
            .collect();
        Self { slots }
    }

    pub fn iter(&self) -> Iter<'_, LessonSlot> {
        self.slots.iter()
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, LessonSlot> {
        self.slots.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Position of a slot: calendar day and index of its time among the sorted
/// distinct times of the timetable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SlotKey {
    pub date: Option<NaiveDate>,
    pub period: usize,
}

/// Two dimensional view of a [`TimeTable`], keyed by (day, period).
#[derive(Debug)]
pub struct Schedule<'t> {
    periods: Vec<&'t str>,
    cells: BTreeMap<SlotKey, Vec<&'t LessonSlot>>,
}

impl<'t> Schedule<'t> {
    pub fn from_timetable(timetable: &'t TimeTable) -> Self {
        let mut periods: Vec<&str> = timetable.iter().map(|slot| slot.time.as_str()).collect();
        periods.sort_unstable();
        periods.dedup();

        let mut cells: BTreeMap<SlotKey, Vec<&LessonSlot>> = BTreeMap::new();
        for slot in timetable.iter() {
            let key = SlotKey {
                date: NaiveDate::parse_from_str(&slot.date, "%d.%m.%Y").ok(),
                period: periods.binary_search(&slot.time.as_str()).unwrap_or_default(),
            };
            cells.entry(key).or_default().push(slot);
        }
        Self { periods, cells }
    }

    pub fn periods(&self) -> &[&'t str] {
        &self.periods
    }

    /// Distinct calendar days. Slots scanned before the first date header
    /// have no day and are not counted.
    pub fn days(&self) -> usize {
        let mut days: Vec<NaiveDate> = self.cells.keys().filter_map(|key| key.date).collect();
        days.dedup();
        days.len()
    }

    /// Positions holding at least one lesson.
    pub fn busy(&self) -> usize {
        self.cells
            .keys()
            .filter(|key| self.lessons_at(**key).next().is_some())
            .count()
    }

    /// Lessons (free slots excluded) at the given position.
    pub fn lessons_at(&self, key: SlotKey) -> impl Iterator<Item = &'t LessonSlot> + '_ {
        self.cells
            .get(&key)
            .into_iter()
            .flatten()
            .copied()
            .filter(|slot| !slot.is_free())
    }
}
