mod catalog;
mod element_text;
mod error;
mod remove_excess_whitespace;
pub(crate) mod static_selector;
mod timetable;

pub use catalog::{Catalog, Faculty, Group};
pub use error::Error;
pub use remove_excess_whitespace::remove_excess_whitespace;
pub use timetable::{Legend, LessonMetadata, LessonSlot, Schedule, SessionKind, TimeTable};
