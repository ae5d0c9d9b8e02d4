use chrono::{Datelike, NaiveDate};

/// First and last day of a term, formatted `DD.MM.YYYY` as the timetable
/// page expects them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemesterRange {
    pub start: String,
    pub end: String,
}

impl SemesterRange {
    /// From February on this is the spring term of the current year. In
    /// January it is the fall term starting in September of the current year.
    pub fn containing(today: NaiveDate) -> Self {
        let year = today.year();
        if today.month() >= 2 {
            Self {
                start: format!("01.02.{year}"),
                end: format!("30.07.{year}"),
            }
        } else {
            Self {
                start: format!("01.09.{year}"),
                end: format!("30.01.{}", year + 1),
            }
        }
    }
}
