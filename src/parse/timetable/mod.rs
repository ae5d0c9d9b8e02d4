mod grid;
mod legend;

pub use grid::{LessonSlot, Schedule, TimeTable};
pub use legend::{Legend, LessonMetadata, SessionKind};
