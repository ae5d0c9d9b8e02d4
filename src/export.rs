use std::{
    fmt::{self, Display, Formatter},
    path::{Path, PathBuf},
    str::FromStr,
};

use tokio::fs;

use crate::{
    parse::{LessonSlot, SessionKind, TimeTable},
    Error,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    Json,
    Csv,
}

impl OutputMode {
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}

impl FromStr for OutputMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(Error::Config(format!(
                "output mode must be `json` or `csv`, got `{other}`"
            ))),
        }
    }
}

impl Display for OutputMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

const LESSON_HEADERS: [&str; 6] = [
    "Название",
    "Время начала",
    "Дата начала",
    "Тип занятия",
    "Кабинет",
    "Полное название",
];

const fn kind_headers(kind: SessionKind) -> [&'static str; 2] {
    match kind {
        SessionKind::Lecture => ["Лекции (кол-во)", "Лекции (инфо)"],
        SessionKind::Lab => ["Лабораторные (кол-во)", "Лабораторные (инфо)"],
        SessionKind::Practice => ["Практики (кол-во)", "Практики (инфо)"],
        SessionKind::Consultation => ["Консультации (кол-во)", "Консультации (инфо)"],
        SessionKind::Exam => ["Экзамены (кол-во)", "Экзамены (инфо)"],
        SessionKind::Pass => ["Зачёты (кол-во)", "Зачёты (инфо)"],
    }
}

pub const CSV_COLUMNS: usize = LESSON_HEADERS.len() + 2 * SessionKind::ALL.len();

fn csv_headers() -> Vec<&'static str> {
    let mut headers = LESSON_HEADERS.to_vec();
    headers.extend(SessionKind::ALL.into_iter().flat_map(kind_headers));
    headers
}

/// Flattens a slot and its (possibly absent) metadata into one CSV record.
fn csv_record(slot: &LessonSlot) -> Vec<String> {
    let mut record = Vec::with_capacity(CSV_COLUMNS);
    record.extend([
        slot.name.clone(),
        slot.time.clone(),
        slot.date.clone(),
        slot.kind.clone(),
        slot.cabinet.clone(),
        slot.extra_info
            .as_ref()
            .map(|m| m.full_name.clone())
            .unwrap_or_default(),
    ]);
    for kind in SessionKind::ALL {
        let count = slot.extra_info.as_ref().and_then(|m| m.count(kind));
        record.push(
            count
                .and_then(|c| c.count)
                .map(|n| n.to_string())
                .unwrap_or_default(),
        );
        record.push(count.and_then(|c| c.info.clone()).unwrap_or_default());
    }
    record
}

fn to_csv(timetable: &TimeTable) -> crate::Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(csv_headers())?;
    for slot in timetable.iter() {
        writer.write_record(csv_record(slot))?;
    }
    writer
        .into_inner()
        .map_err(|e| Error::Io(e.into_error()))
}

fn encode(timetable: &TimeTable, mode: OutputMode) -> crate::Result<Vec<u8>> {
    match mode {
        OutputMode::Json => Ok(serde_json::to_vec_pretty(timetable)?),
        OutputMode::Csv => to_csv(timetable),
    }
}

/// `<dir>/<base>-<group>.<ext>`
pub fn output_path(dir: &Path, base: &str, group_name: &str, mode: OutputMode) -> PathBuf {
    dir.join(format!("{base}-{group_name}.{}", mode.extension()))
}

/// Writes the timetable and returns the path written to.
pub async fn write(
    timetable: &TimeTable,
    mode: OutputMode,
    dir: &Path,
    base: &str,
    group_name: &str,
) -> crate::Result<PathBuf> {
    let path = output_path(dir, base, group_name, mode);
    let written = match encode(timetable, mode) {
        Ok(bytes) => fs::write(&path, bytes).await.map_err(Error::from),
        Err(e) => Err(e),
    };
    match written {
        Ok(()) => {
            log::info!("saved {} slots to {}", timetable.len(), path.display());
            Ok(path)
        }
        Err(e) => {
            log::error!("could not save {}: {e}", path.display());
            Err(Error::Export {
                path,
                reason: e.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{Legend, LessonMetadata};

    fn sample() -> TimeTable {
        let mut timetable = TimeTable::from_rows(vec![
            vec!["01.02.2021", "07:45 09:20", "ОПІ Лк 285 і"],
            vec!["09:30 11:05", " ", "ВМ Пз ФК"],
        ]);
        Legend::from(vec![LessonMetadata::from_description(
            "ОПІ",
            "Основи програмної інженерії: 28 Лк - Іваненко І.І.: 16 Лб - Петренко П.П.",
        )])
        .enrich(&mut timetable);
        timetable
    }

    #[test]
    fn test_output_mode_from_str() {
        assert_eq!("json".parse::<OutputMode>().unwrap(), OutputMode::Json);
        assert_eq!(" CSV ".parse::<OutputMode>().unwrap(), OutputMode::Csv);
        assert!("json5".parse::<OutputMode>().is_err());
    }

    #[test]
    fn test_output_path() {
        let path = output_path(Path::new("out"), "timeTable", "ПЗПІ-18-7", OutputMode::Csv);
        assert_eq!(path, Path::new("out").join("timeTable-ПЗПІ-18-7.csv"));
    }

    #[test]
    fn test_csv_headers() {
        let headers = csv_headers();
        assert_eq!(headers.len(), 18);
        assert_eq!(headers.len(), CSV_COLUMNS);
        assert_eq!(&headers[..5], ["Название", "Время начала", "Дата начала", "Тип занятия", "Кабинет"]);
    }

    #[test]
    fn test_csv_record_without_metadata() {
        let timetable = sample();
        let bare = timetable.iter().find(|slot| slot.name == "ВМ").unwrap();
        let record = csv_record(bare);
        assert_eq!(record.len(), 18);
        assert_eq!(&record[..5], ["ВМ", "09:30 - 11:05", "01.02.2021", "Пз", "ФК"]);
        assert!(record[5..].iter().all(String::is_empty));
        assert_eq!(record[5..].len(), 13);
    }

    #[test]
    fn test_csv_record_with_metadata() {
        let timetable = sample();
        let record = csv_record(timetable.iter().next().unwrap());
        assert_eq!(record[5], "Основи програмної інженерії");
        assert_eq!(record[6], "28");
        assert_eq!(record[7], "Іваненко І.І.");
        assert_eq!(record[8], "16");
        assert_eq!(record[10], "");
    }

    #[tokio::test]
    async fn test_json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let timetable = sample();
        let path = write(&timetable, OutputMode::Json, dir.path(), "timeTable", "ПЗПІ-20-1")
            .await
            .unwrap();
        assert_eq!(path, dir.path().join("timeTable-ПЗПІ-20-1.json"));
        let read: TimeTable = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(read, timetable);
        assert!(read.iter().any(|slot| slot.extra_info.is_none()));
    }

    #[tokio::test]
    async fn test_json_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&sample(), OutputMode::Json, dir.path(), "t", "g")
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap();
        let first = &value[0];
        assert_eq!(first["type"], "Лк");
        assert_eq!(first["extraInfo"]["shortName"], "ОПІ");
        assert_eq!(first["extraInfo"]["countsByType"]["lecture"]["count"], 28);
        assert!(first["extraInfo"]["countsByType"]["pass"].get("count").is_none());
        assert!(value[1].get("extraInfo").is_none());
    }

    #[tokio::test]
    async fn test_csv_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&sample(), OutputMode::Csv, dir.path(), "timeTable", "ПЗПІ-20-1")
            .await
            .unwrap();
        let mut reader = csv::Reader::from_path(&path).unwrap();
        assert_eq!(reader.headers().unwrap().len(), 18);
        let records: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.len() == 18));
    }

    #[tokio::test]
    async fn test_write_failure_is_export_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        let err = write(&sample(), OutputMode::Json, &missing, "t", "g")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Export { .. }));
    }
}
