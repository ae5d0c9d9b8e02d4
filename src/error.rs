use fantoccini::error::{CmdError, NewSessionError};

use crate::parse;
use std::{
    fmt::{self, Display, Formatter},
    path::PathBuf,
};

#[derive(Debug)]
pub enum Error {
    Parse(parse::Error),
    Browser(CmdError),
    Session(NewSessionError),
    Json(serde_json::Error),
    Csv(csv::Error),
    Io(std::io::Error),
    Url(url::ParseError),
    Config(String),
    SessionTokenMissing(String),
    GroupNotFound(String),
    FacultyNotFound(String),
    EmptyCatalog,
    Export { path: PathBuf, reason: String },
}

impl From<parse::Error> for Error {
    fn from(e: parse::Error) -> Self {
        Error::Parse(e)
    }
}

impl From<CmdError> for Error {
    fn from(e: CmdError) -> Self {
        Error::Browser(e)
    }
}

impl From<NewSessionError> for Error {
    fn from(e: NewSessionError) -> Self {
        Error::Session(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}

impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Self {
        Error::Csv(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self {
        Error::Url(e)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parse(e) => write!(f, "Parse error: {}", e),
            Error::Browser(e) => write!(f, "Browser error: {}", e),
            Error::Session(e) => write!(f, "WebDriver session error: {}", e),
            Error::Json(e) => write!(f, "Json error: {}", e),
            Error::Csv(e) => write!(f, "Csv error: {}", e),
            Error::Io(e) => write!(f, "Io error: {}", e),
            Error::Url(e) => write!(f, "Url error: {}", e),
            Error::Config(msg) => write!(f, "Config error: {msg}"),
            Error::SessionTokenMissing(url) => {
                write!(f, "No session token in timetable url {url}")
            }
            Error::GroupNotFound(name) => write!(f, "Group not found: {name}"),
            Error::FacultyNotFound(name) => write!(f, "Faculty not found: {name}"),
            Error::EmptyCatalog => write!(f, "Group catalog is empty"),
            Error::Export { path, reason } => {
                write!(f, "Could not export to {}: {reason}", path.display())
            }
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
