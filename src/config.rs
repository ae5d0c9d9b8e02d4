use std::{env, path::PathBuf};

use crate::{export::OutputMode, Error};

pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:4444";
pub const DEFAULT_OUTPUT_BASE: &str = "timeTable";

/// What to scrape and where to put it. Read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub group: String,
    pub faculty: Option<String>,
    pub output: OutputMode,
    pub output_base: String,
    pub output_dir: PathBuf,
    pub webdriver_url: String,
    pub headless: bool,
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> crate::Result<Self> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let group = non_empty("CIST_GROUP")
            .ok_or_else(|| Error::Config("env var CIST_GROUP must name a group".to_string()))?;
        let output = match non_empty("CIST_OUTPUT") {
            Some(mode) => mode.parse()?,
            None => OutputMode::Json,
        };
        let output_base = non_empty("CIST_OUTPUT_BASE").unwrap_or_else(|| {
            log::debug!("env var CIST_OUTPUT_BASE not set, using {DEFAULT_OUTPUT_BASE}");
            DEFAULT_OUTPUT_BASE.to_string()
        });
        let webdriver_url = non_empty("WEBDRIVER_URL").unwrap_or_else(|| {
            log::warn!("env var WEBDRIVER_URL not set, using {DEFAULT_WEBDRIVER_URL}");
            DEFAULT_WEBDRIVER_URL.to_string()
        });
        let headless = !matches!(
            non_empty("CIST_HEADLESS").as_deref().map(str::trim),
            Some("0" | "false" | "no")
        );

        Ok(Self {
            group,
            faculty: non_empty("CIST_FACULTY"),
            output,
            output_base,
            output_dir: non_empty("CIST_OUTPUT_DIR").map_or_else(|| PathBuf::from("."), PathBuf::from),
            webdriver_url,
            headless,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[("CIST_GROUP", "ПЗПІ-18-7")])).unwrap();
        assert_eq!(config.group, "ПЗПІ-18-7");
        assert_eq!(config.faculty, None);
        assert_eq!(config.output, OutputMode::Json);
        assert_eq!(config.output_base, "timeTable");
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert_eq!(config.webdriver_url, DEFAULT_WEBDRIVER_URL);
        assert!(config.headless);
    }

    #[test]
    fn test_all_set() {
        let config = Config::from_lookup(lookup(&[
            ("CIST_GROUP", "КН-20-1"),
            ("CIST_FACULTY", "КН"),
            ("CIST_OUTPUT", "CSV"),
            ("CIST_OUTPUT_BASE", "schedule"),
            ("CIST_OUTPUT_DIR", "/tmp/out"),
            ("WEBDRIVER_URL", "http://selenium:4444/wd/hub"),
            ("CIST_HEADLESS", "false"),
        ]))
        .unwrap();
        assert_eq!(config.faculty.as_deref(), Some("КН"));
        assert_eq!(config.output, OutputMode::Csv);
        assert_eq!(config.output_base, "schedule");
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.webdriver_url, "http://selenium:4444/wd/hub");
        assert!(!config.headless);
    }

    #[test]
    fn test_missing_group() {
        let err = Config::from_lookup(lookup(&[("CIST_GROUP", "  ")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_bad_output_mode() {
        let err = Config::from_lookup(lookup(&[("CIST_GROUP", "КН-20-1"), ("CIST_OUTPUT", "xml")]))
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
