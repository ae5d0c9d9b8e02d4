use std::sync::OnceLock;

use regex::Regex;
use scraper::Selector;

/// A CSS selector compiled on first use.
#[derive(Debug)]
pub(crate) struct StaticSelector<'a> {
    cell: OnceLock<Selector>,
    selector: &'a str,
}

impl<'a> StaticSelector<'a> {
    pub(crate) const fn new(selector: &'a str) -> Self {
        Self {
            cell: OnceLock::new(),
            selector,
        }
    }
}

impl core::ops::Deref for StaticSelector<'_> {
    type Target = Selector;

    fn deref(&self) -> &Self::Target {
        self.cell
            .get_or_init(|| match Selector::parse(self.selector) {
                Ok(sel) => sel,
                Err(e) => panic!("Error parsing static selector {}: {:?}", self.selector, e),
            })
    }
}

/// A regular expression compiled on first use.
#[derive(Debug)]
pub(crate) struct StaticRegex<'a> {
    cell: OnceLock<Regex>,
    pattern: &'a str,
}

impl<'a> StaticRegex<'a> {
    pub(crate) const fn new(pattern: &'a str) -> Self {
        Self {
            cell: OnceLock::new(),
            pattern,
        }
    }
}

impl core::ops::Deref for StaticRegex<'_> {
    type Target = Regex;

    fn deref(&self) -> &Self::Target {
        self.cell.get_or_init(|| match Regex::new(self.pattern) {
            Ok(re) => re,
            Err(e) => panic!("Error compiling static regex {}: {e}", self.pattern),
        })
    }
}

#[macro_export]
macro_rules! static_selector {
    ($x: ident <- $sel: literal) => {
        static $x: $crate::parse::static_selector::StaticSelector =
            $crate::parse::static_selector::StaticSelector::new($sel);
    };
}

#[macro_export]
macro_rules! static_regex {
    ($x: ident <- $pat: literal) => {
        static $x: $crate::parse::static_selector::StaticRegex =
            $crate::parse::static_selector::StaticRegex::new($pat);
    };
}
