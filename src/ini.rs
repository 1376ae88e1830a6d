//! Ordered INI documents.
//!
//! Both the Condor task (`.fpl`) and the XCSoar profile (`.prf`) are plain
//! `Key=Value` files. Condor groups its keys into `[Sections]`, XCSoar keeps
//! every key in front of the first header, stored here as the unnamed section `""`.

use std::fmt::{self, Display};
use std::io;
use std::str::FromStr;

use pest::{iterators::Pair, Parser};
use pest_derive::Parser;
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::{read_to_string, LINE_ENDING};

#[derive(Parser)]
#[grammar = "pest/ini.pest"]
pub struct IniParser;

#[derive(Error, Debug)]
pub enum IniError {
    #[error("failed to parse ini file: {0}")]
    Parse(#[from] pest::error::Error<Rule>),
    #[error("failed to read ini file: {0}")]
    FileRead(#[from] io::Error),
    #[error("missing key '{key}' in section [{section}]")]
    MissingKey { section: String, key: String },
    #[error("invalid value '{value}' for key '{key}' in section [{section}]")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
    },
}

pub type IniResult<T> = Result<T, IniError>;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Section {
    pub name: String,
    pub entries: Vec<(String, String)>,
}

impl Section {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            entries: Vec::new(),
        }
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Ini {
    sections: Vec<Section>,
}

enum IniLine {
    Section(String),
    Setting(String, String),
}

fn parse_line(pair: Pair<Rule>) -> Option<IniLine> {
    match pair.as_rule() {
        Rule::section => {
            let name = pair.into_inner().next().unwrap().as_str().trim();
            Some(IniLine::Section(name.to_string()))
        }
        Rule::setting => {
            let mut setting = pair.into_inner();
            let key = setting.next().unwrap().as_str().trim().to_string();
            let value = setting.next().unwrap().as_str().trim().to_string();
            Some(IniLine::Setting(key, value))
        }
        Rule::ignored => {
            warn!("ignoring malformed ini line: {}", pair.as_str());
            None
        }
        Rule::EOI => None,
        rule => unreachable!("{rule:?}"),
    }
}

impl Ini {
    pub fn parse(contents: &[u8]) -> IniResult<Self> {
        let file_contents = read_to_string(contents)?;
        // editors on Windows like to prepend a byte order mark
        let file_contents = file_contents.trim_start_matches('\u{feff}');
        let lines = IniParser::parse(Rule::ini, file_contents).map(|mut pairs| {
            pairs
                .next()
                .unwrap()
                .into_inner()
                .filter_map(parse_line)
                .collect::<Vec<_>>()
        })?;

        let mut ini = Ini::default();
        let mut current = String::new();
        for line in lines {
            match line {
                IniLine::Section(name) => {
                    ini.section_mut(&name);
                    current = name;
                }
                IniLine::Setting(key, value) => ini.set(&current, &key, value),
            }
        }

        Ok(ini)
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.name == name)
    }

    fn section_mut(&mut self, name: &str) -> &mut Section {
        let idx = match self.sections.iter().position(|s| s.name == name) {
            Some(idx) => idx,
            None => {
                // the unnamed section has no header and must be written first
                if name.is_empty() {
                    self.sections.insert(0, Section::new(name));
                    0
                } else {
                    self.sections.push(Section::new(name));
                    self.sections.len() - 1
                }
            }
        };
        &mut self.sections[idx]
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section).and_then(|s| s.get(key))
    }

    pub fn value(&self, section: &str, key: &str) -> IniResult<&str> {
        self.get(section, key).ok_or_else(|| IniError::MissingKey {
            section: section.to_string(),
            key: key.to_string(),
        })
    }

    pub fn parse_value<T: FromStr>(&self, section: &str, key: &str) -> IniResult<T> {
        let value = self.value(section, key)?;
        value.parse().map_err(|_| IniError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
        })
    }

    /// Replaces the value in place, or appends the key to its section.
    pub fn set(&mut self, section: &str, key: &str, value: impl Into<String>) {
        let value = value.into();
        let section = self.section_mut(section);
        match section.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value,
            None => section.entries.push((key.to_string(), value)),
        }
    }
}

impl Display for Ini {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for section in &self.sections {
            if !section.name.is_empty() {
                write!(f, "[{}]{LINE_ENDING}", section.name)?;
            }
            for (key, value) in &section.entries {
                write!(f, "{key}={value}{LINE_ENDING}")?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions_sorted::assert_eq_sorted;

    use super::{Ini, IniError};

    const TASK: &str = "[Version]\r
Condor version=2.1.5\r
\r
; flight plan\r
[Task]\r
Landscape=AA3\r
Count=3\r
TPName0 = Samedan\r
TPPosX0=101000.0\r
\r
[Plane]\r
Name=Discus\r
";

    #[test]
    fn test_sections() {
        let ini = Ini::parse(TASK.as_bytes()).unwrap();

        assert_eq!(ini.get("Version", "Condor version"), Some("2.1.5"));
        assert_eq!(ini.get("Task", "TPName0"), Some("Samedan"));
        assert_eq!(ini.get("Plane", "Name"), Some("Discus"));
        assert_eq!(ini.get("Plane", "Count"), None);
        assert_eq!(ini.parse_value::<u32>("Task", "Count").unwrap(), 3);
        assert_eq!(
            ini.sections()
                .iter()
                .map(|s| s.name.as_str())
                .collect::<Vec<_>>(),
            vec!["Version", "Task", "Plane"]
        );
    }

    #[test]
    fn test_typed_errors() {
        let ini = Ini::parse(TASK.as_bytes()).unwrap();

        assert!(matches!(
            ini.parse_value::<u32>("Task", "Landscape"),
            Err(IniError::InvalidValue { value, .. }) if value == "AA3"
        ));
        assert!(matches!(
            ini.value("Task", "PZCount"),
            Err(IniError::MissingKey { key, .. }) if key == "PZCount"
        ));
    }

    #[test]
    fn test_profile_roundtrip() {
        let profile = "AutoAdvance=2\nRadius=3000\n   \nbroken line\nStartLine=1";
        let mut ini = Ini::parse(profile.as_bytes()).unwrap();
        ini.set("", "Radius", "500");
        ini.set("", "UTCOffset", "0");

        assert_eq_sorted!(
            ini.to_string(),
            "AutoAdvance=2\r\nRadius=500\r\nStartLine=1\r\nUTCOffset=0\r\n"
        );
    }

    #[test]
    fn test_header_with_trailing_text_is_ignored() {
        let ini = Ini::parse(b"[Task] trailing\r\nCount=3\r\n[Plane] ; glider\r\nName=LS8\r\n").unwrap();

        assert_eq!(ini.get("", "Count"), Some("3"));
        assert_eq!(ini.get("Task", "Count"), None);
        assert_eq!(ini.get("Plane", "Name"), Some("LS8"));
    }

    #[test]
    fn test_byte_order_mark() {
        let ini = Ini::parse("\u{feff}[Task]\r\nCount=3\r\n".as_bytes()).unwrap();

        assert_eq!(ini.get("Task", "Count"), Some("3"));
        assert_eq!(
            ini.sections()
                .iter()
                .map(|s| s.name.as_str())
                .collect::<Vec<_>>(),
            vec!["Task"]
        );
    }

    #[test]
    fn test_unnamed_section_written_first() {
        let mut ini = Ini::default();
        ini.set("Task", "Count", "1");
        ini.set("", "UTCOffset", "0");

        assert_eq!(ini.to_string(), "UTCOffset=0\r\n[Task]\r\nCount=1\r\n");
    }
}
